use flagset::flags;
use num_derive::FromPrimitive;

/// "FTL" plus one byte of padding.
pub const SIGNATURE: [u8; 4] = *b"FTL\0";

pub const PRIMARY_HEADER_SIZE: usize = 8;
/// Checksum/comment region between the primary and secondary headers. Never decoded.
pub const RESERVED_BLOCK_SIZE: usize = 512;
pub const SECONDARY_HEADER_SIZE: usize = SECTION_COUNT * 4;
/// Where the first section can start in a well-formed file.
pub const SECTIONS_START: usize = PRIMARY_HEADER_SIZE + RESERVED_BLOCK_SIZE + SECONDARY_HEADER_SIZE;

pub const SECTION_COUNT: usize = 6;

pub const NAME_LENGTH: usize = 256;
pub const SELECTION_NAME_LENGTH: usize = 64;
pub const TEXTURE_PATH_LENGTH: usize = 256;

/// Corners per face. Faces are always triangles.
pub const FACE_CORNERS: usize = 3;

pub const GEOMETRY_HEADER_SIZE: usize = 7 * 4 + NAME_LENGTH;
pub const COLLISION_HEADER_SIZE: usize = 4;
pub const PROGRESSIVE_HEADER_SIZE: usize = 4;
pub const CLOTH_HEADER_SIZE: usize = 8;

/// Default ceiling on decompressed output.
pub const MAX_DECOMPRESSED_LEN: usize = 64 * 1024 * 1024;

/// Slots of the secondary offset table, in file order.
#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Geometry = 0,
    Cylinder = 1,
    Progressive = 2,
    Cloth = 3,
    CollisionSpheres = 4,
    PhysicsBox = 5,
}

impl SectionKind {
    pub const ALL: [SectionKind; SECTION_COUNT] = [
        SectionKind::Geometry,
        SectionKind::Cylinder,
        SectionKind::Progressive,
        SectionKind::Cloth,
        SectionKind::CollisionSpheres,
        SectionKind::PhysicsBox,
    ];

    /// Size of the fixed record found at the section's offset.
    /// The reserved slots have none, but their offset must still land inside the buffer.
    pub const fn sub_header_size(self) -> usize {
        match self {
            SectionKind::Geometry => GEOMETRY_HEADER_SIZE,
            SectionKind::Progressive => PROGRESSIVE_HEADER_SIZE,
            SectionKind::Cloth => CLOTH_HEADER_SIZE,
            SectionKind::CollisionSpheres => COLLISION_HEADER_SIZE,
            SectionKind::Cylinder | SectionKind::PhysicsBox => 0,
        }
    }

    /// Whether this implementation decodes the section's contents.
    pub const fn is_decoded(self) -> bool {
        !matches!(self, SectionKind::Cylinder | SectionKind::PhysicsBox)
    }
}

flags! {
    /// Face-type bits stored in every face record.
    pub enum FaceFlag: i32 {
        NoShadow = 0x1,
        DoubleSided = 0x2,
        Transparent = 0x4,
        Water = 0x8,
        Glow = 0x10,
        Ignore = 0x20,
        Quad = 0x40,
        Tiled = 0x80,
        Metal = 0x100,
        Hide = 0x200,
        Stone = 0x400,
        Wood = 0x800,
        Gravel = 0x1000,
        Earth = 0x2000,
        NoCollision = 0x4000,
        Lava = 0x8000,
        Climb = 0x10000,
        Fall = 0x20000,
        NoPath = 0x40000,
        NoDraw = 0x80000,
        PrecisePath = 0x100000,
        LateMip = 0x200000,
    }
}
