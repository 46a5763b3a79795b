use flagset::FlagSet;
use glam::{Vec2, Vec3};

use crate::{
    binaries::BinaryData,
    consts::{FaceFlag, FACE_CORNERS, NAME_LENGTH, SELECTION_NAME_LENGTH, TEXTURE_PATH_LENGTH},
    cursor::{Cursor, Writer},
    error::Result,
};

/// Screen-space part of a vertex, a leftover of the software renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LegacyVertex {
    pub screen: Vec3,
    pub rhw: f32,
    pub color: u32,
    pub specular: u32,
    pub uv: Vec2,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub legacy: LegacyVertex,
    pub position: Vec3,
    pub normal: Vec3,
}

impl BinaryData for Vertex {
    const SIZE: usize = 56;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            legacy: LegacyVertex {
                screen: cursor.read_vec3()?,
                rhw: cursor.read_f32()?,
                color: cursor.read_u32()?,
                specular: cursor.read_u32()?,
                uv: cursor.read_vec2()?,
            },
            position: cursor.read_vec3()?,
            normal: cursor.read_vec3()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_vec3(self.legacy.screen);
        writer.write_f32(self.legacy.rhw);
        writer.write_u32(self.legacy.color);
        writer.write_u32(self.legacy.specular);
        writer.write_vec2(self.legacy.uv);
        writer.write_vec3(self.position);
        writer.write_vec3(self.normal);
    }
}

/// A textured triangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Face {
    /// Raw face-type bits, see [`Face::flags`].
    pub face_type: i32,
    pub colors: [u32; FACE_CORNERS],
    pub vertices: [u16; FACE_CORNERS],
    /// -1 when untextured.
    pub texture: i16,
    pub u: [f32; FACE_CORNERS],
    pub v: [f32; FACE_CORNERS],
    pub legacy_u: [i16; FACE_CORNERS],
    pub legacy_v: [i16; FACE_CORNERS],
    pub transparency: f32,
    pub normal: Vec3,
    pub corner_normals: [Vec3; FACE_CORNERS],
    pub temp: f32,
}

impl Face {
    pub fn flags(&self) -> FlagSet<FaceFlag> {
        FlagSet::new_truncated(self.face_type)
    }

    /// Texture slot, if the index is non-negative and below `texture_count`.
    pub fn texture_index(&self, texture_count: usize) -> Option<usize> {
        usize::try_from(self.texture)
            .ok()
            .filter(|&t| t < texture_count)
    }

    pub fn uv(&self, corner: usize) -> Vec2 {
        Vec2::new(self.u[corner], self.v[corner])
    }
}

impl BinaryData for Face {
    const SIZE: usize = 116;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let face_type = cursor.read_i32()?;

        let mut colors = [0; FACE_CORNERS];
        for c in &mut colors {
            *c = cursor.read_u32()?;
        }
        let mut vertices = [0; FACE_CORNERS];
        for v in &mut vertices {
            *v = cursor.read_u16()?;
        }
        let texture = cursor.read_i16()?;

        let mut u = [0.0; FACE_CORNERS];
        for x in &mut u {
            *x = cursor.read_f32()?;
        }
        let mut v = [0.0; FACE_CORNERS];
        for x in &mut v {
            *x = cursor.read_f32()?;
        }
        let mut legacy_u = [0; FACE_CORNERS];
        for x in &mut legacy_u {
            *x = cursor.read_i16()?;
        }
        let mut legacy_v = [0; FACE_CORNERS];
        for x in &mut legacy_v {
            *x = cursor.read_i16()?;
        }

        let transparency = cursor.read_f32()?;
        let normal = cursor.read_vec3()?;
        let mut corner_normals = [Vec3::ZERO; FACE_CORNERS];
        for n in &mut corner_normals {
            *n = cursor.read_vec3()?;
        }

        Ok(Self {
            face_type,
            colors,
            vertices,
            texture,
            u,
            v,
            legacy_u,
            legacy_v,
            transparency,
            normal,
            corner_normals,
            temp: cursor.read_f32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i32(self.face_type);
        self.colors.iter().for_each(|&c| writer.write_u32(c));
        self.vertices.iter().for_each(|&v| writer.write_u16(v));
        writer.write_i16(self.texture);
        self.u.iter().for_each(|&x| writer.write_f32(x));
        self.v.iter().for_each(|&x| writer.write_f32(x));
        self.legacy_u.iter().for_each(|&x| writer.write_i16(x));
        self.legacy_v.iter().for_each(|&x| writer.write_i16(x));
        writer.write_f32(self.transparency);
        writer.write_vec3(self.normal);
        self.corner_normals.iter().for_each(|&n| writer.write_vec3(n));
        writer.write_f32(self.temp);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TexturePath(pub String);

impl TexturePath {
    /// File name part of the path. Paths written on Windows use backslashes.
    pub fn file_name(&self) -> &str {
        self.0.rsplit(['/', '\\']).next().unwrap_or(&self.0)
    }
}

impl BinaryData for TexturePath {
    const SIZE: usize = TEXTURE_PATH_LENGTH;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self(cursor.read_fixed_str(TEXTURE_PATH_LENGTH)?))
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_fixed_str(&self.0, TEXTURE_PATH_LENGTH);
    }
}

/// Named set of vertices, e.g. a bone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexGroup {
    pub name: String,
    pub origin: i32,
    /// Declared length of `indices`.
    pub vertex_count: i32,
    /// Runtime pointer slot, meaningless on disk.
    pub indices_slot: i32,
    pub radius: f32,
    pub indices: Vec<i32>,
}

impl BinaryData for VertexGroup {
    const SIZE: usize = NAME_LENGTH + 16;

    /// Reads the fixed record only. The index list follows after all group records.
    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            name: cursor.read_fixed_str(NAME_LENGTH)?,
            origin: cursor.read_i32()?,
            vertex_count: cursor.read_i32()?,
            indices_slot: cursor.read_i32()?,
            radius: cursor.read_f32()?,
            indices: Vec::new(),
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_fixed_str(&self.name, NAME_LENGTH);
        writer.write_i32(self.origin);
        writer.write_i32(self.vertex_count);
        writer.write_i32(self.indices_slot);
        writer.write_f32(self.radius);
    }
}

/// Named anchor on a vertex, used for attachments and effects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionPoint {
    pub name: String,
    pub vertex: i32,
    pub action: i32,
    pub sfx: i32,
}

impl BinaryData for ActionPoint {
    const SIZE: usize = NAME_LENGTH + 12;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            name: cursor.read_fixed_str(NAME_LENGTH)?,
            vertex: cursor.read_i32()?,
            action: cursor.read_i32()?,
            sfx: cursor.read_i32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_fixed_str(&self.name, NAME_LENGTH);
        writer.write_i32(self.vertex);
        writer.write_i32(self.action);
        writer.write_i32(self.sfx);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexSelection {
    pub name: String,
    pub vertex_count: i32,
    pub indices_slot: i32,
    pub indices: Vec<i32>,
}

impl BinaryData for VertexSelection {
    const SIZE: usize = SELECTION_NAME_LENGTH + 8;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            name: cursor.read_fixed_str(SELECTION_NAME_LENGTH)?,
            vertex_count: cursor.read_i32()?,
            indices_slot: cursor.read_i32()?,
            indices: Vec::new(),
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_fixed_str(&self.name, SELECTION_NAME_LENGTH);
        writer.write_i32(self.vertex_count);
        writer.write_i32(self.indices_slot);
    }
}

#[cfg(test)]
mod geometry_tests {
    use super::*;

    fn encoded<T: BinaryData>(item: &T) -> Vec<u8> {
        let mut w = Writer::new();
        item.write(&mut w);
        w.into_bytes()
    }

    #[test]
    fn record_sizes() {
        assert_eq!(encoded(&Vertex::default()).len(), Vertex::SIZE);
        assert_eq!(encoded(&Face::default()).len(), Face::SIZE);
        assert_eq!(encoded(&TexturePath::default()).len(), 256);
        assert_eq!(encoded(&VertexGroup::default()).len(), 272);
        assert_eq!(encoded(&ActionPoint::default()).len(), 268);
        assert_eq!(encoded(&VertexSelection::default()).len(), 72);
    }

    #[test]
    fn face_field_order() {
        let face = Face {
            face_type: 0x2 | 0x40,
            vertices: [4, 5, 6],
            texture: -1,
            u: [0.25, 0.5, 0.75],
            transparency: 0.5,
            ..Default::default()
        };
        let bytes = encoded(&face);
        // flags, then three colors, then the vertex indices.
        assert_eq!(&bytes[16..22], &[4, 0, 5, 0, 6, 0]);
        assert_eq!(&bytes[22..24], &[0xff, 0xff]);

        let back = Face::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(back, face);
        assert!(back.flags().contains(FaceFlag::DoubleSided));
        assert!(back.flags().contains(FaceFlag::Quad));
        assert!(!back.flags().contains(FaceFlag::Water));
    }

    #[test]
    fn texture_index_bounds() {
        let mut face = Face {
            texture: -1,
            ..Default::default()
        };
        assert_eq!(face.texture_index(2), None);
        face.texture = 1;
        assert_eq!(face.texture_index(2), Some(1));
        face.texture = 2;
        assert_eq!(face.texture_index(2), None);
    }

    #[test]
    fn texture_file_name() {
        let windows = TexturePath("GRAPH\\OBJ3D\\TEXTURES\\GOBLIN.BMP".into());
        assert_eq!(windows.file_name(), "GOBLIN.BMP");
        let unix = TexturePath("graph/obj3d/textures/goblin.bmp".into());
        assert_eq!(unix.file_name(), "goblin.bmp");
        assert_eq!(TexturePath("plain.jpg".into()).file_name(), "plain.jpg");
    }

    #[test]
    fn group_record_leaves_indices_empty() {
        let group = VertexGroup {
            name: "head".into(),
            origin: 3,
            vertex_count: 2,
            indices_slot: 0x1234,
            radius: 1.5,
            indices: vec![7, 8],
        };
        let bytes = encoded(&group);
        let back = VertexGroup::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(back.vertex_count, 2);
        assert_eq!(back.indices_slot, 0x1234);
        assert!(back.indices.is_empty());
    }
}
