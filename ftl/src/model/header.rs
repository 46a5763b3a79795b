use std::fmt;

use num_traits::FromPrimitive;

use crate::{
    binaries::BinaryData,
    consts::{
        SectionKind, CLOTH_HEADER_SIZE, COLLISION_HEADER_SIZE, GEOMETRY_HEADER_SIZE, NAME_LENGTH,
        PRIMARY_HEADER_SIZE, PROGRESSIVE_HEADER_SIZE, SECONDARY_HEADER_SIZE, SECTION_COUNT,
        SIGNATURE,
    },
    cursor::{Cursor, Writer},
    error::{DecodeError, Result},
};

#[derive(Copy, Clone, PartialEq)]
pub struct PrimaryHeader {
    pub ident: [u8; 4], // "FTL\0"
    pub version: f32,
}

impl Default for PrimaryHeader {
    fn default() -> Self {
        Self {
            ident: SIGNATURE,
            version: 0.0,
        }
    }
}

impl fmt::Debug for PrimaryHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimaryHeader")
            .field("ident", &self.identifier())
            .field("version", &self.version)
            .finish()
    }
}

impl PrimaryHeader {
    /// The three meaningful signature bytes as text. The fourth byte is padding.
    pub fn identifier(&self) -> String {
        String::from_utf8_lossy(&self.ident[..3]).into_owned()
    }

    pub fn validate(&self) -> Result<()> {
        if self.ident[..3] != SIGNATURE[..3] {
            return Err(DecodeError::BadSignature { found: self.ident });
        }
        Ok(())
    }
}

impl BinaryData for PrimaryHeader {
    const SIZE: usize = PRIMARY_HEADER_SIZE;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            ident: cursor.read_array_of()?,
            version: cursor.read_f32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.ident);
        writer.write_f32(self.version);
    }
}

/// Offset table locating every optional section. `None` is stored on disk as -1.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SecondaryHeader {
    offsets: [Option<u32>; SECTION_COUNT],
}

impl SecondaryHeader {
    pub fn offset(&self, section: SectionKind) -> Option<u32> {
        self.offsets[section as usize]
    }

    /// The value as it is stored in the file.
    pub fn raw(&self, section: SectionKind) -> i32 {
        self.offset(section)
            .map_or(-1, |o| i32::try_from(o).unwrap_or(i32::MAX))
    }

    /// Present sections in table order.
    pub fn present(&self) -> impl Iterator<Item = (SectionKind, u32)> + '_ {
        self.offsets
            .iter()
            .enumerate()
            .filter_map(|(i, o)| Some((SectionKind::from_usize(i)?, (*o)?)))
    }
}

impl BinaryData for SecondaryHeader {
    const SIZE: usize = SECONDARY_HEADER_SIZE;

    /// Reads the table and checks every present offset against the buffer the cursor
    /// walks: its sub-header has to fit, and a zero-size sub-header still has to start
    /// inside the buffer.
    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let len = cursor.len();
        let mut offsets = [None; SECTION_COUNT];

        for (slot, section) in offsets.iter_mut().zip(SectionKind::ALL) {
            let raw = cursor.read_i32()?;
            if raw == -1 {
                continue;
            }

            let need = section.sub_header_size();
            let fits = usize::try_from(raw)
                .ok()
                .filter(|&o| o < len && o + need <= len);

            match fits {
                Some(o) => *slot = Some(o as u32),
                None => {
                    return Err(DecodeError::BadOffset {
                        section,
                        offset: raw,
                        need,
                        len,
                    })
                }
            }
        }

        Ok(Self { offsets })
    }

    fn write(&self, writer: &mut Writer) {
        for section in SectionKind::ALL {
            writer.write_i32(self.raw(section));
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryHeader {
    pub vertex_count: i32,
    pub face_count: i32,
    pub texture_count: i32,
    pub group_count: i32,
    pub action_count: i32,
    pub selection_count: i32,
    /// Vertex the model is anchored on.
    pub origin: i32,
    pub name: String,
}

impl BinaryData for GeometryHeader {
    const SIZE: usize = GEOMETRY_HEADER_SIZE;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            vertex_count: cursor.read_i32()?,
            face_count: cursor.read_i32()?,
            texture_count: cursor.read_i32()?,
            group_count: cursor.read_i32()?,
            action_count: cursor.read_i32()?,
            selection_count: cursor.read_i32()?,
            origin: cursor.read_i32()?,
            name: cursor.read_fixed_str(NAME_LENGTH)?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i32(self.vertex_count);
        writer.write_i32(self.face_count);
        writer.write_i32(self.texture_count);
        writer.write_i32(self.group_count);
        writer.write_i32(self.action_count);
        writer.write_i32(self.selection_count);
        writer.write_i32(self.origin);
        writer.write_fixed_str(&self.name, NAME_LENGTH);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionHeader {
    pub sphere_count: i32,
}

impl BinaryData for CollisionHeader {
    const SIZE: usize = COLLISION_HEADER_SIZE;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            sphere_count: cursor.read_i32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i32(self.sphere_count);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressiveHeader {
    pub vertex_count: i32,
}

impl BinaryData for ProgressiveHeader {
    const SIZE: usize = PROGRESSIVE_HEADER_SIZE;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            vertex_count: cursor.read_i32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i32(self.vertex_count);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClothHeader {
    pub vertex_count: i32,
    pub spring_count: i32,
}

impl BinaryData for ClothHeader {
    const SIZE: usize = CLOTH_HEADER_SIZE;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            vertex_count: cursor.read_i32()?,
            spring_count: cursor.read_i32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i32(self.vertex_count);
        writer.write_i32(self.spring_count);
    }
}
