use crate::{
    binaries::BinaryData,
    cursor::{Cursor, Writer},
    error::Result,
};

/// Edge-collapse data for one vertex of the level-of-detail mesh.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProgressiveVertex {
    pub actual_collapse: i16,
    pub need_computing: i16,
    pub collapse_ratio: f32,
    pub collapse_cost: f32,
    pub collapse_candidate: i16,
    pub padding: i16,
}

impl BinaryData for ProgressiveVertex {
    const SIZE: usize = 16;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            actual_collapse: cursor.read_i16()?,
            need_computing: cursor.read_i16()?,
            collapse_ratio: cursor.read_f32()?,
            collapse_cost: cursor.read_f32()?,
            collapse_candidate: cursor.read_i16()?,
            padding: cursor.read_i16()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i16(self.actual_collapse);
        writer.write_i16(self.need_computing);
        writer.write_f32(self.collapse_ratio);
        writer.write_f32(self.collapse_cost);
        writer.write_i16(self.collapse_candidate);
        writer.write_i16(self.padding);
    }
}
