use crate::{
    binaries::BinaryData,
    cursor::{Cursor, Writer},
    error::Result,
};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CollisionSphere {
    pub vertex: i16,
    pub flags: i16,
    pub radius: f32,
}

impl BinaryData for CollisionSphere {
    const SIZE: usize = 8;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        Ok(Self {
            vertex: cursor.read_i16()?,
            flags: cursor.read_i16()?,
            radius: cursor.read_f32()?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i16(self.vertex);
        writer.write_i16(self.flags);
        writer.write_f32(self.radius);
    }
}
