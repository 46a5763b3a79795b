use crate::{
    cursor::{Cursor, Writer},
    error::Result,
};

/// A fixed-size on-disk record, decoded field by field.
pub trait BinaryData
where
    Self: Sized,
{
    /// Size of one record in the file, in bytes.
    const SIZE: usize;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self>;

    fn write(&self, writer: &mut Writer);
}

/// Entries of the variable index lists.
impl BinaryData for i32 {
    const SIZE: usize = 4;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        cursor.read_i32()
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_i32(*self);
    }
}

/// Write every record of a slice back to back.
pub fn write_all<T: BinaryData>(items: &[T], writer: &mut Writer) {
    for item in items {
        item.write(writer);
    }
}
