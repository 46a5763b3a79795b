use glam::{Vec2, Vec3};

use crate::{
    binaries::BinaryData,
    error::{DecodeError, Result},
};

/// Read cursor over the decompressed buffer. All reads are little-endian and bounds-checked.
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor positioned at an absolute offset into the same data.
    pub fn at_offset(&self, offset: usize) -> Self {
        Self {
            data: self.data,
            pos: offset,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_array_of<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array_of()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array_of()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array_of()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array_of()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array_of()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array_of()?))
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Read a NUL-padded string field of `width` bytes.
    ///
    /// The value stops at the first NUL (or the field width); the padding is consumed but
    /// discarded. Legacy files are not guaranteed to be UTF-8, so bad sequences are replaced.
    pub fn read_fixed_str(&mut self, width: usize) -> Result<String> {
        let bytes = self.read_bytes(width)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(width);
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Read `count` consecutive records.
    ///
    /// Non-positive counts read nothing. The whole extent is checked before anything is
    /// allocated, so a corrupt count fails here instead of reserving gigabytes.
    pub fn read_array<T: BinaryData>(&mut self, count: i32) -> Result<Vec<T>> {
        let count = match usize::try_from(count) {
            Ok(count) if count > 0 => count,
            _ => return Ok(Vec::new()),
        };

        self.ensure(count.saturating_mul(T::SIZE))?;

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let start = self.pos;
            items.push(T::read(self)?);
            debug_assert_eq!(self.pos - start, T::SIZE, "record size mismatch");
        }
        Ok(items)
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos.saturating_add(n) > self.data.len() {
            return Err(DecodeError::TruncatedInput {
                offset: self.pos,
                need: n,
                len: self.data.len(),
            });
        }
        Ok(())
    }
}

/// Writer that builds a byte buffer. All writes are little-endian.
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_zeroes(&mut self, n: usize) {
        self.buf.resize(self.buf.len() + n, 0);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_vec2(&mut self, v: Vec2) {
        self.write_f32(v.x);
        self.write_f32(v.y);
    }

    pub fn write_vec3(&mut self, v: Vec3) {
        self.write_f32(v.x);
        self.write_f32(v.y);
        self.write_f32(v.z);
    }

    /// Write `s` into a NUL-padded field of `width` bytes. Always leaves room for one NUL.
    pub fn write_fixed_str(&mut self, s: &str, width: usize) {
        let bytes = s.as_bytes();
        let len = bytes.len().min(width.saturating_sub(1));
        self.buf.extend_from_slice(&bytes[..len]);
        self.write_zeroes(width - len);
    }

    /// Patch an i32 at a specific position (for backpatching offsets).
    pub fn patch_i32(&mut self, pos: usize, v: i32) {
        self.buf[pos..pos + 4].copy_from_slice(&v.to_le_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod cursor_tests {
    use super::*;

    #[test]
    fn little_endian_reads() {
        let data = [0x01, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x3F];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_u16().unwrap(), 1);
        assert_eq!(c.read_i16().unwrap(), -1);
        assert_eq!(c.read_f32().unwrap(), 1.0);
        assert!(c.is_empty());
    }

    #[test]
    fn short_read_reports_position() {
        let data = [0u8; 6];
        let mut c = Cursor::new(&data);
        c.skip(4).unwrap();
        match c.read_i32() {
            Err(DecodeError::TruncatedInput { offset, need, len }) => {
                assert_eq!((offset, need, len), (4, 4, 6));
            }
            other => panic!("expected truncation, got {other:?}"),
        }
        // A failed read does not move the cursor.
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn fixed_str_stops_at_nul() {
        let mut data = [0u8; 16];
        data[..5].copy_from_slice(b"HUMAN");
        data[6] = b'X';
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_fixed_str(16).unwrap(), "HUMAN");
        assert_eq!(c.position(), 16);
    }

    #[test]
    fn fixed_str_without_nul_uses_full_width() {
        let data = *b"ABCD";
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_fixed_str(4).unwrap(), "ABCD");
    }

    #[test]
    fn fixed_str_round_trip_truncates() {
        let mut w = Writer::new();
        w.write_fixed_str("a_very_long_name", 8);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(Cursor::new(&bytes).read_fixed_str(8).unwrap(), "a_very_");
    }

    #[test]
    fn array_of_negative_count_reads_nothing() {
        let data = [0u8; 8];
        let mut c = Cursor::new(&data);
        let items: Vec<i32> = c.read_array(-5).unwrap();
        assert!(items.is_empty());
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn array_checks_extent_up_front() {
        let data = [0u8; 8];
        let mut c = Cursor::new(&data);
        let err = c.read_array::<i32>(i32::MAX).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput { offset: 0, .. }));
    }

    #[test]
    fn patch_overwrites_in_place() {
        let mut w = Writer::new();
        w.write_i32(-1);
        w.write_i32(7);
        w.patch_i32(0, 544);
        let bytes = w.into_bytes();
        let mut c = Cursor::new(&bytes);
        assert_eq!(c.read_i32().unwrap(), 544);
        assert_eq!(c.read_i32().unwrap(), 7);
    }
}
