//! Wire helpers: compact-size integers plus a reading cursor and a writing
//! buffer for little-endian protocol data.

use crate::PrimitivesError;

/// Largest length a compact-size prefix may announce on the wire.
pub const MAX_VARINT_SIZE: u64 = 0x0200_0000;

// ---------------------------------------------------------------------------
// VarInt
// ---------------------------------------------------------------------------

/// A Bitcoin protocol variable-length integer.
///
/// Encoded in 1, 3, 5 or 9 bytes depending on magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Wire length of this value.
    pub fn length(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    /// Encode into a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let v = self.0;
        let mut buf = Vec::with_capacity(self.length());
        match self.length() {
            1 => buf.push(v as u8),
            3 => {
                buf.push(0xfd);
                buf.extend_from_slice(&(v as u16).to_le_bytes());
            }
            5 => {
                buf.push(0xfe);
                buf.extend_from_slice(&(v as u32).to_le_bytes());
            }
            _ => {
                buf.push(0xff);
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }
        buf
    }

    /// The underlying integer.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

// ---------------------------------------------------------------------------
// BsvReader
// ---------------------------------------------------------------------------

/// A cursor over borrowed wire bytes.
///
/// Every read is bounds-checked and reports `UnexpectedEof` instead of
/// panicking, so hostile input can only ever produce an error.
pub struct BsvReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BsvReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BsvReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let end = self.pos.checked_add(n).ok_or(PrimitivesError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32, PrimitivesError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64_le(&mut self) -> Result<i64, PrimitivesError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Read a compact-size integer.
    ///
    /// Rejects non-minimal encodings and values above [`MAX_VARINT_SIZE`].
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let first = self.read_u8()?;
        let (value, min) = match first {
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            0xfe => (self.read_u32_le()? as u64, 0x1_0000),
            0xfd => (self.read_u16_le()? as u64, 0xfd),
            b => return Ok(VarInt(b as u64)),
        };
        if value < min {
            return Err(PrimitivesError::NonCanonicalVarInt);
        }
        if value > MAX_VARINT_SIZE {
            return Err(PrimitivesError::VarIntTooLarge(value));
        }
        Ok(VarInt(value))
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }
}

// ---------------------------------------------------------------------------
// BsvWriter
// ---------------------------------------------------------------------------

/// An append-only buffer for wire bytes.
#[derive(Default)]
pub struct BsvWriter {
    buf: Vec<u8>,
}

impl BsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BsvWriter { buf: Vec::with_capacity(capacity) }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_i32_le(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_i64_le(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_varint(&mut self, varint: VarInt) {
        self.buf.extend_from_slice(&varint.to_bytes());
    }

    /// Write a compact-size length followed by the bytes themselves.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_lengths() {
        assert_eq!(VarInt(0).length(), 1);
        assert_eq!(VarInt(0xfc).length(), 1);
        assert_eq!(VarInt(0xfd).length(), 3);
        assert_eq!(VarInt(0xffff).length(), 3);
        assert_eq!(VarInt(0x1_0000).length(), 5);
        assert_eq!(VarInt(0xffff_ffff).length(), 5);
        assert_eq!(VarInt(0x1_0000_0000).length(), 9);
    }

    #[test]
    fn test_varint_encoding() {
        assert_eq!(VarInt(0xfc).to_bytes(), vec![0xfc]);
        assert_eq!(VarInt(0xfd).to_bytes(), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(VarInt(0x1_0000).to_bytes(), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_read_varint_roundtrip() {
        for v in [0u64, 1, 0xfc, 0xfd, 0xffff, 0x1_0000, MAX_VARINT_SIZE] {
            let bytes = VarInt(v).to_bytes();
            let mut reader = BsvReader::new(&bytes);
            assert_eq!(reader.read_varint().unwrap(), VarInt(v));
            assert_eq!(reader.remaining(), 0);
        }
    }

    #[test]
    fn test_read_varint_rejects_non_canonical() {
        // 0x10 encoded with the three-byte form.
        let mut reader = BsvReader::new(&[0xfd, 0x10, 0x00]);
        assert!(matches!(
            reader.read_varint(),
            Err(PrimitivesError::NonCanonicalVarInt)
        ));
    }

    #[test]
    fn test_read_varint_rejects_oversized() {
        let bytes = VarInt(MAX_VARINT_SIZE + 1).to_bytes();
        let mut reader = BsvReader::new(&bytes);
        assert!(matches!(
            reader.read_varint(),
            Err(PrimitivesError::VarIntTooLarge(_))
        ));
    }

    #[test]
    fn test_reader_eof() {
        let mut reader = BsvReader::new(&[0x01, 0x02, 0x03]);
        assert!(reader.read_u32_le().is_err());
        // A failed read does not advance the cursor.
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert!(reader.read_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_writer_reader_signed() {
        let mut writer = BsvWriter::new();
        writer.write_i32_le(-2);
        writer.write_i64_le(-5_000_000_000);
        writer.write_var_bytes(b"abc");
        let bytes = writer.into_bytes();

        let mut reader = BsvReader::new(&bytes);
        assert_eq!(reader.read_i32_le().unwrap(), -2);
        assert_eq!(reader.read_i64_le().unwrap(), -5_000_000_000);
        let len = reader.read_varint().unwrap().value() as usize;
        assert_eq!(reader.read_bytes(len).unwrap(), b"abc");
    }
}
