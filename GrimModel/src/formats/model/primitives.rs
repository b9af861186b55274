//! Primitive decoding for `.model` files
//!
//! Every multi-byte value in the format is little-endian. [`BinaryReader`]
//! pins that byte order explicitly and turns short reads into
//! [`Error::TruncatedInput`] tagged with the field being read.

use std::fmt;
use std::io::Read;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// A four character code used as a block header.
///
/// Compared byte for byte, never interpreted as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Self(*bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

/// A length-prefixed string as stored in the file.
///
/// The format does not define an encoding, so the raw bytes are kept and only
/// converted (lossily) for display.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct RawString(Vec<u8>);

impl RawString {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

impl fmt::Debug for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for RawString {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl PartialEq<str> for RawString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for RawString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl Serialize for RawString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Sequential little-endian reader over any byte source.
///
/// The reader never seeks: the format is consumed strictly front to back.
pub struct BinaryReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8> {
        let value = self.inner.read_u8().map_err(|e| Error::from_read(e, what))?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_i32(&mut self, what: &'static str) -> Result<i32> {
        let value = self
            .inner
            .read_i32::<LittleEndian>()
            .map_err(|e| Error::from_read(e, what))?;
        self.position += 4;
        Ok(value)
    }

    pub fn read_f32(&mut self, what: &'static str) -> Result<f32> {
        let value = self
            .inner
            .read_f32::<LittleEndian>()
            .map_err(|e| Error::from_read(e, what))?;
        self.position += 4;
        Ok(value)
    }

    /// Read a count field, rejecting negative values.
    pub fn read_count(&mut self, what: &'static str) -> Result<usize> {
        let count = self.read_i32(what)?;
        usize::try_from(count).map_err(|_| Error::NegativeCount { what, count })
    }

    pub fn read_fourcc(&mut self, what: &'static str) -> Result<FourCC> {
        let mut bytes = [0u8; 4];
        self.inner
            .read_exact(&mut bytes)
            .map_err(|e| Error::from_read(e, what))?;
        self.position += 4;
        Ok(FourCC(bytes))
    }

    /// Read exactly `len` raw bytes.
    ///
    /// The buffer grows with the data actually delivered, so a corrupt length
    /// cannot force a huge allocation before the source runs dry.
    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = Vec::new();
        let read = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buffer)
            .map_err(|e| Error::from_read(e, what))?;
        self.position += read as u64;

        if read != len {
            return Err(Error::TruncatedInput { what });
        }
        Ok(buffer)
    }

    /// Read `count` consecutive i32 values as one block.
    pub fn read_i32_array(&mut self, count: usize, what: &'static str) -> Result<Vec<i32>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let len = count
            .checked_mul(4)
            .ok_or(Error::SizeOverflow { what, count })?;
        let bytes = self.read_bytes(len, what)?;
        Ok(bytes.chunks_exact(4).map(LittleEndian::read_i32).collect())
    }

    /// Read an i32 length followed by that many raw bytes.
    pub fn read_string(&mut self, what: &'static str) -> Result<RawString> {
        let length = self.read_i32(what)?;
        if length == 0 {
            return Ok(RawString::default());
        }

        let len = usize::try_from(length).map_err(|_| Error::NegativeStringLength(length))?;
        Ok(RawString(self.read_bytes(len, what)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> BinaryReader<Cursor<&[u8]>> {
        BinaryReader::new(Cursor::new(bytes))
    }

    #[test]
    fn test_scalars_are_little_endian() {
        let mut data = vec![0x7F];
        data.extend_from_slice(&(-2i32).to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());

        let mut r = reader(&data);
        assert_eq!(r.read_u8("byte").unwrap(), 0x7F);
        assert_eq!(r.read_i32("int").unwrap(), -2);
        assert_eq!(r.read_f32("float").unwrap().to_bits(), 1.5f32.to_bits());
        assert_eq!(r.position(), 9);
    }

    #[test]
    fn test_short_read_is_truncation() {
        let mut r = reader(&[1, 2, 3]);
        let err = r.read_i32("node parent").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
        assert!(matches!(err, Error::TruncatedInput { what: "node parent" }));
    }

    #[test]
    fn test_empty_string_reads_only_length() {
        let mut data = 0i32.to_le_bytes().to_vec();
        data.push(0xAA);

        let mut r = reader(&data);
        assert!(r.read_string("name").unwrap().is_empty());
        assert_eq!(r.position(), 4);
    }

    #[test]
    fn test_string_keeps_raw_bytes() {
        let mut data = 3i32.to_le_bytes().to_vec();
        data.extend_from_slice(&[b'a', 0xFF, b'b']);

        let s = reader(&data).read_string("name").unwrap();
        assert_eq!(s.as_bytes(), &[b'a', 0xFF, b'b']);
        assert_eq!(s.to_string_lossy(), "a\u{FFFD}b");
    }

    #[test]
    fn test_negative_string_length() {
        let data = (-1i32).to_le_bytes();
        let err = reader(&data).read_string("name").unwrap_err();
        assert!(matches!(err, Error::NegativeStringLength(-1)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_string_longer_than_input() {
        let mut data = 10i32.to_le_bytes().to_vec();
        data.extend_from_slice(b"abc");
        let err = reader(&data).read_string("name").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn test_i32_array() {
        let mut data = Vec::new();
        for v in [0i32, 1, -7] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        let mut r = reader(&data);
        assert_eq!(r.read_i32_array(3, "indices").unwrap(), vec![0, 1, -7]);
        assert!(r.read_i32_array(0, "indices").unwrap().is_empty());
    }

    #[test]
    fn test_negative_count() {
        let data = (-5i32).to_le_bytes();
        let err = reader(&data).read_count("bone").unwrap_err();
        assert!(matches!(err, Error::NegativeCount { what: "bone", count: -5 }));
    }

    #[test]
    fn test_fourcc_display() {
        assert_eq!(FourCC::new(b"MDL1").to_string(), "\"MDL1\"");
        assert_eq!(FourCC([0, b'A', 0xFF, b'Z']).to_string(), "\"\\x00A\\xffZ\"");
    }
}
