//! Typed reads on top of a raw byte reader.

use crate::error::{Error, Result};

/// Raw access to another process's address space.
///
/// Every read may fail: the foreign process frees and reuses memory while we
/// look at it, so callers decide per call whether a failure is fatal.
pub trait ReadMemory {
    /// Read exactly `len` bytes starting at `address`.
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>>;

    fn read_u8(&self, address: u64) -> Result<u8> {
        self.read_at(address)
    }

    fn read_u16(&self, address: u64) -> Result<u16> {
        self.read_at(address)
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        self.read_at(address)
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        self.read_at(address)
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        self.read_at(address)
    }

    /// Read a pointer and fail when it is null.
    fn read_ptr(&self, address: u64) -> Result<u64> {
        let ptr = self.read_u64(address)?;
        if ptr == 0 {
            return Err(Error::read_failed(address, "null pointer"));
        }
        Ok(ptr)
    }

    /// Read and decode a fixed-size foreign structure.
    fn read_at<T: FromMemory>(&self, address: u64) -> Result<T> {
        let bytes = self.read_bytes(address, T::SIZE)?;
        T::from_le_bytes(&bytes)
            .ok_or_else(|| Error::read_failed(address, "short or malformed record"))
    }
}

/// A value with a fixed little-endian layout in foreign memory.
pub trait FromMemory: Sized {
    /// Bytes read for one value.
    const SIZE: usize;

    fn from_le_bytes(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_from_memory_primitive {
    ($($ty:ty),*) => {
        $(
            impl FromMemory for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
                    let array = bytes.get(..Self::SIZE)?.try_into().ok()?;
                    Some(<$ty>::from_le_bytes(array))
                }
            }
        )*
    };
}

impl_from_memory_primitive!(u8, u16, u32, i32, u64, f32);

/// Cursor-free field access into a record that was read in one piece.
#[derive(Debug, Clone, Copy)]
pub struct ByteBuffer<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteBuffer<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn u8_at(&self, offset: u64) -> Option<u8> {
        self.bytes.get(offset as usize).copied()
    }

    pub fn u16_at(&self, offset: u64) -> Option<u16> {
        <u16 as FromMemory>::from_le_bytes(self.slice(offset, 2)?)
    }

    pub fn u32_at(&self, offset: u64) -> Option<u32> {
        <u32 as FromMemory>::from_le_bytes(self.slice(offset, 4)?)
    }

    pub fn u64_at(&self, offset: u64) -> Option<u64> {
        <u64 as FromMemory>::from_le_bytes(self.slice(offset, 8)?)
    }

    pub fn slice(&self, offset: u64, len: usize) -> Option<&'a [u8]> {
        let start = offset as usize;
        self.bytes.get(start..start.checked_add(len)?)
    }

    /// Decode a fixed-width, NUL-terminated name field.
    pub fn name_at(&self, offset: u64, len: usize) -> Option<String> {
        self.slice(offset, len).map(decode_name)
    }
}

/// Decode a NUL-terminated byte string, replacing invalid UTF-8.
pub fn decode_name(bytes: &[u8]) -> String {
    let end = memchr::memchr(0, bytes).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_decode() {
        assert_eq!(<u32 as FromMemory>::from_le_bytes(&[1, 0, 0, 0]), Some(1));
        assert_eq!(<u16 as FromMemory>::from_le_bytes(&[0x34, 0x12]), Some(0x1234));
        assert_eq!(<u64 as FromMemory>::from_le_bytes(&[1, 2, 3]), None);
    }

    #[test]
    fn test_byte_buffer_fields() {
        let bytes = [0x01, 0x00, 0x02, 0x00, 0x00, 0x00, b'A', b'b', 0, b'z'];
        let buffer = ByteBuffer::new(&bytes);
        assert_eq!(buffer.u16_at(0), Some(1));
        assert_eq!(buffer.u32_at(2), Some(2));
        assert_eq!(buffer.name_at(6, 4).as_deref(), Some("Ab"));
        assert_eq!(buffer.u64_at(4), None);
    }

    #[test]
    fn test_decode_name_without_terminator() {
        assert_eq!(decode_name(b"Sorc"), "Sorc");
        assert_eq!(decode_name(b""), "");
    }
}
