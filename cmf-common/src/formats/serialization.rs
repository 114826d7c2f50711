//! Binary serialization trait for format headers.
//!
//! Both CMF headers implement `BinarySerializable` so generic code can size
//! and emit them without knowing which one it holds. Each header keeps its
//! type-specific `to_bytes()` returning a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// Uses `Vec<u8>` for the return type because associated const generics in
/// return types (`[u8; Self::SIZE]`) are not yet stable in Rust.
///
/// # Example
///
/// ```
/// use cmf_common::formats::{ArrayHeader, ArrayType, BinarySerializable, ElementFormat};
///
/// let header = ArrayHeader::new(ArrayType::Positions, ElementFormat::Float, 36);
///
/// let bytes = header.serialize();
/// let parsed = ArrayHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed, header);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or contains invalid data.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::CmfHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::ArrayHeader {
    const SIZE: usize = Self::SIZE;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{ArrayHeader, ArrayType, CmfHeader, Compression, ElementFormat};

    #[test]
    fn test_cmf_header_trait() {
        let header = CmfHeader::new(1024, Compression::None, 100, 5);
        let bytes = header.serialize();
        assert_eq!(bytes.len(), CmfHeader::SIZE);
        assert_eq!(<CmfHeader as BinarySerializable>::SIZE, 28);

        let parsed = CmfHeader::deserialize(&bytes).unwrap();
        assert_eq!(parsed.filesize, 1024);
        assert_eq!(parsed.num_vertices, 100);
        assert_eq!(parsed.num_arrays, 5);
        assert_eq!(parsed.compression, Compression::None);
    }

    #[test]
    fn test_array_header_trait() {
        let header = ArrayHeader::new(ArrayType::Texcoords, ElementFormat::Double, 64);
        let bytes = header.serialize();
        assert_eq!(bytes.len(), ArrayHeader::SIZE);
        assert_eq!(<ArrayHeader as BinarySerializable>::SIZE, 12);

        let parsed = ArrayHeader::deserialize(&bytes).unwrap();
        assert_eq!(parsed.array_type, ArrayType::Texcoords);
        assert_eq!(parsed.format, ElementFormat::Double);
        assert_eq!(parsed.byte_length, 64);
    }

    #[test]
    fn test_deserialize_insufficient_bytes() {
        assert!(CmfHeader::deserialize(&[0; 27]).is_none());
        assert!(ArrayHeader::deserialize(&[0; 11]).is_none());
    }

    fn header_size<T: BinarySerializable>() -> usize {
        T::SIZE
    }

    #[test]
    fn test_generic_usage() {
        assert_eq!(header_size::<CmfHeader>(), 28);
        assert_eq!(header_size::<ArrayHeader>(), 12);
    }
}
