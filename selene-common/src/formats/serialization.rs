//! Binary serialization trait for format headers.
//!
//! All SELENE Device format headers implement `BinarySerializable` so generic
//! code can treat them uniformly, while each header keeps its type-specific
//! `to_bytes()` that returns a fixed-size array.

/// Trait for binary-serializable format headers.
///
/// # Example
///
/// ```
/// use selene_common::formats::{BinarySerializable, SdafHeader};
///
/// let header = SdafHeader::new(30);
/// let bytes = header.serialize();
/// let parsed = SdafHeader::deserialize(&bytes).unwrap();
/// assert_eq!(parsed.frame_count, 30);
/// ```
pub trait BinarySerializable: Sized {
    /// Size of the serialized header in bytes.
    const SIZE: usize;

    /// Magic tag at the start of the file.
    const MAGIC: &'static [u8];

    /// Serialize to bytes.
    fn serialize(&self) -> Vec<u8>;

    /// Deserialize from bytes.
    ///
    /// Returns `None` if the byte slice is too short or the magic tag differs.
    fn deserialize(bytes: &[u8]) -> Option<Self>;
}

impl BinarySerializable for super::SleHeader {
    const SIZE: usize = Self::SIZE;
    const MAGIC: &'static [u8] = &super::SLE_MAGIC;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::SdmfHeader {
    const SIZE: usize = Self::SIZE;
    const MAGIC: &'static [u8] = &super::SDMF_MAGIC;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}

impl BinarySerializable for super::SdafHeader {
    const SIZE: usize = Self::SIZE;
    const MAGIC: &'static [u8] = &super::SDAF_MAGIC;

    fn serialize(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }

    fn deserialize(bytes: &[u8]) -> Option<Self> {
        Self::from_bytes(bytes)
    }
}
