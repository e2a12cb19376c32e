//! On-disk chunklist layout.
//!
//! ```text
//! offset  size  field
//! 0       4     magic (0x4C4B4E43)
//! 4       4     header size
//! 8       1     file version
//! 9       1     chunk method
//! 10      1     signature method
//! 11      1     reserved
//! 12      8     chunk count
//! 20      8     chunk table offset
//! 28      8     signature offset
//! ```
//!
//! All integers are little-endian and all offsets are absolute. Each chunk
//! table entry is a 4-byte length followed by a 32-byte SHA-256 digest.

use std::num::NonZeroU32;

pub const CHUNKLIST_MAGIC: u32 = 0x4C4B_4E43;
pub const FILE_VERSION_1_0: u8 = 1;
pub const CHUNK_METHOD_1_0: u8 = 1;

/// Fixed header length.
pub const HEADER_LEN: u64 = 36;
/// Encoded size of one chunk table entry.
pub const CHUNK_RECORD_LEN: u64 = 4 + 32;

/// RSA-2048 modulus and signature size.
pub const RSA_2048_LEN: usize = 2048 / 8;
pub const REV1_SIGNATURE_LEN: u64 = 256;
pub const REV2_SIGNATURE_LEN: u64 = 808;

/// Signature block variants, keyed by the header's signature method byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    /// Raw RSA signature checked against a list of trusted keys.
    Rev1,
    IntegrityData,
    /// Certificate carrying its own RSA key.
    Rev2,
}

impl SignatureMethod {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Rev1),
            2 => Some(Self::IntegrityData),
            3 => Some(Self::Rev2),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Rev1 => 1,
            Self::IntegrityData => 2,
            Self::Rev2 => 3,
        }
    }

    /// Encoded size of the signature block, where the format defines one.
    pub fn signature_len(self) -> Option<u64> {
        match self {
            Self::Rev1 => Some(REV1_SIGNATURE_LEN),
            Self::Rev2 => Some(REV2_SIGNATURE_LEN),
            Self::IntegrityData => None,
        }
    }
}

/// Declared chunk length.
///
/// A stored length of zero means "everything from the current position to
/// the end of the target file". It can only be resolved once a target file
/// is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkLength {
    Fixed(NonZeroU32),
    Remainder,
}

impl ChunkLength {
    pub fn from_raw(raw: u32) -> Self {
        match NonZeroU32::new(raw) {
            Some(n) => Self::Fixed(n),
            None => Self::Remainder,
        }
    }

    /// The value as stored in the chunk table.
    pub fn raw(self) -> u32 {
        match self {
            Self::Fixed(n) => n.get(),
            Self::Remainder => 0,
        }
    }

    /// Byte count to hash, given the target's position and total length.
    pub fn resolve(self, position: u64, stream_len: u64) -> u64 {
        match self {
            Self::Fixed(n) => u64::from(n.get()),
            Self::Remainder => stream_len.saturating_sub(position),
        }
    }

    pub fn is_remainder(self) -> bool {
        matches!(self, Self::Remainder)
    }
}

/// One chunk table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRecord {
    pub length: ChunkLength,
    pub hash: [u8; 32],
}
