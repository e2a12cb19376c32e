//! Trust cache records.

use serde::Serialize;

use integrity_core::{HashAlgorithm, HashError, TypedHash};

/// Length of every stored code-identity hash.
pub const HASH_LEN: usize = 20;

/// Entry flag: the hash is trusted for AMFI code signing checks.
pub const FLAG_AMFI: u8 = 0x01;

/// One trust cache record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    /// Bare SHA-1 hash.
    V0 {
        #[serde(serialize_with = "hex::serde::serialize")]
        hash: [u8; HASH_LEN],
    },
    V1 {
        #[serde(serialize_with = "hex::serde::serialize")]
        hash: [u8; HASH_LEN],
        hash_type: u8,
        flags: u8,
    },
}

impl Entry {
    pub fn digest(&self) -> &[u8; HASH_LEN] {
        match self {
            Self::V0 { hash } | Self::V1 { hash, .. } => hash,
        }
    }

    /// Hash type code. Version 0 records are always SHA-1.
    pub fn hash_type(&self) -> u8 {
        match self {
            Self::V0 { .. } => HashAlgorithm::Sha1.code(),
            Self::V1 { hash_type, .. } => *hash_type,
        }
    }

    /// Entry flags. Version 0 records are implicitly AMFI-trusted.
    pub fn flags(&self) -> u8 {
        match self {
            Self::V0 { .. } => FLAG_AMFI,
            Self::V1 { flags, .. } => *flags,
        }
    }

    pub fn is_amfi(&self) -> bool {
        self.flags() & FLAG_AMFI != 0
    }

    /// The stored digest as a typed hash.
    ///
    /// Records only hold 20 bytes, so a SHA-256 type code denotes the
    /// truncated cdhash form. Types whose digest cannot fit fail.
    pub fn typed_hash(&self) -> Result<TypedHash, HashError> {
        let code = self.hash_type();
        let algorithm = match HashAlgorithm::from_code(code) {
            Some(HashAlgorithm::Sha256) => HashAlgorithm::Sha256Truncated,
            Some(algorithm) => algorithm,
            None => return Err(HashError::UnknownAlgorithm(code)),
        };
        TypedHash::new(algorithm, self.digest().to_vec())
    }
}
