//! Algorithm-tagged digests.
//!
//! A [`TypedHash`] pairs digest bytes with the algorithm that produced them.
//! Comparing two typed hashes is not plain byte equality:
//!
//! - if either side is a truncated SHA-256 digest, both sides are first
//!   normalized to the 20-byte truncated form and the bytes are compared;
//! - otherwise the algorithms must match, and a mismatch is an error rather
//!   than `false`.
//!
//! SHA-1 is never coerced into the truncated form even though it has the same
//! length, so comparing SHA-1 with truncated SHA-256 fails with
//! [`HashError::UnsupportedConversion`].

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::digest::sha256_bytes;

pub const SHA1_LEN: usize = 20;
pub const SHA256_LEN: usize = 32;
/// First 20 bytes of a SHA-256 digest (code-directory hash form).
pub const SHA256_TRUNCATED_LEN: usize = 20;
pub const SHA384_LEN: usize = 48;

/// Digest algorithms, numbered as in the trust-cache type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha256Truncated,
    Sha384,
}

impl HashAlgorithm {
    /// Map a wire type code to an algorithm.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Sha1),
            2 => Some(Self::Sha256),
            3 => Some(Self::Sha256Truncated),
            4 => Some(Self::Sha384),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Sha1 => 1,
            Self::Sha256 => 2,
            Self::Sha256Truncated => 3,
            Self::Sha384 => 4,
        }
    }

    /// Canonical digest size in bytes.
    pub fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => SHA1_LEN,
            Self::Sha256 => SHA256_LEN,
            Self::Sha256Truncated => SHA256_TRUNCATED_LEN,
            Self::Sha384 => SHA384_LEN,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha256Truncated => "sha256-truncated",
            Self::Sha384 => "sha384",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha256-truncated" | "sha256t" => Ok(Self::Sha256Truncated),
            "sha384" | "sha-384" => Ok(Self::Sha384),
            _ => Err(HashError::UnknownAlgorithmName(s.to_string())),
        }
    }
}

/// Typed hash errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// Digest length does not match the algorithm's canonical size.
    #[error("{algorithm} digest must be {expected} bytes, got {actual}")]
    InvalidLength {
        algorithm: HashAlgorithm,
        expected: usize,
        actual: usize,
    },

    /// Only SHA-256 can be normalized to the truncated form.
    #[error("cannot truncate unrelated hash type {0}")]
    UnsupportedConversion(HashAlgorithm),

    #[error("type {left} does not match type {right}")]
    AlgorithmMismatch {
        left: HashAlgorithm,
        right: HashAlgorithm,
    },

    #[error("length {left} does not match length {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("unknown hash type code {0}")]
    UnknownAlgorithm(u8),

    #[error("unknown hash algorithm: {0}")]
    UnknownAlgorithmName(String),

    #[error("invalid hex digest: {0}")]
    InvalidHex(String),
}

/// A digest tagged with the algorithm that produced it.
///
/// `PartialEq` is structural identity (same algorithm, same bytes). Use
/// [`TypedHash::matches`] to compare hashes across algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedHash {
    algorithm: HashAlgorithm,
    digest: Vec<u8>,
}

impl TypedHash {
    /// Build a typed hash, rejecting digests of the wrong size.
    pub fn new(algorithm: HashAlgorithm, digest: impl Into<Vec<u8>>) -> Result<Self, HashError> {
        let digest = digest.into();
        let expected = algorithm.digest_len();
        if digest.len() != expected {
            return Err(HashError::InvalidLength {
                algorithm,
                expected,
                actual: digest.len(),
            });
        }
        Ok(Self { algorithm, digest })
    }

    /// Parse a hex digest for an explicit algorithm.
    ///
    /// An optional `algo:` prefix (as produced by `Display`) is accepted when
    /// it names the same algorithm.
    pub fn from_hex(algorithm: HashAlgorithm, hex_digest: &str) -> Result<Self, HashError> {
        let raw = match hex_digest.split_once(':') {
            Some((prefix, rest)) => {
                let named: HashAlgorithm = prefix.parse()?;
                if named != algorithm {
                    return Err(HashError::AlgorithmMismatch {
                        left: algorithm,
                        right: named,
                    });
                }
                rest
            }
            None => hex_digest,
        };
        let bytes = hex::decode(raw.trim()).map_err(|e| HashError::InvalidHex(e.to_string()))?;
        Self::new(algorithm, bytes)
    }

    /// Wrap a raw SHA-256 digest.
    pub fn from_sha256(digest: [u8; SHA256_LEN]) -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            digest: digest.to_vec(),
        }
    }

    /// SHA-256 of `bytes`.
    pub fn sha256_of(bytes: &[u8]) -> Self {
        Self::from_sha256(sha256_bytes(bytes))
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.digest)
    }

    /// Normalize to the truncated SHA-256 form.
    ///
    /// Identity for truncated hashes; SHA-256 keeps its first 20 bytes; every
    /// other algorithm fails.
    pub fn to_truncated(&self) -> Result<TypedHash, HashError> {
        match self.algorithm {
            HashAlgorithm::Sha256Truncated => Ok(self.clone()),
            HashAlgorithm::Sha256 => Ok(TypedHash {
                algorithm: HashAlgorithm::Sha256Truncated,
                digest: self.digest[..SHA256_TRUNCATED_LEN].to_vec(),
            }),
            other => Err(HashError::UnsupportedConversion(other)),
        }
    }

    /// Compare two typed hashes.
    ///
    /// Returns `Ok(false)` only when the hashes are comparable and differ.
    pub fn matches(&self, other: &TypedHash) -> Result<bool, HashError> {
        if self.algorithm == HashAlgorithm::Sha256Truncated
            || other.algorithm == HashAlgorithm::Sha256Truncated
        {
            let left = self.to_truncated()?;
            let right = other.to_truncated()?;
            return Ok(left.digest == right.digest);
        }

        if self.algorithm != other.algorithm {
            return Err(HashError::AlgorithmMismatch {
                left: self.algorithm,
                right: other.algorithm,
            });
        }

        if self.digest.len() != other.digest.len() {
            return Err(HashError::LengthMismatch {
                left: self.digest.len(),
                right: other.digest.len(),
            });
        }

        Ok(self.digest == other.digest)
    }
}

impl fmt::Display for TypedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl Serialize for TypedHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TypedHash", 2)?;
        state.serialize_field("algorithm", &self.algorithm)?;
        state.serialize_field("digest", &self.to_hex())?;
        state.end()
    }
}
