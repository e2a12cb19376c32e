//! Error types for chunklist decoding and verification.

use std::fmt;
use std::io;

use integrity_core::WireError;

/// Error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed manifest: magic, version, sizes, offsets, short reads.
    Structural,
    /// The manifest signature did not validate against any trust anchor.
    Authenticity,
    /// A chunk of the target file does not match the manifest.
    Integrity,
    /// Recognized but unimplemented format variant.
    Unsupported,
    /// Trust anchor material could not be used.
    Key,
    Io,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Chunklist errors.
#[derive(Debug, thiserror::Error)]
pub enum ChunklistError {
    #[error("bad magic {0:#010X}")]
    BadMagic(u32),

    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),

    #[error("unsupported chunk method {0}")]
    UnsupportedChunkMethod(u8),

    #[error("unsupported signature method {0}")]
    UnsupportedSignatureMethod(u8),

    /// A format variant exists but has no decode or verify path.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("chunk count {count} exceeds limit {limit}")]
    TooManyChunks { count: u64, limit: u64 },

    #[error("chunk table ({count} entries at offset {offset}) extends past the {len}-byte manifest")]
    ChunkTableOutOfBounds { offset: u64, count: u64, len: u64 },

    #[error("signature ({size} bytes at offset {offset}) extends past the {len}-byte manifest")]
    SignatureOutOfBounds { offset: u64, size: u64, len: u64 },

    #[error("signed region of {size} bytes exceeds limit {limit}")]
    SignedRegionTooLarge { size: u64, limit: u64 },

    /// Only the last chunk may use the zero-length "rest of file" sentinel.
    #[error("chunk {index} uses the remainder length but is not the last chunk")]
    RemainderNotLast { index: usize },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("no trust anchors supplied")]
    NoTrustAnchors,

    #[error("invalid trust anchor: {reason}")]
    InvalidKey { reason: String },

    #[error("no valid signature")]
    NoValidSignature,

    #[error("invalid chunk {index}")]
    InvalidChunk { index: usize },

    #[error("chunk {index} truncated: expected {expected} bytes, read {actual}")]
    TruncatedChunk {
        index: usize,
        expected: u64,
        actual: u64,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl ChunklistError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::BadMagic(_)
            | Self::UnsupportedVersion(_)
            | Self::UnsupportedChunkMethod(_)
            | Self::UnsupportedSignatureMethod(_)
            | Self::TooManyChunks { .. }
            | Self::ChunkTableOutOfBounds { .. }
            | Self::SignatureOutOfBounds { .. }
            | Self::SignedRegionTooLarge { .. }
            | Self::RemainderNotLast { .. }
            | Self::Wire(_) => ErrorClass::Structural,
            Self::NotImplemented(_) => ErrorClass::Unsupported,
            Self::NoTrustAnchors | Self::InvalidKey { .. } => ErrorClass::Key,
            Self::NoValidSignature => ErrorClass::Authenticity,
            Self::InvalidChunk { .. } | Self::TruncatedChunk { .. } => ErrorClass::Integrity,
            Self::Io(_) => ErrorClass::Io,
        }
    }

    /// Exit code for CLI.
    ///
    /// Verification failures count as one failure each; everything that
    /// prevents verification from running gets a code above 100.
    pub fn exit_code(&self) -> i32 {
        match self.class() {
            ErrorClass::Authenticity | ErrorClass::Integrity => 1,
            ErrorClass::Structural => 101,
            ErrorClass::Unsupported => 102,
            ErrorClass::Key => 103,
            ErrorClass::Io => 104,
        }
    }
}

/// Result type for chunklist operations.
pub type ChunklistResult<T> = Result<T, ChunklistError>;

/// Ordered, non-empty list of verification failures.
#[derive(Debug)]
pub struct VerifyFailures {
    failures: Vec<ChunklistError>,
}

impl VerifyFailures {
    pub(crate) fn single(error: ChunklistError) -> Self {
        Self {
            failures: vec![error],
        }
    }

    pub(crate) fn from_vec(failures: Vec<ChunklistError>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunklistError> {
        self.failures.iter()
    }

    pub fn into_vec(self) -> Vec<ChunklistError> {
        self.failures
    }

    /// Indices of chunks whose hash did not match.
    pub fn invalid_chunks(&self) -> Vec<usize> {
        self.failures
            .iter()
            .filter_map(|e| match e {
                ChunklistError::InvalidChunk { index } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Whether verification stopped at the signature check.
    pub fn is_authenticity_failure(&self) -> bool {
        self.failures.iter().any(|e| e.class() == ErrorClass::Authenticity)
    }

    /// Exit code for CLI: the failure count, capped at 100.
    pub fn exit_code(&self) -> i32 {
        self.failures.len().min(100) as i32
    }
}

impl fmt::Display for VerifyFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} verification failure(s)", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for VerifyFailures {}

impl<'a> IntoIterator for &'a VerifyFailures {
    type Item = &'a ChunklistError;
    type IntoIter = std::slice::Iter<'a, ChunklistError>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
