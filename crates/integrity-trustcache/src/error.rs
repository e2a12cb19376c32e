use std::io;

use integrity_core::WireError;

/// Trust cache decode errors.
#[derive(Debug, thiserror::Error)]
pub enum TrustCacheError {
    #[error("trust cache too short for header: {len} bytes")]
    TruncatedHeader { len: usize },

    #[error("unsupported trust cache version {0}")]
    UnsupportedVersion(u32),

    #[error("data size {actual} does not match expected size {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl TrustCacheError {
    /// Exit code for CLI, matching the chunklist error codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TruncatedHeader { .. } | Self::SizeMismatch { .. } | Self::Wire(_) => 101,
            Self::UnsupportedVersion(_) => 102,
            Self::Io(_) => 104,
        }
    }
}

pub type TrustCacheResult<T> = Result<T, TrustCacheError>;
