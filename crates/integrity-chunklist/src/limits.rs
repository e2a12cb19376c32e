//! Resource limits for chunklist decoding and verification.

use serde::Deserialize;

use integrity_core::{DEFAULT_HASH_BUFFER, MAX_HASH_BUFFER};

/// Resource limits applied to attacker-controlled manifest fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_chunk_count: u64,
    pub max_signed_region_bytes: u64,
    /// Read buffer used while hashing target chunks, at most
    /// `MAX_HASH_BUFFER` bytes.
    pub hash_buffer_bytes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_chunk_count: 1 << 20,
            max_signed_region_bytes: 64 * 1024 * 1024, // 64 MB
            hash_buffer_bytes: DEFAULT_HASH_BUFFER,
        }
    }
}

/// Partial overrides for `DecodeLimits`. Used for CLI/config JSON parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecodeLimitsOverrides {
    pub max_chunk_count: Option<u64>,
    pub max_signed_region_bytes: Option<u64>,
    pub hash_buffer_bytes: Option<usize>,
}

impl DecodeLimitsOverrides {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl DecodeLimits {
    /// Apply overrides onto these defaults. Only `Some` values override.
    ///
    /// The hash buffer is clamped to `1..=MAX_HASH_BUFFER`.
    pub fn apply(self, overrides: DecodeLimitsOverrides) -> Self {
        Self {
            max_chunk_count: overrides.max_chunk_count.unwrap_or(self.max_chunk_count),
            max_signed_region_bytes: overrides
                .max_signed_region_bytes
                .unwrap_or(self.max_signed_region_bytes),
            hash_buffer_bytes: overrides
                .hash_buffer_bytes
                .unwrap_or(self.hash_buffer_bytes)
                .clamp(1, MAX_HASH_BUFFER),
        }
    }
}
