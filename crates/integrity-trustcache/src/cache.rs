use std::path::Path;

use serde::Serialize;
use uuid::Uuid;

use integrity_core::{FieldReader, TypedHash};

use crate::entry::{Entry, HASH_LEN};
use crate::error::{TrustCacheError, TrustCacheResult};

pub const HEADER_LEN: usize = 24;

/// Record layout revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustCacheVersion {
    V0,
    V1,
}

impl TrustCacheVersion {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::V0),
            1 => Some(Self::V1),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }

    /// Encoded size of one record.
    pub fn entry_len(self) -> u64 {
        match self {
            Self::V0 => HASH_LEN as u64,
            Self::V1 => HASH_LEN as u64 + 2,
        }
    }
}

/// A decoded trust cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustCache {
    version: TrustCacheVersion,
    uuid: Uuid,
    entries: Vec<Entry>,
}

impl TrustCache {
    /// Decode a complete trust cache image.
    ///
    /// The total length must be exactly the header plus `count` records;
    /// anything else is rejected before any record is read.
    pub fn parse(data: &[u8]) -> TrustCacheResult<Self> {
        if data.len() < HEADER_LEN {
            return Err(TrustCacheError::TruncatedHeader { len: data.len() });
        }
        let mut reader = FieldReader::from_slice(data);
        let raw_version = reader.read_u32("version")?;
        let uuid = Uuid::from_bytes(reader.read_array("uuid")?);
        let count = reader.read_u32("entry count")?;

        let version = TrustCacheVersion::from_raw(raw_version)
            .ok_or(TrustCacheError::UnsupportedVersion(raw_version))?;

        let expected = u64::from(count)
            .checked_mul(version.entry_len())
            .and_then(|n| n.checked_add(HEADER_LEN as u64))
            .unwrap_or(u64::MAX);
        let actual = data.len() as u64;
        if actual != expected {
            return Err(TrustCacheError::SizeMismatch { expected, actual });
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let hash = reader.read_array::<HASH_LEN>("entry hash")?;
            let entry = match version {
                TrustCacheVersion::V0 => Entry::V0 { hash },
                TrustCacheVersion::V1 => Entry::V1 {
                    hash,
                    hash_type: reader.read_u8("entry hash type")?,
                    flags: reader.read_u8("entry flags")?,
                },
            };
            entries.push(entry);
        }

        tracing::debug!(version = raw_version, %uuid, count, "decoded trust cache");
        Ok(Self {
            version,
            uuid,
            entries,
        })
    }

    pub fn open(path: impl AsRef<Path>) -> TrustCacheResult<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::parse(&data)
    }

    pub fn version(&self) -> TrustCacheVersion {
        self.version
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// First entry whose hash matches `needle`.
    ///
    /// Entries that cannot be compared with the needle (unknown hash type,
    /// SHA-1 against a truncated SHA-256) are skipped.
    pub fn find(&self, needle: &TypedHash) -> Option<(usize, &Entry)> {
        self.entries.iter().enumerate().find(|(index, entry)| {
            let candidate = match entry.typed_hash() {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::debug!(index, error = %e, "skipping unreadable entry");
                    return false;
                }
            };
            match needle.matches(&candidate) {
                Ok(found) => found,
                Err(e) => {
                    tracing::trace!(index, error = %e, "entry not comparable");
                    false
                }
            }
        })
    }

    pub fn contains(&self, needle: &TypedHash) -> bool {
        self.find(needle).is_some()
    }
}
