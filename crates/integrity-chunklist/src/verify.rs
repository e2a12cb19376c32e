//! Target verification against a decoded chunklist.

use std::io::{self, Read, Seek, SeekFrom};

use serde::Serialize;

use integrity_core::sha256_region;

use crate::anchors::TrustAnchors;
use crate::error::{ChunklistError, VerifyFailures};
use crate::limits::DecodeLimits;
use crate::manifest::Chunklist;

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifySummary {
    pub chunks_verified: usize,
    pub bytes_hashed: u64,
    /// Position of the validating anchor in the supplied list.
    pub anchor_index: usize,
    pub anchor_id: String,
}

impl Chunklist {
    /// Verify `target` with default limits.
    pub fn verify<R: Read + Seek + ?Sized>(
        &self,
        target: &mut R,
        anchors: &TrustAnchors,
    ) -> Result<VerifySummary, VerifyFailures> {
        self.verify_with_limits(target, anchors, &DecodeLimits::default())
    }

    /// Check the manifest signature, then re-hash `target` chunk by chunk.
    ///
    /// A bad signature is reported alone and no chunk is hashed. Chunk
    /// mismatches are collected and hashing continues; a read error other
    /// than end-of-file stops the walk.
    pub fn verify_with_limits<R: Read + Seek + ?Sized>(
        &self,
        target: &mut R,
        anchors: &TrustAnchors,
        limits: &DecodeLimits,
    ) -> Result<VerifySummary, VerifyFailures> {
        let anchor_index = self
            .signature()
            .verify(self.signed_region(), anchors)
            .map_err(VerifyFailures::single)?;
        let anchor_id = anchors
            .get(anchor_index)
            .map(|a| a.key_id().to_string())
            .unwrap_or_default();

        let mut failures = Vec::new();
        let bytes_hashed = match self.walk_chunks(target, limits, &mut failures) {
            Ok(n) => n,
            Err(e) => {
                failures.push(ChunklistError::Io(e));
                0
            }
        };

        if let Some(failures) = VerifyFailures::from_vec(failures) {
            tracing::warn!(failures = failures.len(), "chunklist verification failed");
            return Err(failures);
        }

        tracing::info!(
            chunks = self.chunks().len(),
            bytes = bytes_hashed,
            key_id = %anchor_id,
            "chunklist verified"
        );
        Ok(VerifySummary {
            chunks_verified: self.chunks().len(),
            bytes_hashed,
            anchor_index,
            anchor_id,
        })
    }

    fn walk_chunks<R: Read + Seek + ?Sized>(
        &self,
        target: &mut R,
        limits: &DecodeLimits,
        failures: &mut Vec<ChunklistError>,
    ) -> io::Result<u64> {
        let stream_len = target.seek(SeekFrom::End(0))?;
        target.seek(SeekFrom::Start(0))?;

        let mut position = 0_u64;
        for (index, chunk) in self.chunks().iter().enumerate() {
            let expected = chunk.length.resolve(position, stream_len);
            let region = sha256_region(target, expected, limits.hash_buffer_bytes)?;
            position += region.bytes_read;

            if region.bytes_read < expected {
                tracing::debug!(index, expected, actual = region.bytes_read, "chunk truncated");
                failures.push(ChunklistError::TruncatedChunk {
                    index,
                    expected,
                    actual: region.bytes_read,
                });
            } else if region.digest != chunk.hash {
                tracing::debug!(index, "chunk hash mismatch");
                failures.push(ChunklistError::InvalidChunk { index });
            } else {
                tracing::trace!(index, bytes = expected, "chunk ok");
            }
        }
        Ok(position)
    }
}
