use std::io::{self, Read};

use sha2::{Digest, Sha256};

/// Default streaming buffer (32 KiB).
pub const DEFAULT_HASH_BUFFER: usize = 32 * 1024;
/// Largest streaming buffer ever allocated (16 MiB).
pub const MAX_HASH_BUFFER: usize = 16 * 1024 * 1024;

/// SHA-256 over a bounded region of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDigest {
    pub digest: [u8; 32],
    /// Bytes actually consumed; less than requested when the stream ended early.
    pub bytes_read: u64,
}

/// Hash at most `len` bytes from `reader` using reads of `buffer_size` bytes.
///
/// Memory use is bounded by the buffer, not by `len`. The buffer size is
/// clamped to `1..=MAX_HASH_BUFFER`.
pub fn sha256_region<R: Read + ?Sized>(
    reader: &mut R,
    len: u64,
    buffer_size: usize,
) -> io::Result<RegionDigest> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0_u8; buffer_size.clamp(1, MAX_HASH_BUFFER)];
    let mut limited = reader.take(len);
    let mut bytes_read = 0_u64;

    loop {
        let n = match limited.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        bytes_read += n as u64;
    }

    Ok(RegionDigest {
        digest: finalize(hasher),
        bytes_read,
    })
}

pub fn sha256_bytes(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    finalize(hasher)
}

fn finalize(hasher: Sha256) -> [u8; 32] {
    let out = hasher.finalize();
    let mut digest = [0_u8; 32];
    digest.copy_from_slice(&out[..]);
    digest
}
