//! Trust cache decoding.
//!
//! A trust cache is a flat list of 20-byte code-identity hashes behind a
//! 24-byte header (version, UUID, count). Version 0 records are bare SHA-1
//! hashes; version 1 records add a hash type and flags byte.

pub mod cache;
pub mod entry;
pub mod error;

pub use cache::{TrustCache, TrustCacheVersion, HEADER_LEN};
pub use entry::{Entry, FLAG_AMFI, HASH_LEN};
pub use error::{TrustCacheError, TrustCacheResult};
