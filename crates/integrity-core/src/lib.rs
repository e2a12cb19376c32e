//! Shared building blocks for the integrity decoders.
//!
//! - [`TypedHash`]: algorithm-tagged digests with truncation-aware comparison
//! - [`FieldReader`]: bounds-checked little-endian reading over seekable streams
//! - [`sha256_region`]: bounded-memory streaming SHA-256
//!
//! # Example
//!
//! ```
//! use integrity_core::{HashAlgorithm, TypedHash};
//!
//! let full = TypedHash::sha256_of(b"payload");
//! let truncated = TypedHash::new(HashAlgorithm::Sha256Truncated, &full.digest()[..20]).unwrap();
//! assert!(full.matches(&truncated).unwrap());
//! ```

pub mod digest;
pub mod hash;
pub mod wire;

pub use digest::{sha256_bytes, sha256_region, RegionDigest, DEFAULT_HASH_BUFFER, MAX_HASH_BUFFER};
pub use hash::{HashAlgorithm, HashError, TypedHash};
pub use wire::{FieldReader, WireError, WireResult};
