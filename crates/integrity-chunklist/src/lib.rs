//! Signed chunklist decoding and verification.
//!
//! A chunklist splits a large payload into consecutive chunks, stores the
//! SHA-256 of each, and signs the whole table with RSA-2048. Verifying a
//! payload means checking the signature against a set of trusted keys and
//! then re-hashing the payload chunk by chunk.
//!
//! ```no_run
//! use std::fs::File;
//! use integrity_chunklist::{Chunklist, TrustAnchors};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let anchors = TrustAnchors::from_pem_file("keys.pem")?;
//! let list = Chunklist::open("payload.chunklist")?;
//! let summary = list.verify(&mut File::open("payload.dmg")?, &anchors)?;
//! println!("{} chunks ok", summary.chunks_verified);
//! # Ok(())
//! # }
//! ```

pub mod anchors;
pub mod error;
pub mod format;
pub mod limits;
pub mod manifest;
pub mod signature;
pub mod verify;

pub use anchors::{TrustAnchor, TrustAnchors};
pub use error::{ChunklistError, ChunklistResult, ErrorClass, VerifyFailures};
pub use format::{ChunkLength, ChunkRecord, SignatureMethod};
pub use limits::{DecodeLimits, DecodeLimitsOverrides};
pub use manifest::{Chunklist, ChunklistHeader};
pub use signature::{CertificateSignature, RawKeySignature, Signature};
pub use verify::VerifySummary;
