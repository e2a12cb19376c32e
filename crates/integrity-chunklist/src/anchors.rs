//! Trust anchors for chunklist signature verification.
//!
//! A trust anchor is an RSA-2048 public key with exponent 65537 that is
//! accepted a priori. Anchors can come from:
//! - PEM text holding one or more `RSA PUBLIC KEY` (PKCS#1) or `PUBLIC KEY`
//!   (SPKI) blocks
//! - raw big-endian moduli
//! - a raw kernel key table (per key: 4-byte header word, 256-byte modulus)
//!
//! The list is ordered; verification tries anchors front to back, which lets
//! a rotated key sit next to its predecessor.

use std::path::Path;
use std::sync::Arc;

use rsa::pkcs1::{DecodeRsaPublicKey, EncodeRsaPublicKey, LineEnding};
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use x509_parser::pem::Pem;

use integrity_core::sha256_bytes;

use crate::error::{ChunklistError, ChunklistResult};
use crate::format::RSA_2048_LEN;

/// Fixed public exponent of every anchor.
pub const RSA_EXPONENT: u32 = 0x0001_0001;

const RSA_2048_BITS: usize = RSA_2048_LEN * 8;

/// One key-table entry: 4-byte header word followed by the modulus.
pub const KEY_TABLE_ENTRY_LEN: usize = 4 + RSA_2048_LEN;

const PEM_RSA_PUBLIC_KEY: &str = "RSA PUBLIC KEY";
const PEM_PUBLIC_KEY: &str = "PUBLIC KEY";

/// A trusted signing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    key: RsaPublicKey,
    key_id: String,
}

impl TrustAnchor {
    /// Wrap a public key, checking it is RSA-2048 with exponent 65537.
    pub fn new(key: RsaPublicKey) -> ChunklistResult<Self> {
        if key.n().bits() != RSA_2048_BITS {
            return Err(ChunklistError::InvalidKey {
                reason: format!("expected a 2048-bit modulus, got {} bits", key.n().bits()),
            });
        }
        if key.e() != &BigUint::from(RSA_EXPONENT) {
            return Err(ChunklistError::InvalidKey {
                reason: format!("unsupported public exponent {}", key.e()),
            });
        }
        let key_id = compute_key_id(&key);
        Ok(Self { key, key_id })
    }

    /// Build an anchor from a raw big-endian 2048-bit modulus.
    pub fn from_modulus(modulus: &[u8]) -> ChunklistResult<Self> {
        if modulus.len() != RSA_2048_LEN {
            return Err(ChunklistError::InvalidKey {
                reason: format!(
                    "modulus must be {} bytes, got {}",
                    RSA_2048_LEN,
                    modulus.len()
                ),
            });
        }
        let key = RsaPublicKey::new(
            BigUint::from_bytes_be(modulus),
            BigUint::from(RSA_EXPONENT),
        )
        .map_err(|e| ChunklistError::InvalidKey {
            reason: e.to_string(),
        })?;
        Self::new(key)
    }

    pub fn key(&self) -> &RsaPublicKey {
        &self.key
    }

    /// `sha256:` digest of the big-endian modulus.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Render as a PKCS#1 `RSA PUBLIC KEY` PEM block.
    pub fn to_pem(&self) -> ChunklistResult<String> {
        self.key
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| ChunklistError::InvalidKey {
                reason: format!("failed to encode public key: {}", e),
            })
    }
}

/// Ordered, non-empty set of trust anchors.
///
/// Cloning is cheap and the set is immutable, so one instance can be shared
/// across concurrent verifications.
#[derive(Debug, Clone)]
pub struct TrustAnchors {
    anchors: Arc<[TrustAnchor]>,
}

impl TrustAnchors {
    pub fn new(anchors: Vec<TrustAnchor>) -> ChunklistResult<Self> {
        if anchors.is_empty() {
            return Err(ChunklistError::NoTrustAnchors);
        }
        Ok(Self {
            anchors: anchors.into(),
        })
    }

    pub fn from_keys(keys: impl IntoIterator<Item = RsaPublicKey>) -> ChunklistResult<Self> {
        let anchors = keys
            .into_iter()
            .map(TrustAnchor::new)
            .collect::<ChunklistResult<Vec<_>>>()?;
        Self::new(anchors)
    }

    /// Parse every public key block in `pem`, in file order.
    ///
    /// Blocks with other labels (certificates, private keys) are skipped.
    pub fn from_pem(pem: &str) -> ChunklistResult<Self> {
        let mut anchors = Vec::new();
        for block in Pem::iter_from_buffer(pem.as_bytes()) {
            let block = block.map_err(|e| ChunklistError::InvalidKey {
                reason: format!("malformed PEM: {}", e),
            })?;
            let key = match block.label.as_str() {
                PEM_RSA_PUBLIC_KEY => RsaPublicKey::from_pkcs1_der(&block.contents).map_err(|e| {
                    ChunklistError::InvalidKey {
                        reason: format!("invalid PKCS#1 public key: {}", e),
                    }
                })?,
                PEM_PUBLIC_KEY => RsaPublicKey::from_public_key_der(&block.contents).map_err(|e| {
                    ChunklistError::InvalidKey {
                        reason: format!("invalid SPKI public key: {}", e),
                    }
                })?,
                other => {
                    tracing::warn!(label = %other, "skipping non-public-key PEM block");
                    continue;
                }
            };
            anchors.push(TrustAnchor::new(key)?);
        }
        tracing::debug!(count = anchors.len(), "loaded trust anchors from PEM");
        Self::new(anchors)
    }

    pub fn from_pem_file(path: impl AsRef<Path>) -> ChunklistResult<Self> {
        let pem = std::fs::read_to_string(path.as_ref())?;
        Self::from_pem(&pem)
    }

    /// Decode a raw key table: a sequence of 4-byte header words each
    /// followed by a 256-byte big-endian modulus.
    pub fn from_key_table(table: &[u8]) -> ChunklistResult<Self> {
        if table.is_empty() || table.len() % KEY_TABLE_ENTRY_LEN != 0 {
            return Err(ChunklistError::InvalidKey {
                reason: format!(
                    "key table length {} is not a non-zero multiple of {}",
                    table.len(),
                    KEY_TABLE_ENTRY_LEN
                ),
            });
        }
        let anchors = table
            .chunks_exact(KEY_TABLE_ENTRY_LEN)
            .map(|entry| TrustAnchor::from_modulus(&entry[4..]))
            .collect::<ChunklistResult<Vec<_>>>()?;
        Self::new(anchors)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Always false: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrustAnchor> {
        self.anchors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrustAnchor> {
        self.anchors.iter()
    }
}

fn compute_key_id(key: &RsaPublicKey) -> String {
    format!("sha256:{}", hex::encode(sha256_bytes(&key.n().to_bytes_be())))
}
