//! Test-only chunklist encoder and signer.
#![allow(dead_code)]

use integrity_chunklist::signature::pkcs1v15_sha256;
use integrity_chunklist::TrustAnchors;
use integrity_core::sha256_bytes;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::RsaPrivateKey;

pub const SIGNER_A_KEY: &str = include_str!("../fixtures/signer-a.key.pem");
pub const SIGNER_A_PUB: &str = include_str!("../fixtures/signer-a.pub.pem");
pub const SIGNER_B_KEY: &str = include_str!("../fixtures/signer-b.key.pem");
pub const SIGNER_B_PUB: &str = include_str!("../fixtures/signer-b.pub.pem");

pub const SAMPLE_TARGET: &[u8] = include_bytes!("../fixtures/sample.bin");
pub const SAMPLE_CHUNKLIST: &[u8] = include_bytes!("../fixtures/sample.chunklist");

pub fn signer_a() -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs1_pem(SIGNER_A_KEY).unwrap()
}

pub fn signer_b() -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs1_pem(SIGNER_B_KEY).unwrap()
}

pub fn anchors(pems: &[&str]) -> TrustAnchors {
    TrustAnchors::from_pem(&pems.join("\n")).unwrap()
}

/// Deterministic payload bytes.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 + 7) as u8).collect()
}

/// Builds a signed method-1 chunklist for `target` split at `sizes`.
///
/// A size of zero is written as-is and covers the rest of the target.
pub struct Encoder<'a> {
    pub target: &'a [u8],
    pub sizes: Vec<u32>,
    pub version: u8,
    /// Gap between the chunk table and the signature.
    pub padding: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(target: &'a [u8], sizes: &[u32]) -> Self {
        Self {
            target,
            sizes: sizes.to_vec(),
            version: 1,
            padding: 0,
        }
    }

    /// Header, chunk table and padding: everything the signature covers.
    pub fn body(&self) -> Vec<u8> {
        let count = self.sizes.len() as u64;
        let table_offset = 36_u64;
        let signature_offset = table_offset + 36 * count + self.padding as u64;

        let mut out = Vec::new();
        out.extend_from_slice(&0x4C4B_4E43_u32.to_le_bytes());
        out.extend_from_slice(&36_u32.to_le_bytes());
        out.extend_from_slice(&[self.version, 1, 1, 0]);
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&table_offset.to_le_bytes());
        out.extend_from_slice(&signature_offset.to_le_bytes());

        let mut pos = 0_usize;
        for &size in &self.sizes {
            let len = if size == 0 {
                self.target.len().saturating_sub(pos)
            } else {
                size as usize
            };
            let end = (pos + len).min(self.target.len());
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&sha256_bytes(&self.target[pos.min(end)..end]));
            pos += len;
        }
        out.resize(out.len() + self.padding, 0);
        out
    }

    pub fn sign(&self, key: &RsaPrivateKey) -> Vec<u8> {
        let mut out = self.body();
        let signature = key
            .sign(pkcs1v15_sha256(), &sha256_bytes(&out))
            .unwrap();
        out.extend_from_slice(&signature);
        out
    }
}
