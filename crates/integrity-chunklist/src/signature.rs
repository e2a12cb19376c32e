//! Chunklist signature variants and their verification.

use std::io::{Read, Seek};

use rsa::sha2::Sha256;
use rsa::Pkcs1v15Sign;
use serde::Serialize;
use uuid::Uuid;

use integrity_core::{sha256_bytes, FieldReader};

use crate::anchors::{TrustAnchor, TrustAnchors};
use crate::error::{ChunklistError, ChunklistResult};
use crate::format::{SignatureMethod, RSA_2048_LEN};

/// PKCS#1 v1.5 signature scheme over a SHA-256 digest.
pub fn pkcs1v15_sha256() -> Pkcs1v15Sign {
    Pkcs1v15Sign::new::<Sha256>()
}

/// Raw RSA-2048 signature validated against a trust anchor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKeySignature {
    bytes: [u8; RSA_2048_LEN],
}

impl RawKeySignature {
    pub fn new(bytes: [u8; RSA_2048_LEN]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; RSA_2048_LEN] {
        &self.bytes
    }

    pub(crate) fn decode<R: Read + Seek>(reader: &mut FieldReader<R>) -> ChunklistResult<Self> {
        Ok(Self::new(reader.read_array("signature")?))
    }

    /// Try each anchor in order; the first that validates wins.
    pub fn verify(&self, signed: &[u8], anchors: &TrustAnchors) -> ChunklistResult<usize> {
        let digest = sha256_bytes(signed);
        for (index, anchor) in anchors.iter().enumerate() {
            match self.verify_with(anchor, &digest) {
                Ok(()) => {
                    tracing::debug!(index, key_id = %anchor.key_id(), "signature validated");
                    return Ok(index);
                }
                Err(e) => {
                    tracing::debug!(index, key_id = %anchor.key_id(), error = %e, "anchor rejected signature");
                }
            }
        }
        tracing::warn!(
            anchors = anchors.len(),
            "signature did not validate against any trust anchor"
        );
        Err(ChunklistError::NoValidSignature)
    }

    fn verify_with(&self, anchor: &TrustAnchor, digest: &[u8; 32]) -> rsa::Result<()> {
        anchor.key().verify(pkcs1v15_sha256(), digest, &self.bytes)
    }
}

/// Certificate-based signature: the signing key travels with the manifest.
///
/// Only the structure is decoded; validating the certificate against a
/// root of trust is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSignature {
    pub length: u32,
    pub revision: u8,
    pub security_epoch: u8,
    pub certificate_type: u16,
    pub certificate_guid: Uuid,
    pub hash_type_guid: Uuid,
    #[serde(with = "hex::serde")]
    pub rsa_public_key: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub rsa_signature: Vec<u8>,
}

impl CertificateSignature {
    /// Encoded size of the structure.
    pub const LEN: u64 = 4 + 1 + 1 + 2 + 16 + 16 + RSA_2048_LEN as u64 * 2;

    pub fn decode<R: Read + Seek>(reader: &mut FieldReader<R>) -> ChunklistResult<Self> {
        reader.ensure("certificate", Self::LEN)?;
        Ok(Self {
            length: reader.read_u32("certificate length")?,
            revision: reader.read_u8("certificate revision")?,
            security_epoch: reader.read_u8("certificate security epoch")?,
            certificate_type: reader.read_u16("certificate type")?,
            certificate_guid: Uuid::from_bytes_le(reader.read_array("certificate guid")?),
            hash_type_guid: Uuid::from_bytes_le(reader.read_array("hash type guid")?),
            rsa_public_key: reader.read_vec("certificate public key", RSA_2048_LEN as u64)?,
            rsa_signature: reader.read_vec("certificate signature", RSA_2048_LEN as u64)?,
        })
    }

    pub fn verify(&self, _signed: &[u8], _anchors: &TrustAnchors) -> ChunklistResult<usize> {
        Err(ChunklistError::NotImplemented("certificate signature verification"))
    }
}

/// Decoded signature block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    RawKey(RawKeySignature),
    Certificate(CertificateSignature),
}

impl Signature {
    pub fn method(&self) -> SignatureMethod {
        match self {
            Self::RawKey(_) => SignatureMethod::Rev1,
            Self::Certificate(_) => SignatureMethod::Rev2,
        }
    }

    /// Check the signature over `signed`, returning the index of the anchor
    /// that validated it.
    pub fn verify(&self, signed: &[u8], anchors: &TrustAnchors) -> ChunklistResult<usize> {
        match self {
            Self::RawKey(sig) => sig.verify(signed, anchors),
            Self::Certificate(sig) => sig.verify(signed, anchors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::traits::PublicKeyParts;
    use rsa::{BigUint, RsaPrivateKey};

    fn test_key() -> RsaPrivateKey {
        use rsa::pkcs1::DecodeRsaPrivateKey;
        RsaPrivateKey::from_pkcs1_pem(include_str!("../tests/fixtures/signer-a.key.pem")).unwrap()
    }

    fn sign(key: &RsaPrivateKey, data: &[u8]) -> RawKeySignature {
        let sig = key.sign(pkcs1v15_sha256(), &sha256_bytes(data)).unwrap();
        RawKeySignature::new(sig.try_into().unwrap())
    }

    fn decoy_anchor() -> TrustAnchor {
        let mut m = vec![0xa5_u8; RSA_2048_LEN];
        m[0] |= 0x80;
        m[RSA_2048_LEN - 1] |= 1;
        TrustAnchor::from_modulus(&m).unwrap()
    }

    #[test]
    fn test_raw_signature_first_matching_anchor() {
        let key = test_key();
        let public = key.to_public_key();
        assert_eq!(public.e(), &BigUint::from(65537u32));

        let sig = sign(&key, b"signed prefix");
        let anchors = TrustAnchors::new(vec![
            decoy_anchor(),
            TrustAnchor::new(public).unwrap(),
        ])
        .unwrap();

        assert_eq!(sig.verify(b"signed prefix", &anchors).unwrap(), 1);
        assert!(matches!(
            sig.verify(b"signed prefiX", &anchors),
            Err(ChunklistError::NoValidSignature)
        ));
    }

    #[test]
    fn test_certificate_decode_and_not_implemented() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&552u32.to_le_bytes());
        bytes.push(2);
        bytes.push(1);
        bytes.extend_from_slice(&0x0ef1u16.to_le_bytes());
        bytes.extend_from_slice(&[0x11; 16]);
        bytes.extend_from_slice(&[0x22; 16]);
        bytes.extend_from_slice(&[0x33; 256]);
        bytes.extend_from_slice(&[0x44; 256]);
        assert_eq!(bytes.len() as u64, CertificateSignature::LEN);

        let mut reader = FieldReader::from_slice(&bytes);
        let cert = CertificateSignature::decode(&mut reader).unwrap();
        assert_eq!(cert.length, 552);
        assert_eq!(cert.revision, 2);
        assert_eq!(cert.certificate_type, 0x0ef1);
        assert_eq!(cert.rsa_signature, vec![0x44; 256]);

        let anchors = TrustAnchors::new(vec![decoy_anchor()]).unwrap();
        let sig = Signature::Certificate(cert);
        assert_eq!(sig.method(), SignatureMethod::Rev2);
        assert!(matches!(
            sig.verify(b"", &anchors),
            Err(ChunklistError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_certificate_truncated() {
        let mut reader = FieldReader::from_slice(&[0_u8; 100]);
        assert!(matches!(
            CertificateSignature::decode(&mut reader),
            Err(ChunklistError::Wire(_))
        ));
    }
}
