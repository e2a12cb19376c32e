mod common;

use common::{SIGNER_A_KEY, SIGNER_A_PUB, SIGNER_B_PUB};
use integrity_chunklist::{ChunklistError, ErrorClass, TrustAnchors};

const SIGNER_B_SPKI: &str = include_str!("fixtures/signer-b.spki.pem");

#[test]
fn test_pem_bundle_keeps_file_order() {
    let bundle = format!("{}\n{}", SIGNER_B_PUB, SIGNER_A_PUB);
    let anchors = TrustAnchors::from_pem(&bundle).unwrap();
    assert_eq!(anchors.len(), 2);

    let a = TrustAnchors::from_pem(SIGNER_A_PUB).unwrap();
    assert_eq!(
        anchors.get(1).unwrap().key_id(),
        a.get(0).unwrap().key_id()
    );
}

#[test]
fn test_spki_and_pkcs1_forms_agree() {
    let pkcs1 = TrustAnchors::from_pem(SIGNER_B_PUB).unwrap();
    let spki = TrustAnchors::from_pem(SIGNER_B_SPKI).unwrap();
    assert_eq!(
        pkcs1.get(0).unwrap().key_id(),
        spki.get(0).unwrap().key_id()
    );
}

#[test]
fn test_private_key_blocks_are_ignored() {
    let bundle = format!("{}\n{}", SIGNER_A_KEY, SIGNER_A_PUB);
    assert_eq!(TrustAnchors::from_pem(&bundle).unwrap().len(), 1);

    let err = TrustAnchors::from_pem(SIGNER_A_KEY).unwrap_err();
    assert!(matches!(err, ChunklistError::NoTrustAnchors));
    assert_eq!(err.class(), ErrorClass::Key);
}

#[test]
fn test_corrupt_pem_body_is_key_error() {
    let pem = "-----BEGIN RSA PUBLIC KEY-----\nnot base64!\n-----END RSA PUBLIC KEY-----\n";
    let err = TrustAnchors::from_pem(pem).unwrap_err();
    assert!(matches!(err, ChunklistError::InvalidKey { .. }));
    assert_eq!(err.exit_code(), 103);
}

#[test]
fn test_from_pem_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.pem");
    std::fs::write(&path, format!("{}{}", SIGNER_A_PUB, SIGNER_B_SPKI)).unwrap();
    assert_eq!(TrustAnchors::from_pem_file(&path).unwrap().len(), 2);

    let missing = TrustAnchors::from_pem_file(dir.path().join("absent.pem")).unwrap_err();
    assert_eq!(missing.class(), ErrorClass::Io);
}

#[test]
fn test_anchors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<TrustAnchors>();
    assert_send_sync::<integrity_chunklist::Chunklist>();
}
