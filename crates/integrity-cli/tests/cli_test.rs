#![allow(deprecated)]
//! CLI contract: exit codes and key output lines, without full-output matching.
//!
//! Fixtures:
//! - `integrity-chunklist/tests/fixtures`: signer keys, `sample.bin` and its
//!   signed `sample.chunklist`
//! - `fixtures/kernel-keys.bin`: key table holding signer-b then signer-a
//! - `fixtures/static.trustcache`: v1 cache with truncated sha256("alpha")
//!   (type 2, AMFI) and sha1("beta") (type 1)

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const ALPHA_SHA256: &str = "8ed3f6ad685b959ead7022518e1af76cd816f8e8ec7ccdda1ed4018e8f2223f8";
const BETA_SHA1: &str = "a295e0bdde1938d1fbfd343e5a3e569e868e1465";

fn chunklist_fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../integrity-chunklist/tests/fixtures")
        .join(name)
}

fn cli_fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn integrity() -> Command {
    let mut cmd = Command::cargo_bin("integrity").unwrap();
    cmd.env_remove("INTEGRITY_KEYS")
        .env_remove("INTEGRITY_LIMITS")
        .env_remove("RUST_LOG");
    cmd
}

/// Payload and chunklist side by side, as the default path lookup expects.
fn payload_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("InstallAssistant.pkg");
    std::fs::copy(chunklist_fixture("sample.bin"), &target).unwrap();
    std::fs::copy(
        chunklist_fixture("sample.chunklist"),
        dir.path().join("InstallAssistant.chunklist"),
    )
    .unwrap();
    (dir, target)
}

#[test]
fn verify_golden_payload_succeeds() {
    let (_dir, target) = payload_dir();
    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(chunklist_fixture("signer-a.pub.pem"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("OK: 3 chunks, 10000 bytes verified"));
}

#[test]
fn verify_reads_keys_from_env() {
    let (_dir, target) = payload_dir();
    integrity()
        .env("INTEGRITY_KEYS", chunklist_fixture("signer-a.pub.pem"))
        .args(["chunklist", "verify", "-q"])
        .arg(&target)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

#[test]
fn verify_tampered_payload_exits_with_failure_count() {
    let (_dir, target) = payload_dir();
    let mut bytes = std::fs::read(&target).unwrap();
    bytes[0] ^= 0xff;
    bytes[9_000] ^= 0xff;
    std::fs::write(&target, bytes).unwrap();

    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(chunklist_fixture("signer-a.pub.pem"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid chunk 0"))
        .stderr(predicate::str::contains("invalid chunk 2"));
}

#[test]
fn usage_errors_stay_clear_of_failure_counts() {
    integrity()
        .args(["chunklist", "verify", "--no-such-flag"])
        .assert()
        .code(105)
        .stderr(predicate::str::contains("--no-such-flag"));

    integrity().arg("frobnicate").assert().code(105);

    integrity()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("chunklist"));
}

#[test]
fn verify_untrusted_key_fails_once() {
    let (_dir, target) = payload_dir();
    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(chunklist_fixture("signer-b.pub.pem"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no valid signature"));
}

#[test]
fn verify_refuses_chunklist_as_target() {
    integrity()
        .args(["chunklist", "verify"])
        .arg(chunklist_fixture("sample.chunklist"))
        .arg("--keys")
        .arg(chunklist_fixture("signer-a.pub.pem"))
        .assert()
        .code(105)
        .stderr(predicate::str::contains("is itself a chunklist"));
}

#[test]
fn verify_missing_keys_file_is_io_error() {
    let (dir, target) = payload_dir();
    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(dir.path().join("keys.pem"))
        .assert()
        .code(104)
        .stderr(predicate::str::contains("failed to load trust anchors"));
}

#[test]
fn verify_malformed_chunklist_is_structural_error() {
    let (dir, target) = payload_dir();
    std::fs::write(dir.path().join("InstallAssistant.chunklist"), b"not a chunklist at all").unwrap();
    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(chunklist_fixture("signer-a.pub.pem"))
        .assert()
        .code(101)
        .stderr(predicate::str::contains("bad magic"));
}

#[test]
fn verify_honours_limits_file() {
    let (dir, target) = payload_dir();
    let limits = dir.path().join("limits.json");
    std::fs::write(&limits, r#"{"max_chunk_count": 2}"#).unwrap();
    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(chunklist_fixture("signer-a.pub.pem"))
        .arg("--limits")
        .arg(&limits)
        .assert()
        .code(101)
        .stderr(predicate::str::contains("exceeds limit 2"));

    std::fs::write(&limits, r#"{"max_chunks": 2}"#).unwrap();
    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(chunklist_fixture("signer-a.pub.pem"))
        .arg("--limits")
        .arg(&limits)
        .assert()
        .code(105)
        .stderr(predicate::str::contains("failed to parse limits file"));
}

#[test]
fn inspect_json_reports_header_and_chunks() {
    let output = integrity()
        .args(["chunklist", "inspect", "--json"])
        .arg(chunklist_fixture("sample.chunklist"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["header"]["chunk_count"], 3);
    assert_eq!(report["header"]["signature_offset"], 144);
    assert_eq!(report["signed_region_len"], 144);
    assert_eq!(report["chunks"][2]["length"], 0);
}

#[test]
fn inspect_text_marks_remainder_chunk() {
    integrity()
        .args(["chunklist", "inspect"])
        .arg(chunklist_fixture("sample.chunklist"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("chunk count:        3"))
        .stdout(predicate::str::contains("rest"));
}

#[test]
fn trustcache_dump_text_and_json() {
    integrity()
        .args(["trustcache", "dump"])
        .arg(cli_fixture("static.trustcache"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("entries: 2"))
        .stdout(predicate::str::contains(format!("{}  type=1", BETA_SHA1)));

    let output = integrity()
        .args(["trustcache", "dump", "--json"])
        .arg(cli_fixture("static.trustcache"))
        .output()
        .unwrap();
    let dump: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dump["version"], "v1");
    assert_eq!(dump["entries"][0]["hash"], &ALPHA_SHA256[..40]);
}

#[test]
fn trustcache_lookup_exit_codes() {
    // Full SHA-256 matches the truncated entry.
    integrity()
        .args(["trustcache", "lookup"])
        .arg(cli_fixture("static.trustcache"))
        .arg(ALPHA_SHA256)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("found: entry 0"));

    integrity()
        .args(["trustcache", "lookup", "--algorithm", "sha1"])
        .arg(cli_fixture("static.trustcache"))
        .arg(BETA_SHA1)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("found: entry 1"));

    integrity()
        .args(["trustcache", "lookup", "--algorithm", "sha256-truncated"])
        .arg(cli_fixture("static.trustcache"))
        .arg("00".repeat(20))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not found"));

    integrity()
        .args(["trustcache", "lookup"])
        .arg(cli_fixture("static.trustcache"))
        .arg("zz")
        .assert()
        .code(105);
}

#[test]
fn trustcache_truncated_file_is_structural_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.trustcache");
    let mut bytes = std::fs::read(cli_fixture("static.trustcache")).unwrap();
    bytes.pop();
    std::fs::write(&path, bytes).unwrap();

    integrity()
        .args(["trustcache", "dump"])
        .arg(&path)
        .assert()
        .code(101)
        .stderr(predicate::str::contains("does not match expected size"));
}

#[test]
fn keys_export_round_trips_through_verify() {
    let output = integrity()
        .args(["keys", "export"])
        .arg(cli_fixture("kernel-keys.bin"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let pem = String::from_utf8(output.stdout).unwrap();
    assert_eq!(pem.matches("-----BEGIN RSA PUBLIC KEY-----").count(), 2);

    // signer-a is the second key in the table; rotation keeps it usable.
    let (dir, target) = payload_dir();
    let keys = dir.path().join("keys.pem");
    std::fs::write(&keys, pem).unwrap();
    integrity()
        .args(["chunklist", "verify"])
        .arg(&target)
        .arg("--keys")
        .arg(&keys)
        .assert()
        .code(0);
}

#[test]
fn keys_export_rejects_ragged_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.bin");
    std::fs::write(&path, [0_u8; 300]).unwrap();

    integrity()
        .args(["keys", "export"])
        .arg(&path)
        .assert()
        .code(103)
        .stderr(predicate::str::contains("not a non-zero multiple of 260"));
}
