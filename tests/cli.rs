//! CLI argument handling and failure exits, no live backend.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("portrait-to-talking").unwrap();
    cmd.env_remove("PORTRAIT_TO_TALKING_REPLAY")
        .env_remove("PORTRAIT_TO_TALKING_REC")
        .env_remove("ECHOMIMIC_URL")
        .env("PORTRAIT_TO_TALKING_CONFIG", "/nonexistent/portrait-to-talking.toml");
    cmd
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("portrait-to-talking 0.1.0"));
}

#[test]
fn missing_image_exits_with_error() {
    cmd().assert().failure().stderr(predicate::str::contains("<IMAGE>"));
}

#[test]
fn invalid_face_crop_ratio_exits_with_error() {
    cmd()
        .args(["--face-crop-ratio", "0", "face.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported face crop ratio"));
}

#[test]
fn zero_height_exits_with_error() {
    cmd()
        .args(["--height", "0", "face.jpg"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unsupported height"));
}

#[test]
fn malformed_extra_exits_with_error() {
    cmd()
        .args(["--extra", "novalue", "face.jpg"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Expected KEY=VALUE"));
}

#[test]
fn unreachable_service_exits_with_request_failure() {
    cmd()
        .args(["--echomimic-url", "http://127.0.0.1:9/a2v", "--timeout", "5", "face.jpg"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: EchoMimic request failed:"));
}
