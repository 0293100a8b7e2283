//! Integration tests for the `cutprint compose` command.

mod common;

use std::path::PathBuf;
use std::process::{Command, Output};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cutprint-cli-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

fn cutprint(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cutprint"))
        .args(args)
        .env("CUTPRINT_SLOT_WIDTH", "100")
        .env("CUTPRINT_OUTPUT_FORMAT", "png")
        .env("RUST_LOG", "warn")
        .output()
        .expect("binary runs")
}

#[test]
fn cli_compose_tests_oversized_qr_still_writes_the_frame() {
    let dir = scratch_dir("qr");
    let out = dir.join("strip.png");
    let long_url = format!("https://cutprint.app/albums/2026/10/16/{}", "0123456789".repeat(12));

    let output = cutprint(&[
        "compose",
        "--synthetic",
        "--cut",
        "grid4",
        "--qr",
        &long_url,
        "--out",
        out.to_str().expect("utf-8 path"),
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stderr).contains("qr code dropped"));
    let written = image::open(&out).expect("output decodes");
    assert_eq!((written.width(), written.height()), (200, 200));
    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn cli_compose_tests_unreadable_photo_writes_original_and_decision() {
    let dir = scratch_dir("fallback");
    let first = dir.join("first.png");
    std::fs::write(&first, common::solid_png(30, 20, [10, 120, 200, 255])).expect("photo written");
    let missing = dir.join("missing.png");
    let out = dir.join("strip.png");
    let first = first.to_str().expect("utf-8 path");
    let missing = missing.to_str().expect("utf-8 path");

    let output = cutprint(&[
        "compose",
        "--out",
        out.to_str().expect("utf-8 path"),
        first,
        missing,
        missing,
        missing,
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("composition failed, using the original photo"));
    assert!(stderr.contains("\"kind\": \"file_error\""));
    assert!(stderr.contains("\"action\": \"terminal\""));
    let written = image::open(&out).expect("output decodes");
    assert_eq!((written.width(), written.height()), (30, 20));
    std::fs::remove_dir_all(dir).ok();
}
