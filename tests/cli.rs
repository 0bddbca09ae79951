//! Exit-status tests for the `pdfimg` binary.
//!
//! None of these need pdfium: they stop at argument parsing or at the
//! library gate.

use std::process::{Command, Output};

fn pdfimg(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pdfimg"))
        .args(args)
        .env_remove("PDFIUM_LIB_PATH")
        .env_remove("PDFIMG_PASSWORD")
        .env_remove("PDFIMG_ORDER")
        .env_remove("PDFIMG_STAGING_DIR")
        .env_remove("PDFIMG_JSON")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pdfimg")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn test_no_arguments_is_a_usage_error() {
    let out = pdfimg(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"), "stderr: {}", stderr(&out));
}

#[test]
fn test_missing_output_is_a_usage_error() {
    let out = pdfimg(&["in.pdf"]);
    assert_eq!(out.status.code(), Some(1));
    let err = stderr(&out);
    assert!(err.contains("<OUTPUT>"), "stderr: {err}");
    assert!(err.contains("Usage"), "stderr: {err}");
}

#[test]
fn test_extra_argument_is_a_usage_error() {
    let out = pdfimg(&["in.pdf", "out.pdf", "extra"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Usage"), "stderr: {}", stderr(&out));
}

#[test]
fn test_unknown_order_is_a_usage_error() {
    let out = pdfimg(&["--order", "random", "in.pdf", "out.pdf"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_unconfigured_library_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");
    let out = pdfimg(&["--no-progress", "in.pdf", output.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(
        stderr(&out).contains("PDFium library is not configured"),
        "stderr: {}",
        stderr(&out)
    );
    assert!(!output.exists());
}

#[test]
fn test_list_without_output_reaches_library_gate() {
    let out = pdfimg(&["--list", "in.pdf"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("PDFium library is not configured"));
}

#[test]
fn test_help_exits_zero() {
    let out = pdfimg(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("one image per page"));
}
