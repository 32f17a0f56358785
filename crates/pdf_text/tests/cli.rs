//! Runs the `extract-text` binary against lopdf-generated PDFs.

mod common;

use common::fixture;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn extract_text(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_extract-text"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run extract-text")
}

#[test]
fn prints_the_text_and_writes_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixture(&dir, "report.pdf", &[Some("Alpha"), Some("Bravo")]);
    let output = dir.path().join("report.txt");

    let run = extract_text(
        dir.path(),
        &[input.to_str().unwrap(), "-o", output.to_str().unwrap()],
    );

    assert!(run.status.success(), "stderr: {}", String::from_utf8_lossy(&run.stderr));
    let stdout = String::from_utf8(run.stdout).unwrap();
    assert!(stdout.contains("Alpha"), "{stdout}");
    assert!(stdout.contains("Bravo"), "{stdout}");
    assert!(stdout.find("Alpha") < stdout.find("Bravo"));

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(stdout, format!("{written}\n"));
}

#[test]
fn defaults_to_input_pdf_and_output_text_txt() {
    let dir = tempfile::tempdir().unwrap();
    fixture(&dir, "input.pdf", &[Some("Default paths")]);

    let run = extract_text(dir.path(), &[]);

    assert!(run.status.success(), "stderr: {}", String::from_utf8_lossy(&run.stderr));
    let written = fs::read_to_string(dir.path().join("output_text.txt")).unwrap();
    assert!(written.contains("Default paths"), "{written}");
    assert_eq!(String::from_utf8(run.stdout).unwrap(), format!("{written}\n"));
}

#[test]
fn missing_input_fails_without_printing_text() {
    let dir = tempfile::tempdir().unwrap();

    let run = extract_text(dir.path(), &["absent.pdf", "-o", "out.txt"]);

    assert!(!run.status.success());
    assert!(run.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(stderr.contains("PDF file not found"), "{stderr}");
    assert!(!dir.path().join("out.txt").exists());
}
