//! Tests for memory-mapped I/O support.

#![cfg(feature = "mmap")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use kmer_counter::{builder::KmerCounter, input::InputFormat, mmap::MmapInput};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn render(path: &PathBuf, input: InputFormat, mmap: bool) -> Vec<u8> {
    let mut out = Vec::new();
    KmerCounter::new()
        .k(2)
        .unwrap()
        .mmap(mmap)
        .run_path(path, input, &mut out)
        .expect("should count k-mers");
    out
}

#[test]
fn mmap_input_open_and_read() {
    let mmap = MmapInput::open(fixture_path("simple.fa")).expect("should open file");
    assert!(!mmap.is_empty(), "file should not be empty");
    assert!(mmap.as_bytes().starts_with(b">seq1"));
}

#[test]
fn mmap_and_buffered_produce_same_output() {
    for (name, input) in [
        ("simple.fa", InputFormat::Fasta),
        ("with_n.fa", InputFormat::Fasta),
        ("intervals.bed", InputFormat::Bed),
    ] {
        let path = fixture_path(name);
        assert_eq!(render(&path, input, false), render(&path, input, true), "{name}");
    }
}

#[test]
fn mmap_cli_flag() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_kmer-counter"))
        .args(["--fasta", "-k", "4", "--mmap", "-q"])
        .arg(fixture_path("simple.fa"))
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with(">seq1\tACGT:2 "));
}
