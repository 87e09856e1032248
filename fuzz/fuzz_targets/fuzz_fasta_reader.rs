//! Fuzz target for the FASTA reader and line renderer.
//!
//! Arbitrary bytes must either fail cleanly or produce exactly one
//! newline-terminated line per record.

#![no_main]

use kmer_counter::{
    counter::Counter, kmer::KmerLength, pipeline::Pipeline, reader::FastaReader,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&k, input)) = data.split_first() else {
        return;
    };
    let Ok(k) = KmerLength::new(usize::from(k % 16) + 1) else {
        return;
    };

    let records = FastaReader::new(input).filter_map(Result::ok).count();

    let mut out = Vec::new();
    if Pipeline::new(Counter::new(k))
        .run(FastaReader::new(input), &mut out)
        .is_ok()
    {
        assert_eq!(out.iter().filter(|&&b| b == b'\n').count(), records);
        assert!(out.is_empty() || out.ends_with(b"\n"));
    }
});
