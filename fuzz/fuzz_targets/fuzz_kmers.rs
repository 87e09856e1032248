//! Fuzz target for the sliding-window extractor.
//!
//! Checks against a naive scan:
//! 1. Same windows, in the same order
//! 2. Every yielded window has length k and only `ACGT` bases

#![no_main]

use kmer_counter::{
    alphabet::is_valid,
    kmer::{KmerLength, Kmers},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&k, seq)) = data.split_first() else {
        return;
    };
    let k = usize::from(k % 40) + 1;
    let Ok(k_len) = KmerLength::new(k) else {
        return;
    };

    let fast: Vec<&[u8]> = Kmers::new(seq, k_len).collect();
    let naive: Vec<&[u8]> = seq
        .windows(k)
        .filter(|w| w.iter().all(|&b| is_valid(b)))
        .collect();
    assert_eq!(fast, naive, "extractor disagrees with naive scan");

    for kmer in fast {
        assert_eq!(kmer.len(), k);
        assert!(kmer.iter().all(|&b| is_valid(b)));
    }
});
