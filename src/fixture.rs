//! Reproducible random FASTA input for tests and benchmarks.
//!
//! # Example
//!
//! ```rust
//! use kmer_counter::fixture::SequenceGenerator;
//!
//! let mut out = Vec::new();
//! SequenceGenerator::new(7).write_fasta(&mut out, 2, 5)?;
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with(">0\n"));
//! assert_eq!(text.lines().count(), 4);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};

use rand::{rngs::StdRng, Rng, SeedableRng};

const BASES: &[u8; 4] = b"ACTG";

/// Seeded generator of uniformly random DNA.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    rng: StdRng,
}

impl SequenceGenerator {
    /// The same seed always yields the same sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `len` bases drawn uniformly from `ACTG`.
    pub fn sequence(&mut self, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| BASES[self.rng.gen_range(0..BASES.len())])
            .collect()
    }

    /// Writes `count` records named `0..count`, each one line of `len` bases.
    pub fn write_fasta<W: Write>(&mut self, mut out: W, count: usize, len: usize) -> io::Result<()> {
        for i in 0..count {
            writeln!(out, ">{i}")?;
            out.write_all(&self.sequence(len))?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}
