//! K-mer extraction.
//!
//! [`Kmers`] slides a window of length k across a sequence and yields every
//! window made only of `ACGT` bases, left to right. It keeps a running count of
//! disqualifying bases inside the window and updates it at the two edges on
//! each shift, so a whole sequence is scanned in O(length) regardless of k.
//!
//! # Example
//!
//! ```rust
//! use kmer_counter::kmer::{KmerLength, Kmers};
//!
//! let k = KmerLength::new(3)?;
//! let kmers: Vec<&[u8]> = Kmers::new(b"AAANAA", k).collect();
//! assert_eq!(kmers, vec![&b"AAA"[..]]);
//! # Ok::<(), kmer_counter::error::KmerLengthError>(())
//! ```

use std::borrow::Cow;

use bio::alphabets::dna::revcomp;
use clap::ValueEnum;

use crate::{alphabet::is_valid, error::KmerLengthError};

/// A validated k-mer length (k ≥ 1).
///
/// There is no upper bound: a record shorter than k simply yields no k-mers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KmerLength(usize);

impl KmerLength {
    /// Smallest accepted k.
    pub const MIN: usize = 1;

    /// Validates a k-mer length.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] when `k` is zero.
    pub const fn new(k: usize) -> Result<Self, KmerLengthError> {
        if k < Self::MIN {
            return Err(KmerLengthError { k });
        }
        Ok(Self(k))
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// Number of windows a sequence of `len` bases has, ignoring validity.
    pub const fn windows(self, len: usize) -> usize {
        (len + 1).saturating_sub(self.0)
    }
}

impl TryFrom<usize> for KmerLength {
    type Error = KmerLengthError;

    fn try_from(k: usize) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl std::fmt::Display for KmerLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which strand(s) a window contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strand {
    /// Count k-mers exactly as read.
    #[default]
    Forward,
    /// Count the lexicographically smaller of a k-mer and its reverse complement.
    Canonical,
    /// Count a k-mer and its reverse complement; palindromes once.
    Both,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Canonical => write!(f, "canonical"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Reverse complement of an uppercase `ACGT` k-mer.
pub fn reverse_complement(kmer: &[u8]) -> Vec<u8> {
    revcomp(kmer)
}

/// The lexicographically smaller of a k-mer and its reverse complement.
pub fn canonical(kmer: &[u8]) -> Cow<'_, [u8]> {
    let rc = reverse_complement(kmer);
    if rc.as_slice() < kmer {
        Cow::Owned(rc)
    } else {
        Cow::Borrowed(kmer)
    }
}

/// Iterator over the valid k-mers of a sequence.
///
/// The sequence is expected to be uppercase already (see
/// [`canonicalize`](crate::alphabet::canonicalize)); lowercase nucleotides
/// are still accepted as valid but are yielded unchanged.
#[derive(Debug, Clone)]
pub struct Kmers<'a> {
    seq: &'a [u8],
    k: usize,
    /// Exclusive end of the last window pushed.
    end: usize,
    /// Disqualifying bases in `seq[end + 1 - k..end]`.
    invalid: usize,
}

impl<'a> Kmers<'a> {
    pub fn new(seq: &'a [u8], k: KmerLength) -> Self {
        let k = k.get();
        let primed = (k - 1).min(seq.len());
        let invalid = seq[..primed].iter().filter(|&&b| !is_valid(b)).count();
        Self {
            seq,
            k,
            end: primed,
            invalid,
        }
    }
}

impl<'a> Iterator for Kmers<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        while self.end < self.seq.len() {
            if !is_valid(self.seq[self.end]) {
                self.invalid += 1;
            }
            self.end += 1;

            let start = self.end - self.k;
            let window_ok = self.invalid == 0;

            // The leftmost base leaves before the next shift.
            if !is_valid(self.seq[start]) {
                self.invalid -= 1;
            }

            if window_ok {
                return Some(&self.seq[start..self.end]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.seq.len() - self.end;
        (0, Some(remaining))
    }
}

impl std::iter::FusedIterator for Kmers<'_> {}
