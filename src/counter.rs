//! K-mer count accumulation.
//!
//! [`CountTable`] maps k-mer bytes to counts. It uses an `FxHasher` hash map
//! internally, so iteration order is unspecified; [`CountTable::sorted`] gives
//! the deterministic lexicographic order the formatter relies on.
//!
//! [`Counter`] turns a sequence into k-mer increments according to the k-mer
//! length, strand mode and ambiguity policy.

use std::{collections::HashMap, hash::BuildHasherDefault};

use dashmap::DashMap;
use rustc_hash::FxHasher;

use crate::{
    alphabet::{canonicalize, AmbiguityPolicy},
    error::InvalidBaseError,
    kmer::{canonical, reverse_complement, KmerLength, Kmers, Strand},
};

type FxBuild = BuildHasherDefault<FxHasher>;

/// A custom `DashMap` w/ `FxHasher`.
type DashFx = DashMap<Vec<u8>, u64, FxBuild>;

/// Mapping from k-mer to the number of times it was observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    counts: HashMap<Vec<u8>, u64, FxBuild>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one observation of `kmer`.
    pub fn increment(&mut self, kmer: &[u8]) {
        self.add(kmer, 1);
    }

    /// Adds `n` observations of `kmer`.
    pub fn add(&mut self, kmer: &[u8], n: u64) {
        // Only allocate a key for k-mers not seen before.
        if let Some(count) = self.counts.get_mut(kmer) {
            *count += n;
        } else {
            self.counts.insert(kmer.to_vec(), n);
        }
    }

    /// Folds another table into this one.
    pub fn merge(&mut self, other: Self) {
        if self.counts.is_empty() {
            self.counts = other.counts;
            return;
        }
        for (kmer, n) in other.counts {
            *self.counts.entry(kmer).or_insert(0) += n;
        }
    }

    pub fn get(&self, kmer: impl AsRef<[u8]>) -> Option<u64> {
        self.counts.get(kmer.as_ref()).copied()
    }

    /// Number of distinct k-mers.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], u64)> {
        self.counts.iter().map(|(k, &n)| (k.as_slice(), n))
    }

    /// Entries sorted ascending by k-mer bytes.
    pub fn sorted(&self) -> Vec<(&[u8], u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

impl<'a> Extend<&'a [u8]> for CountTable {
    fn extend<I: IntoIterator<Item = &'a [u8]>>(&mut self, iter: I) {
        for kmer in iter {
            self.increment(kmer);
        }
    }
}

impl<'a> FromIterator<&'a [u8]> for CountTable {
    fn from_iter<I: IntoIterator<Item = &'a [u8]>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl IntoIterator for CountTable {
    type Item = (Vec<u8>, u64);
    type IntoIter = std::collections::hash_map::IntoIter<Vec<u8>, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

/// Concurrent count table for merging records counted on several threads.
#[derive(Debug, Default)]
pub struct SharedCountTable(DashFx);

impl SharedCountTable {
    pub fn new() -> Self {
        Self(DashMap::with_hasher(FxBuild::default()))
    }

    /// Adds every entry of `table`.
    pub fn absorb(&self, table: CountTable) {
        for (kmer, n) in table {
            *self.0.entry(kmer).or_insert(0) += n;
        }
    }

    pub fn into_table(self) -> CountTable {
        CountTable {
            counts: self.0.into_iter().collect(),
        }
    }
}

/// Extracts and counts k-mers from one sequence at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    k: KmerLength,
    strand: Strand,
    policy: AmbiguityPolicy,
}

impl Counter {
    pub const fn new(k: KmerLength) -> Self {
        Self {
            k,
            strand: Strand::Forward,
            policy: AmbiguityPolicy::Exclude,
        }
    }

    #[must_use]
    pub const fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub const fn k(&self) -> KmerLength {
        self.k
    }

    pub const fn strand(&self) -> Strand {
        self.strand
    }

    pub const fn policy(&self) -> AmbiguityPolicy {
        self.policy
    }

    /// Adds the k-mers of `seq` to `table` and returns the number of windows
    /// counted.
    ///
    /// # Errors
    ///
    /// Only under [`AmbiguityPolicy::Reject`], for the first non-`ACGT` byte.
    /// The table is left untouched in that case.
    pub fn tally(&self, seq: &[u8], table: &mut CountTable) -> Result<u64, InvalidBaseError> {
        self.policy.check(seq)?;

        let seq = canonicalize(seq);
        let mut windows = 0;
        for kmer in Kmers::new(&seq, self.k) {
            match self.strand {
                Strand::Forward => table.increment(kmer),
                Strand::Canonical => table.increment(&canonical(kmer)),
                Strand::Both => {
                    table.increment(kmer);
                    let rc = reverse_complement(kmer);
                    if rc != kmer {
                        table.increment(&rc);
                    }
                }
            }
            windows += 1;
        }
        Ok(windows)
    }

    /// Counts the k-mers of one sequence into a fresh table.
    pub fn count(&self, seq: &[u8]) -> Result<CountTable, InvalidBaseError> {
        let mut table = CountTable::new();
        self.tally(seq, &mut table)?;
        Ok(table)
    }
}
