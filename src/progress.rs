//! Progress tracking for k-mer counting runs.
//!
//! The pipeline updates a [`ProgressTracker`] after every record and hands a
//! [`Progress`] snapshot to an optional callback. The final snapshot doubles
//! as the run summary.
//!
//! # Example
//!
//! ```rust
//! use kmer_counter::builder::KmerCounter;
//!
//! let input = b">a\nACGT\n>b\nGATTACA\n";
//! let mut out = Vec::new();
//! let summary = KmerCounter::new()
//!     .k(3)?
//!     .on_progress(|progress| {
//!         eprintln!(
//!             "Processed {} records ({} bases)",
//!             progress.records_processed, progress.bases_processed
//!         );
//!     })
//!     .run_fasta(&input[..], &mut out)?;
//! assert_eq!(summary.records_processed, 2);
//! # Ok::<(), kmer_counter::error::KmerCounterError>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress snapshot during k-mer counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of records processed so far.
    pub records_processed: u64,
    /// Total number of sequence bytes processed so far.
    pub bases_processed: u64,
    /// Number of k-mer windows counted so far.
    pub kmers_counted: u64,
}

/// Thread-safe progress tracker using atomic counters.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    records: AtomicU64,
    bases: AtomicU64,
    kmers: AtomicU64,
}

impl ProgressTracker {
    /// Create a new progress tracker with zero counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: AtomicU64::new(0),
            bases: AtomicU64::new(0),
            kmers: AtomicU64::new(0),
        }
    }

    /// Record that a record has been processed.
    ///
    /// This method is thread-safe and can be called from multiple threads.
    pub fn record(&self, bases: u64, kmers: u64) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.bases.fetch_add(bases, Ordering::Relaxed);
        self.kmers.fetch_add(kmers, Ordering::Relaxed);
    }

    /// Get a snapshot of the current progress.
    ///
    /// The returned values represent the state at a point in time and may
    /// change immediately after this call returns.
    pub fn snapshot(&self) -> Progress {
        Progress {
            records_processed: self.records.load(Ordering::Relaxed),
            bases_processed: self.bases.load(Ordering::Relaxed),
            kmers_counted: self.kmers.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.records.store(0, Ordering::Relaxed);
        self.bases.store(0, Ordering::Relaxed);
        self.kmers.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_starts_at_zero() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.snapshot(), Progress::default());
    }

    #[test]
    fn tracker_records() {
        let tracker = ProgressTracker::new();
        tracker.record(100, 96);
        tracker.record(50, 46);

        let progress = tracker.snapshot();
        assert_eq!(progress.records_processed, 2);
        assert_eq!(progress.bases_processed, 150);
        assert_eq!(progress.kmers_counted, 142);
    }

    #[test]
    fn tracker_reset() {
        let tracker = ProgressTracker::new();
        tracker.record(100, 1);
        tracker.reset();
        assert_eq!(tracker.snapshot(), Progress::default());
    }

    #[test]
    fn tracker_is_shared_across_threads() {
        let tracker = ProgressTracker::new();
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| tracker.record(10, 2));
            }
        });
        assert_eq!(tracker.snapshot().records_processed, 8);
        assert_eq!(tracker.snapshot().bases_processed, 80);
    }
}
