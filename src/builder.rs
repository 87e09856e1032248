//! Builder pattern API for ergonomic k-mer counting.
//!
//! This module provides a fluent builder interface for configuring and
//! executing a counting run over any buffered reader or file.
//!
//! # Example
//!
//! ```rust
//! use kmer_counter::builder::KmerCounter;
//!
//! let mut out = Vec::new();
//! KmerCounter::new()
//!     .k(4)?
//!     .run_fasta(&b">0\nACGTACGT\n"[..], &mut out)?;
//! assert_eq!(out, b">0\tACGT:2 CGTA:1 GTAC:1 TACG:1\n");
//! # Ok::<(), kmer_counter::error::KmerCounterError>(())
//! ```

use std::{
    fmt,
    io::{BufRead, Write},
    path::Path,
    sync::Arc,
};

use crate::{
    alphabet::AmbiguityPolicy,
    counter::Counter,
    error::{KmerCounterError, KmerLengthError},
    format::{Formatter, OutputFormat},
    input::{Input, InputFormat},
    keymap::KeyMap,
    kmer::{KmerLength, Strand},
    pipeline::{CountMode, Pipeline, ProgressFn},
    progress::Progress,
    reader::{BedReader, FastaReader},
};

pub use crate::pipeline::RecordCounts;

/// A builder for configuring k-mer counting runs.
///
/// Use [`KmerCounter::new()`] to create a new builder, configure it with the
/// fluent API, then call one of the `run_*` or `count_*` methods.
///
/// # Example
///
/// ```rust
/// use kmer_counter::{builder::KmerCounter, kmer::Strand, pipeline::CountMode};
///
/// let counts = KmerCounter::new()
///     .k(2)?
///     .strand(Strand::Canonical)
///     .mode(CountMode::Merge)
///     .count_fasta(&b">a\nAAC\n>b\nGTT\n"[..])?;
///
/// assert_eq!(counts.len(), 1);
/// assert_eq!(counts[0].table.get("AA"), Some(2));
/// # Ok::<(), kmer_counter::error::KmerCounterError>(())
/// ```
#[derive(Clone, Default)]
pub struct KmerCounter {
    k: Option<KmerLength>,
    mode: CountMode,
    strand: Strand,
    policy: AmbiguityPolicy,
    min_count: Option<u64>,
    format: OutputFormat,
    offset: Option<u64>,
    threads: Option<usize>,
    mmap: bool,
    progress: Option<ProgressFn>,
}

impl fmt::Debug for KmerCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KmerCounter")
            .field("k", &self.k)
            .field("mode", &self.mode)
            .field("strand", &self.strand)
            .field("policy", &self.policy)
            .field("min_count", &self.min_count)
            .field("format", &self.format)
            .field("offset", &self.offset)
            .field("threads", &self.threads)
            .field("mmap", &self.mmap)
            .finish_non_exhaustive()
    }
}

impl KmerCounter {
    /// Creates a new builder with default settings.
    ///
    /// Default settings:
    /// - `k`: None (must be set before counting)
    /// - `mode`: one line per record
    /// - `strand`: forward only
    /// - `policy`: skip windows with ambiguous bases
    /// - `min_count`: 1 (include all k-mers)
    /// - `format`: `>header\tKMER:COUNT ...` lines
    /// - `threads`: 1 (sequential)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the k-mer length.
    ///
    /// # Errors
    ///
    /// Returns [`KmerLengthError`] if `k` is zero.
    pub fn k(mut self, k: usize) -> Result<Self, KmerLengthError> {
        self.k = Some(KmerLength::new(k)?);
        Ok(self)
    }

    /// Sets the k-mer length from a pre-validated `KmerLength`.
    #[must_use]
    pub const fn k_validated(mut self, k: KmerLength) -> Self {
        self.k = Some(k);
        self
    }

    #[must_use]
    pub const fn mode(mut self, mode: CountMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    #[must_use]
    pub const fn policy(mut self, policy: AmbiguityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the minimum count threshold.
    ///
    /// Pairs with counts below this threshold are left out of the output.
    #[must_use]
    pub const fn min_count(mut self, min_count: u64) -> Self {
        self.min_count = Some(min_count);
        self
    }

    #[must_use]
    pub const fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Renders k-mers as integer ids starting at `offset`. See [`KeyMap`].
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Number of worker threads: 1 runs sequentially, 0 uses every core.
    #[must_use]
    pub const fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Memory-maps files opened by [`run_path`](Self::run_path) and
    /// [`count_path`](Self::count_path). Needs the `mmap` feature.
    #[must_use]
    pub const fn mmap(mut self, mmap: bool) -> Self {
        self.mmap = mmap;
        self
    }

    /// Invokes `callback` with a progress snapshot after every record.
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub const fn get_k(&self) -> Option<KmerLength> {
        self.k
    }

    #[must_use]
    pub const fn get_mode(&self) -> CountMode {
        self.mode
    }

    #[must_use]
    pub const fn get_strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn get_min_count(&self) -> u64 {
        self.min_count.unwrap_or(1)
    }

    #[must_use]
    pub const fn get_format(&self) -> OutputFormat {
        self.format
    }

    /// The key map implied by the configured k and offset, if any.
    pub fn key_map(&self) -> Result<Option<KeyMap>, KmerCounterError> {
        let k = self.require_k()?;
        self.offset.map(|offset| KeyMap::new(k, offset)).transpose()
    }

    /// Assembles the configured [`Pipeline`].
    ///
    /// # Errors
    ///
    /// [`KmerCounterError::InvalidParameter`] if `k` has not been set or the
    /// offset does not fit the id range.
    pub fn pipeline(&self) -> Result<Pipeline, KmerCounterError> {
        let k = self.require_k()?;
        let counter = Counter::new(k)
            .with_strand(self.strand)
            .with_policy(self.policy);

        let mut formatter = Formatter::new(self.format).with_min_count(self.get_min_count());
        if let Some(keys) = self.key_map()? {
            formatter = formatter.with_key_map(keys);
        }

        let mut pipeline = Pipeline::new(counter)
            .with_formatter(formatter)
            .with_mode(self.mode)
            .with_threads(self.threads.unwrap_or(1));
        if let Some(progress) = &self.progress {
            pipeline = pipeline.with_progress(Arc::clone(progress));
        }
        Ok(pipeline)
    }

    fn require_k(&self) -> Result<KmerLength, KmerCounterError> {
        self.k
            .ok_or_else(|| KmerCounterError::parameter("k-mer length not set; call .k() first"))
    }

    /// Counts FASTA records from `reader` and writes one line per record.
    pub fn run_fasta<R, W>(&self, reader: R, out: &mut W) -> Result<Progress, KmerCounterError>
    where
        R: BufRead,
        W: Write,
    {
        self.pipeline()?.run(FastaReader::new(reader), out)
    }

    /// Counts BED records from `reader` and writes one line per record.
    pub fn run_bed<R, W>(&self, reader: R, out: &mut W) -> Result<Progress, KmerCounterError>
    where
        R: BufRead,
        W: Write,
    {
        self.pipeline()?.run(BedReader::new(reader), out)
    }

    /// Counts FASTA records from `reader` and returns the tables.
    pub fn count_fasta<R: BufRead>(&self, reader: R) -> Result<Vec<RecordCounts>, KmerCounterError> {
        self.pipeline()?.collect(FastaReader::new(reader))
    }

    /// Counts BED records from `reader` and returns the tables.
    pub fn count_bed<R: BufRead>(&self, reader: R) -> Result<Vec<RecordCounts>, KmerCounterError> {
        self.pipeline()?.collect(BedReader::new(reader))
    }

    /// Opens `path` (`-` for stdin) and writes its counts to `out`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use kmer_counter::{builder::KmerCounter, input::InputFormat};
    ///
    /// let mut out = std::io::stdout().lock();
    /// KmerCounter::new()
    ///     .k(21)?
    ///     .threads(0)
    ///     .run_path("genome.fa", InputFormat::Fasta, &mut out)?;
    /// # Ok::<(), kmer_counter::error::KmerCounterError>(())
    /// ```
    pub fn run_path<P, W>(
        &self,
        path: P,
        input: InputFormat,
        out: &mut W,
    ) -> Result<Progress, KmerCounterError>
    where
        P: AsRef<Path>,
        W: Write,
    {
        self.run_input(&Input::from_path(path.as_ref()), input, out)
    }

    /// Opens `source` and writes its counts to `out`.
    pub fn run_input<W: Write>(
        &self,
        source: &Input,
        input: InputFormat,
        out: &mut W,
    ) -> Result<Progress, KmerCounterError> {
        let reader = source.open(self.mmap)?;
        match input {
            InputFormat::Fasta => self.run_fasta(reader, out),
            InputFormat::Bed => self.run_bed(reader, out),
        }
    }

    /// Opens `path` (`-` for stdin) and returns its tables.
    pub fn count_path<P: AsRef<Path>>(
        &self,
        path: P,
        input: InputFormat,
    ) -> Result<Vec<RecordCounts>, KmerCounterError> {
        let reader = Input::from_path(path.as_ref()).open(self.mmap)?;
        match input {
            InputFormat::Fasta => self.count_fasta(reader),
            InputFormat::Bed => self.count_bed(reader),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[test]
    fn builder_default() {
        let counter = KmerCounter::new();
        assert!(counter.get_k().is_none());
        assert_eq!(counter.get_min_count(), 1);
        assert_eq!(counter.get_mode(), CountMode::PerRecord);
        assert_eq!(counter.get_strand(), Strand::Forward);
        assert_eq!(counter.get_format(), OutputFormat::Line);
    }

    #[test]
    fn builder_k() {
        assert_eq!(KmerCounter::new().k(21).unwrap().get_k().unwrap().get(), 21);
        assert!(KmerCounter::new().k(0).is_err());
        assert!(KmerCounter::new().k(64).is_ok());
    }

    #[test]
    fn running_without_k_fails() {
        let err = KmerCounter::new()
            .run_fasta(&b">a\nACGT\n"[..], &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("k-mer length not set"));
    }

    #[test]
    fn offset_checks_k() {
        let err = KmerCounter::new().k(40).unwrap().offset(0).pipeline().unwrap_err();
        assert!(matches!(err, KmerCounterError::InvalidParameter { .. }));
    }

    #[test]
    fn chained_options_reach_output() {
        let mut out = Vec::new();
        KmerCounter::new()
            .k(2)
            .unwrap()
            .min_count(2)
            .offset(0)
            .run_fasta(&b">h\nAACAA\n"[..], &mut out)
            .unwrap();
        // AA = 0, AC = 4, CA = 1; only AA reaches two
        assert_eq!(String::from_utf8(out).unwrap(), ">h\t0:2\n");
    }

    #[test]
    fn bed_run() {
        let mut out = Vec::new();
        KmerCounter::new()
            .k(2)
            .unwrap()
            .run_bed(&b"chr2\t5\t8\tGAT\n"[..], &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chr2\t5\t8\tAT:1 GA:1\n");
    }

    #[test]
    fn progress_reaches_callback() {
        let bases = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&bases);
        let summary = KmerCounter::new()
            .k(3)
            .unwrap()
            .on_progress(move |p| seen.store(p.bases_processed, Ordering::SeqCst))
            .run_fasta(&b">a\nACGT\n>b\nGATTACA\n"[..], &mut Vec::new())
            .unwrap();
        assert_eq!(bases.load(Ordering::SeqCst), 11);
        assert_eq!(summary.records_processed, 2);
    }
}
