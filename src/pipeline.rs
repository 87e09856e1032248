//! The counting pipeline.
//!
//! Records flow one at a time through extraction, counting and formatting:
//!
//! ```text
//! reader ──► Counter (alphabet policy + Kmers) ──► CountTable ──► Formatter ──► writer
//! ```
//!
//! In [`CountMode::PerRecord`] each record gets its own table and output line,
//! and the table is dropped as soon as the line is written. In
//! [`CountMode::Merge`] a single table accumulates across all records and one
//! unlabelled line is written at the end.
//!
//! With more than one thread, records are read in batches, counted on a
//! `rayon` pool, and emitted strictly in input order, so the output is
//! byte-identical to the sequential run. Merged runs accumulate into a
//! [`SharedCountTable`] from the workers.

use std::{fmt, io::Write, sync::Arc};

use clap::ValueEnum;
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::{
    counter::{CountTable, Counter, SharedCountTable},
    error::{InvalidBaseError, KmerCounterError},
    format::{Formatter, Label},
    progress::{Progress, ProgressTracker},
    reader::SequenceRecord,
};

#[cfg(feature = "tracing")]
use tracing::{debug, info, info_span};

/// Records buffered per worker thread in the parallel driver.
const BATCH_PER_THREAD: usize = 64;

/// Callback invoked with a snapshot after every record.
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

/// Whether counts are kept per record or merged over the whole input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CountMode {
    /// One table and one output line per record.
    #[default]
    PerRecord,
    /// One table for the whole input, one unlabelled output line.
    Merge,
}

/// Counts of one record, or of the whole input in merge mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCounts {
    /// Record name; `None` for a merged table.
    pub name: Option<String>,
    pub table: CountTable,
}

/// A configured counting run.
#[derive(Clone)]
pub struct Pipeline {
    counter: Counter,
    formatter: Formatter,
    mode: CountMode,
    threads: usize,
    progress: Option<ProgressFn>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("counter", &self.counter)
            .field("formatter", &self.formatter)
            .field("mode", &self.mode)
            .field("threads", &self.threads)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

fn ambiguous<T: SequenceRecord>(record: &T, source: InvalidBaseError) -> KmerCounterError {
    KmerCounterError::AmbiguousBase {
        record: record.name(),
        source,
    }
}

impl Pipeline {
    /// A sequential, per-record pipeline with line output.
    pub fn new(counter: Counter) -> Self {
        Self {
            counter,
            formatter: Formatter::default(),
            mode: CountMode::PerRecord,
            threads: 1,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: CountMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of worker threads: 1 runs sequentially, 0 uses every core.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub const fn counter(&self) -> &Counter {
        &self.counter
    }

    pub const fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub const fn mode(&self) -> CountMode {
        self.mode
    }

    pub const fn threads(&self) -> usize {
        self.threads
    }

    /// Counts every record and writes one line per record (or one merged
    /// line) to `out`.
    ///
    /// Lines for records preceding a failure are written; nothing is written
    /// for the failing record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmer_counter::{counter::Counter, kmer::KmerLength, pipeline::Pipeline, reader::FastaReader};
    ///
    /// let pipeline = Pipeline::new(Counter::new(KmerLength::new(4)?));
    /// let mut out = Vec::new();
    /// pipeline.run(FastaReader::new(&b">0\nACGTACGT\n"[..]), &mut out)?;
    /// assert_eq!(out, b">0\tACGT:2 CGTA:1 GTAC:1 TACG:1\n");
    /// # Ok::<(), kmer_counter::error::KmerCounterError>(())
    /// ```
    pub fn run<I, T, W>(&self, records: I, out: &mut W) -> Result<Progress, KmerCounterError>
    where
        I: IntoIterator<Item = Result<T, KmerCounterError>>,
        T: SequenceRecord + Sync,
        W: Write,
    {
        let result = self.drive(records, |record, table| {
            let label = record.map_or(Label::Merged, T::label);
            self.formatter.write(out, label, &table)
        });
        let flushed = out.flush();
        let summary = result?;
        flushed?;
        Ok(summary)
    }

    /// Counts every record and returns the tables instead of writing them.
    pub fn collect<I, T>(&self, records: I) -> Result<Vec<RecordCounts>, KmerCounterError>
    where
        I: IntoIterator<Item = Result<T, KmerCounterError>>,
        T: SequenceRecord + Sync,
    {
        let mut counts = Vec::new();
        self.drive(records, |record, table| {
            counts.push(RecordCounts {
                name: record.map(T::name),
                table,
            });
            Ok(())
        })?;
        Ok(counts)
    }

    fn drive<I, T, F>(&self, records: I, mut emit: F) -> Result<Progress, KmerCounterError>
    where
        I: IntoIterator<Item = Result<T, KmerCounterError>>,
        T: SequenceRecord + Sync,
        F: FnMut(Option<&T>, CountTable) -> Result<(), KmerCounterError>,
    {
        #[cfg(feature = "tracing")]
        let _span = info_span!(
            "count_records",
            k = self.counter.k().get(),
            mode = ?self.mode,
            strand = %self.counter.strand(),
            threads = self.threads
        )
        .entered();

        let tracker = ProgressTracker::new();
        if self.threads == 1 {
            self.drive_sequential(records, &tracker, &mut emit)?;
        } else {
            self.drive_parallel(records, &tracker, &mut emit)?;
        }

        let summary = tracker.snapshot();

        #[cfg(feature = "tracing")]
        info!(
            records = summary.records_processed,
            bases = summary.bases_processed,
            kmers = summary.kmers_counted,
            "Counting complete"
        );

        Ok(summary)
    }

    fn drive_sequential<I, T, F>(
        &self,
        records: I,
        tracker: &ProgressTracker,
        emit: &mut F,
    ) -> Result<(), KmerCounterError>
    where
        I: IntoIterator<Item = Result<T, KmerCounterError>>,
        T: SequenceRecord,
        F: FnMut(Option<&T>, CountTable) -> Result<(), KmerCounterError>,
    {
        let mut merged = CountTable::new();
        for record in records {
            let record = record?;
            match self.mode {
                CountMode::PerRecord => {
                    let mut table = CountTable::new();
                    self.tally(&record, &mut table, tracker)?;
                    emit(Some(&record), table)?;
                }
                CountMode::Merge => self.tally(&record, &mut merged, tracker)?,
            }
        }
        if self.mode == CountMode::Merge {
            emit(None, merged)?;
        }
        Ok(())
    }

    fn drive_parallel<I, T, F>(
        &self,
        records: I,
        tracker: &ProgressTracker,
        emit: &mut F,
    ) -> Result<(), KmerCounterError>
    where
        I: IntoIterator<Item = Result<T, KmerCounterError>>,
        T: SequenceRecord + Sync,
        F: FnMut(Option<&T>, CountTable) -> Result<(), KmerCounterError>,
    {
        let pool = ThreadPoolBuilder::new().num_threads(self.threads).build()?;
        let batch_size = pool.current_num_threads() * BATCH_PER_THREAD;
        let shared = SharedCountTable::new();

        let mut records = records.into_iter();
        let mut batch = Vec::with_capacity(batch_size);
        let mut failure = None;

        loop {
            batch.clear();
            for record in records.by_ref() {
                match record {
                    Ok(record) => {
                        batch.push(record);
                        if batch.len() == batch_size {
                            break;
                        }
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }
            if batch.is_empty() {
                break;
            }

            #[cfg(feature = "tracing")]
            debug!(records = batch.len(), "Dispatching batch");

            self.process_batch(&pool, &batch, &shared, tracker, emit)?;
            if failure.is_some() || batch.len() < batch_size {
                break;
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }
        if self.mode == CountMode::Merge {
            emit(None, shared.into_table())?;
        }
        Ok(())
    }

    /// Counts a batch on the pool, then emits per-record tables in input
    /// order up to the first failure.
    fn process_batch<T, F>(
        &self,
        pool: &ThreadPool,
        batch: &[T],
        shared: &SharedCountTable,
        tracker: &ProgressTracker,
        emit: &mut F,
    ) -> Result<(), KmerCounterError>
    where
        T: SequenceRecord + Sync,
        F: FnMut(Option<&T>, CountTable) -> Result<(), KmerCounterError>,
    {
        let tables: Vec<Result<Option<CountTable>, KmerCounterError>> = pool.install(|| {
            batch
                .par_iter()
                .map(|record| -> Result<Option<CountTable>, KmerCounterError> {
                    let mut table = CountTable::new();
                    self.tally(record, &mut table, tracker)?;
                    match self.mode {
                        CountMode::PerRecord => Ok(Some(table)),
                        CountMode::Merge => {
                            shared.absorb(table);
                            Ok(None)
                        }
                    }
                })
                .collect()
        });

        for (record, table) in batch.iter().zip(tables) {
            if let Some(table) = table? {
                emit(Some(record), table)?;
            }
        }
        Ok(())
    }

    /// Counts one record into `table` and reports progress.
    fn tally<T: SequenceRecord>(
        &self,
        record: &T,
        table: &mut CountTable,
        tracker: &ProgressTracker,
    ) -> Result<(), KmerCounterError> {
        let seq = record.seq();
        let windows = self
            .counter
            .tally(seq, table)
            .map_err(|source| ambiguous(record, source))?;

        #[cfg(feature = "tracing")]
        debug!(
            record = %record.name(),
            bases = seq.len(),
            kmers = windows,
            distinct = table.len(),
            "Counted record"
        );

        tracker.record(seq.len() as u64, windows);
        if let Some(progress) = &self.progress {
            progress(tracker.snapshot());
        }
        Ok(())
    }
}
