//! Async k-mer counting API using Tokio.
//!
//! Counting is CPU-bound, so these functions move the work onto Tokio's
//! blocking thread pool and let other tasks make progress meanwhile.
//!
//! # Feature Flag
//!
//! This module requires the `async` feature to be enabled:
//!
//! ```toml
//! [dependencies]
//! kmer-counter = { version = "1.0", features = ["async"] }
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use kmer_counter::{async_api::count_path_async, builder::KmerCounter, input::InputFormat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kmer_counter::error::KmerCounterError> {
//!     let counter = KmerCounter::new().k(21)?;
//!     let records = count_path_async(counter, "genome.fa", InputFormat::Fasta).await?;
//!     println!("Counted {} records", records.len());
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    builder::{KmerCounter, RecordCounts},
    error::KmerCounterError,
    input::InputFormat,
};

/// Async version of [`KmerCounter::count_path`].
///
/// # Errors
///
/// Any error of the blocking count, or [`KmerCounterError::Task`] if the
/// blocking task panicked.
pub async fn count_path_async<P>(
    counter: KmerCounter,
    path: P,
    input: InputFormat,
) -> Result<Vec<RecordCounts>, KmerCounterError>
where
    P: Into<PathBuf>,
{
    let path = path.into();
    task::spawn_blocking(move || counter.count_path(path, input)).await?
}

/// Async version of [`KmerCounter::run_path`], collecting the rendered
/// output in memory.
pub async fn render_path_async<P>(
    counter: KmerCounter,
    path: P,
    input: InputFormat,
) -> Result<Vec<u8>, KmerCounterError>
where
    P: Into<PathBuf>,
{
    let path = path.into();
    task::spawn_blocking(move || {
        let mut out = Vec::new();
        counter.run_path(path, input, &mut out)?;
        Ok::<_, KmerCounterError>(out)
    })
    .await?
}
