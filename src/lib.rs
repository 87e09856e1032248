//! # kmer-counter
//!
//! A streaming per-record k-mer counter for DNA sequences.
//!
//! Every record of a FASTA (or BED) input produces one output line listing
//! each distinct k-mer of the record with its number of occurrences:
//!
//! ```text
//! >header<TAB>KMER:COUNT KMER:COUNT ...
//! ```
//!
//! K-mers are sorted lexicographically, lowercase bases count as uppercase,
//! and windows containing any base other than `ACGT` are skipped. Only the
//! current record and its table are held in memory.
//!
//! ## Quick start
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
//!
//! ## Modules
//!
//! - [`reader`]: streaming FASTA and BED record readers
//! - [`alphabet`]: base classification and ambiguity policies
//! - [`kmer`]: k-mer length, strand handling and the window iterator
//! - [`counter`]: count tables and per-sequence counting
//! - [`format`]: line and JSON rendering
//! - [`pipeline`]: sequential and parallel drivers
//! - [`builder`]: fluent configuration API
//!
//! ## Features
//!
//! - `tracing` (default): structured logging via `tracing`
//! - `gzip`: read `.gz` inputs
//! - `mmap`: memory-mapped input files
//! - `async`: Tokio wrapper in [`async_api`]

pub mod alphabet;
pub mod builder;
pub mod cli;
pub mod config;
pub mod counter;
pub mod error;
pub mod fixture;
pub mod format;
pub mod input;
pub mod keymap;
pub mod kmer;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod run;

#[cfg(feature = "async")]
pub mod async_api;
#[cfg(feature = "tracing")]
pub mod logging;
#[cfg(feature = "mmap")]
pub mod mmap;
