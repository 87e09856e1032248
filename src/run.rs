//! Executes a configured command-line run.

use crate::{config::Config, error::KmerCounterError, progress::Progress};

#[cfg(feature = "tracing")]
use tracing::info;

/// Counts the configured input into the configured destination and, when
/// ids are in use with a results directory, writes the key map next to it.
///
/// # Errors
///
/// Any [`KmerCounterError`] raised while reading, counting, or writing.
/// Lines for records preceding the failure have already been written.
pub fn run(config: &Config) -> Result<Progress, KmerCounterError> {
    #[cfg(feature = "tracing")]
    info!(
        input = %config.input,
        layout = ?config.input_format,
        k = ?config.counter.get_k(),
        "Starting k-mer counting"
    );

    let mut out = config.output()?;
    let summary = config
        .counter
        .run_input(&config.input, config.input_format, &mut out)?;
    drop(out);

    let key_map = config.write_key_map()?;
    #[cfg(feature = "tracing")]
    if let Some(path) = &key_map {
        info!(path = %path.display(), "Wrote key map");
    }
    #[cfg(not(feature = "tracing"))]
    let _ = key_map;

    Ok(summary)
}
