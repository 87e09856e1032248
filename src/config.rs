//! Validated run configuration built from command-line arguments.

use std::{
    fs::{self, DirBuilder, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{
    alphabet::AmbiguityPolicy,
    builder::KmerCounter,
    cli::Args,
    error::KmerCounterError,
    input::{Input, InputFormat},
    keymap::KeyMap,
    pipeline::CountMode,
};

/// Name of the key map file written next to the counts.
pub const KEY_MAP_FILE: &str = "kmer-map.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub input: Input,
    pub input_format: InputFormat,
    pub results_dir: Option<PathBuf>,
    pub counter: KmerCounter,
    pub quiet: bool,
    pub verbosity: u8,
}

impl Config {
    /// Validates `args`, creating the results directory if one is requested.
    ///
    /// # Errors
    ///
    /// [`KmerCounterError::Read`] if the input file is missing,
    /// [`KmerCounterError::InvalidParameter`] if the offset is unusable for
    /// this k, and [`KmerCounterError::Io`] if the directory cannot be made.
    pub fn from_args(args: Args) -> Result<Self, KmerCounterError> {
        let input = Input::from_option(args.input.as_deref());
        if let Some(path) = input.as_path() {
            fs::metadata(path).map_err(|source| KmerCounterError::Read {
                source,
                path: path.to_path_buf(),
            })?;
        }

        let mut counter = KmerCounter::new()
            .k(args.k)?
            .mode(if args.merge {
                CountMode::Merge
            } else {
                CountMode::PerRecord
            })
            .strand(args.strand)
            .policy(if args.strict {
                AmbiguityPolicy::Reject
            } else {
                AmbiguityPolicy::Exclude
            })
            .min_count(args.min_count)
            .format(args.format)
            .threads(args.threads)
            .mmap(args.use_mmap());
        if let Some(offset) = args.offset {
            counter = counter.offset(offset);
        }
        // Surface a bad k/offset pair before touching the filesystem.
        counter.key_map()?;

        if let Some(dir) = &args.results_dir {
            create_results_dir(dir)?;
        }

        Ok(Self {
            input,
            input_format: args.input_format(),
            results_dir: args.results_dir,
            counter,
            quiet: args.quiet,
            verbosity: args.verbose,
        })
    }

    /// Destination for count lines: a file in the results directory, or
    /// standard output.
    pub fn output(&self) -> Result<Box<dyn Write>, KmerCounterError> {
        match &self.results_dir {
            Some(dir) => {
                let file = File::create(dir.join(self.input_format.count_file_name()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        }
    }

    /// Writes the id map into the results directory when ids are in use.
    /// Returns the path written, if any.
    pub fn write_key_map(&self) -> Result<Option<PathBuf>, KmerCounterError> {
        let (Some(dir), Some(keys)) = (&self.results_dir, self.counter.key_map()?) else {
            return Ok(None);
        };
        let path = dir.join(KEY_MAP_FILE);
        write_key_map(&keys, &path)?;
        Ok(Some(path))
    }
}

fn write_key_map(keys: &KeyMap, path: &Path) -> Result<(), KmerCounterError> {
    keys.write_to(BufWriter::new(File::create(path)?))?;
    Ok(())
}

fn create_results_dir(dir: &Path) -> Result<(), KmerCounterError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)?;
    Ok(())
}
