//! Input sources: a file or standard input, in FASTA or BED layout.
//!
//! # Example
//!
//! ```rust
//! use kmer_counter::input::Input;
//! use std::path::Path;
//!
//! let input = Input::from_path(Path::new("sequences.fa"));
//! assert!(matches!(input, Input::File(_)));
//!
//! let input = Input::from_path(Path::new("-"));
//! assert!(matches!(input, Input::Stdin));
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;

use crate::error::KmerCounterError;

/// Record layout of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// `>header` lines followed by sequence lines.
    #[default]
    Fasta,
    /// `chrom start stop sequence` lines.
    Bed,
}

impl InputFormat {
    /// File name used for counts written to a results directory.
    pub const fn count_file_name(self) -> &'static str {
        match self {
            Self::Fasta => "count.txt",
            Self::Bed => "count.bed",
        }
    }
}

/// Where records are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// Read from a file at the specified path.
    File(PathBuf),
    /// Read from standard input.
    #[default]
    Stdin,
}

impl Input {
    /// `-` means standard input.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// `None` or `-` means standard input.
    #[must_use]
    pub fn from_option(path: Option<&Path>) -> Self {
        path.map_or(Self::Stdin, Self::from_path)
    }

    #[must_use]
    pub const fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin => None,
        }
    }

    /// Opens the source for buffered reading.
    ///
    /// Files ending in `.gz` are decompressed when the `gzip` feature is
    /// enabled. With `mmap` set (and the `mmap` feature enabled) a file is
    /// memory-mapped instead of read through a buffer; compressed files are
    /// never mapped.
    ///
    /// # Errors
    ///
    /// [`KmerCounterError::Read`] if the file cannot be opened or mapped.
    pub fn open(&self, mmap: bool) -> Result<Box<dyn BufRead + Send>, KmerCounterError> {
        let path = match self {
            Self::Stdin => return Ok(Box::new(BufReader::new(io::stdin()))),
            Self::File(path) => path,
        };
        let read_error = |source| KmerCounterError::Read {
            source,
            path: path.clone(),
        };

        #[cfg(feature = "gzip")]
        if is_gzip(path) {
            let file = File::open(path).map_err(read_error)?;
            return Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))));
        }

        #[cfg(feature = "mmap")]
        if mmap {
            let mapped = crate::mmap::MmapInput::open(path).map_err(read_error)?;
            return Ok(Box::new(mapped.into_reader()));
        }
        #[cfg(not(feature = "mmap"))]
        let _ = mmap;

        let file = File::open(path).map_err(read_error)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

#[cfg(feature = "gzip")]
fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::{Read, Write};

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn dash_and_none_are_stdin() {
        assert!(Input::from_path(Path::new("-")).is_stdin());
        assert!(Input::from_option(None).is_stdin());
        assert!(Input::default().is_stdin());
    }

    #[test]
    fn paths_are_files() {
        let input = Input::from_option(Some(Path::new("test.fa")));
        assert_eq!(input.as_path(), Some(Path::new("test.fa")));
        assert_eq!(input.to_string(), "test.fa");
        assert_eq!(Input::Stdin.to_string(), "<stdin>");
    }

    #[test]
    fn count_file_names() {
        assert_eq!(InputFormat::Fasta.count_file_name(), "count.txt");
        assert_eq!(InputFormat::Bed.count_file_name(), "count.bed");
    }

    #[test]
    fn opens_plain_file() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, ">a\nACGT\n").unwrap();
        temp.flush().unwrap();

        let mut contents = String::new();
        Input::File(temp.path().to_path_buf())
            .open(false)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, ">a\nACGT\n");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = Input::File(PathBuf::from("/nonexistent/input.fa"))
            .open(false)
            .err()
            .unwrap();
        assert!(matches!(err, KmerCounterError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/input.fa"));
    }
}
