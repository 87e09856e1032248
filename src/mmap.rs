//! Memory-mapped input for large files.
//!
//! # Safety
//!
//! Memory mapping relies on the underlying file not being modified while
//! the mapping is active. Modifying a mapped file leads to undefined behavior.

use memmap2::Mmap;
use std::{
    fs::File,
    io::{self, Cursor},
    path::Path,
};

/// A read-only memory-mapped input file.
pub struct MmapInput {
    mmap: Mmap,
}

impl MmapInput {
    /// Opens and maps `path`.
    ///
    /// # Safety
    ///
    /// The underlying file must not be modified while this mapping exists.
    #[allow(unsafe_code)]
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the file is not modified while mapped; callers must ensure this.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self { mmap })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// A `BufRead` over the mapping, for the streaming readers.
    pub fn into_reader(self) -> Cursor<Mmap> {
        Cursor::new(self.mmap)
    }
}
