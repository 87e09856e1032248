//! Integer keys for k-mers.
//!
//! With an offset, every k-mer of length k gets the id `offset + x`, where
//! `x` packs the bases two bits each (A=0, C=1, G=2, T=3) with the first base
//! in the lowest bits. Ids therefore enumerate all `4^k` k-mers, and the map
//! can be written out once and reused to decode count files.
//!
//! # Example
//!
//! ```rust
//! use kmer_counter::{keymap::KeyMap, kmer::KmerLength};
//!
//! let map = KeyMap::new(KmerLength::new(2)?, 100)?;
//! assert_eq!(map.id(b"AA"), Some(100));
//! assert_eq!(map.id(b"CA"), Some(101));
//! assert_eq!(map.id(b"AC"), Some(104));
//! assert_eq!(map.kmer(104).as_deref(), Some("AC"));
//! # Ok::<(), kmer_counter::error::KmerCounterError>(())
//! ```

use std::io::{self, Write};

use crate::{alphabet::Nucleotide, error::KmerCounterError, kmer::KmerLength};

/// Bijection between k-mers of one length and a contiguous id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    k: KmerLength,
    offset: u64,
}

impl KeyMap {
    /// Largest k whose id space fits in a `u64` alongside an offset.
    pub const MAX_K: usize = 31;

    /// Creates a key map.
    ///
    /// # Errors
    ///
    /// [`KmerCounterError::InvalidParameter`] if `k` exceeds [`Self::MAX_K`]
    /// or the largest id would overflow.
    pub fn new(k: KmerLength, offset: u64) -> Result<Self, KmerCounterError> {
        if k.get() > Self::MAX_K {
            return Err(KmerCounterError::parameter(format!(
                "integer keys support k up to {}, got {k}",
                Self::MAX_K
            )));
        }
        let map = Self { k, offset };
        offset.checked_add(map.len() - 1).ok_or_else(|| {
            KmerCounterError::parameter(format!("offset {offset} overflows the id range for k={k}"))
        })?;
        Ok(map)
    }

    pub const fn k(&self) -> KmerLength {
        self.k
    }

    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of ids, `4^k`.
    pub const fn len(&self) -> u64 {
        1 << (2 * self.k.get())
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Id of `kmer`, or `None` if it has the wrong length or a non-`ACGT` base.
    pub fn id(&self, kmer: &[u8]) -> Option<u64> {
        if kmer.len() != self.k.get() {
            return None;
        }
        let mut x = 0u64;
        for (i, &b) in kmer.iter().enumerate() {
            let code = u64::from(Nucleotide::try_from(b).ok()?);
            x |= code << (2 * i);
        }
        Some(self.offset + x)
    }

    /// The k-mer for `id`, if it is in range.
    pub fn kmer(&self, id: u64) -> Option<String> {
        let x = id.checked_sub(self.offset).filter(|&x| x < self.len())?;
        Some(self.decode(x))
    }

    fn decode(&self, x: u64) -> String {
        (0..self.k.get())
            .map(|i| char::from(Nucleotide::from(x >> (2 * i)).into_u8()))
            .collect()
    }

    /// All `(kmer, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        (0..self.len()).map(move |x| (self.decode(x), self.offset + x))
    }

    /// Writes the map as `KMER\tID` lines in id order.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (kmer, id) in self.iter() {
            writeln!(out, "{kmer}\t{id}")?;
        }
        out.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn map(k: usize, offset: u64) -> KeyMap {
        KeyMap::new(KmerLength::new(k).unwrap(), offset).unwrap()
    }

    #[test]
    fn first_base_is_lowest_bits() {
        let m = map(3, 0);
        assert_eq!(m.id(b"AAA"), Some(0));
        assert_eq!(m.id(b"CAA"), Some(1));
        assert_eq!(m.id(b"TAA"), Some(3));
        assert_eq!(m.id(b"ACA"), Some(4));
        assert_eq!(m.id(b"TTT"), Some(63));
    }

    #[test]
    fn id_and_kmer_are_inverse() {
        let m = map(4, 17);
        for (kmer, id) in m.iter() {
            assert_eq!(m.id(kmer.as_bytes()), Some(id));
            assert_eq!(m.kmer(id), Some(kmer));
        }
        assert_eq!(m.iter().count(), 256);
    }

    #[test]
    fn rejects_wrong_length_and_bad_bases() {
        let m = map(3, 0);
        assert_eq!(m.id(b"AC"), None);
        assert_eq!(m.id(b"ANA"), None);
        assert_eq!(m.kmer(64), None);
        assert_eq!(map(3, 10).kmer(9), None);
    }

    #[test]
    fn rejects_large_k_and_overflow() {
        assert!(KeyMap::new(KmerLength::new(32).unwrap(), 0).is_err());
        assert!(KeyMap::new(KmerLength::new(31).unwrap(), 0).is_ok());
        assert!(KeyMap::new(KmerLength::new(31).unwrap(), u64::MAX).is_err());
    }

    #[test]
    fn writes_tab_separated_map() {
        let mut out = Vec::new();
        map(1, 5).write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A\t5\nC\t6\nG\t7\nT\t8\n");
    }
}
