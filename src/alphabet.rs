//! Base classification and the ambiguous-base policy.
//!
//! Each sequence byte is classified as a valid nucleotide (`A`, `C`, `G`, `T`
//! in either case), an ambiguous letter (`N`, IUPAC codes, any other letter),
//! or an invalid non-letter byte. Only windows made entirely of valid bases
//! produce k-mers.

use std::borrow::Cow;

use clap::ValueEnum;

use crate::error::InvalidBaseError;

/// One of the four canonical nucleotides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl TryFrom<u8> for Nucleotide {
    type Error = u8;

    /// Case-insensitive; returns the byte back when it is not `ACGTacgt`.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            b'A' | b'a' => Ok(Self::A),
            b'C' | b'c' => Ok(Self::C),
            b'G' | b'g' => Ok(Self::G),
            b'T' | b't' => Ok(Self::T),
            other => Err(other),
        }
    }
}

impl From<Nucleotide> for u64 {
    fn from(n: Nucleotide) -> Self {
        match n {
            Nucleotide::A => 0,
            Nucleotide::C => 1,
            Nucleotide::G => 2,
            Nucleotide::T => 3,
        }
    }
}

impl From<u64> for Nucleotide {
    fn from(u: u64) -> Self {
        match u & 3 {
            0 => Self::A,
            1 => Self::C,
            2 => Self::G,
            _ => Self::T,
        }
    }
}

impl Nucleotide {
    /// The uppercase byte for this nucleotide.
    pub const fn into_u8(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }
}

/// Classification of a single sequence byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseClass {
    /// A nucleotide, carrying its uppercase byte.
    Valid(u8),
    /// A letter other than `ACGT` (e.g. `N`, `R`, `Y`).
    Ambiguous,
    /// Anything that is not a letter.
    Invalid,
}

impl BaseClass {
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Classifies a byte.
///
/// # Example
///
/// ```rust
/// use kmer_counter::alphabet::{classify, BaseClass};
///
/// assert_eq!(classify(b'g'), BaseClass::Valid(b'G'));
/// assert_eq!(classify(b'N'), BaseClass::Ambiguous);
/// assert_eq!(classify(b'-'), BaseClass::Invalid);
/// ```
pub fn classify(byte: u8) -> BaseClass {
    match Nucleotide::try_from(byte) {
        Ok(n) => BaseClass::Valid(n.into_u8()),
        Err(b) if b.is_ascii_alphabetic() => BaseClass::Ambiguous,
        Err(_) => BaseClass::Invalid,
    }
}

/// `true` if the byte may appear in a counted k-mer.
#[inline]
pub fn is_valid(byte: u8) -> bool {
    matches!(byte, b'A' | b'C' | b'G' | b'T' | b'a' | b'c' | b'g' | b't')
}

/// Uppercases the valid bases of a sequence.
///
/// Borrows when the sequence has no lowercase nucleotides, so the common
/// all-uppercase case costs a single scan. Non-nucleotide bytes are left as
/// they are.
pub fn canonicalize(seq: &[u8]) -> Cow<'_, [u8]> {
    if !seq.iter().any(|b| matches!(b, b'a' | b'c' | b'g' | b't')) {
        return Cow::Borrowed(seq);
    }
    Cow::Owned(
        seq.iter()
            .map(|&b| match classify(b) {
                BaseClass::Valid(upper) => upper,
                _ => b,
            })
            .collect(),
    )
}

/// What to do with windows that cover ambiguous or invalid bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AmbiguityPolicy {
    /// Skip every window that covers a non-`ACGT` base.
    #[default]
    Exclude,
    /// Fail on the first non-`ACGT` base.
    Reject,
}

impl AmbiguityPolicy {
    /// Checks a whole sequence against the policy.
    ///
    /// `Exclude` accepts everything, exclusion happens per window in the
    /// extractor. `Reject` reports the first non-`ACGT` byte.
    pub fn check(self, seq: &[u8]) -> Result<(), InvalidBaseError> {
        match self {
            Self::Exclude => Ok(()),
            Self::Reject => match seq.iter().position(|&b| !is_valid(b)) {
                Some(position) => Err(InvalidBaseError {
                    base: seq[position],
                    position,
                }),
                None => Ok(()),
            },
        }
    }
}

impl std::fmt::Display for AmbiguityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exclude => write!(f, "exclude"),
            Self::Reject => write!(f, "reject"),
        }
    }
}
