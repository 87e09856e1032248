//! Rendering count tables.
//!
//! The default line format is the compatibility contract consumed by
//! downstream parsers:
//!
//! ```text
//! >header<TAB>KMER:COUNT KMER:COUNT ...
//! ```
//!
//! Pairs are sorted ascending by k-mer, counts are plain decimal, and every
//! line ends with a single `\n`. BED records replace `>header` with their
//! first three columns; a merged table has no label and no tab. A line is
//! rendered into a buffer first and written with a single `write_all`, so a
//! failure never leaves half a line behind.

use std::{borrow::Cow, io::Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::{counter::CountTable, error::KmerCounterError, keymap::KeyMap};

/// What a rendered line is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label<'a> {
    /// A FASTA record.
    Header(&'a str),
    /// A BED record.
    Interval {
        chrom: &'a str,
        start: &'a str,
        end: &'a str,
    },
    /// The single table of a merged run.
    Merged,
}

/// Output format for count lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `>header\tKMER:COUNT ...`
    #[default]
    Line,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonKey<'a> {
    Kmer(Cow<'a, str>),
    Id(u64),
}

#[derive(Serialize)]
struct JsonKmer<'a> {
    kmer: JsonKey<'a>,
    count: u64,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<Cow<'a, str>>,
    kmers: Vec<JsonKmer<'a>>,
}

/// Renders one line per count table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    format: OutputFormat,
    min_count: u64,
    keys: Option<KeyMap>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputFormat::Line)
    }
}

impl Formatter {
    pub const fn new(format: OutputFormat) -> Self {
        Self {
            format,
            min_count: 1,
            keys: None,
        }
    }

    /// Omits pairs whose count is below `min_count`.
    #[must_use]
    pub const fn with_min_count(mut self, min_count: u64) -> Self {
        self.min_count = min_count;
        self
    }

    /// Renders integer ids instead of k-mer strings.
    #[must_use]
    pub const fn with_key_map(mut self, keys: KeyMap) -> Self {
        self.keys = Some(keys);
        self
    }

    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    pub const fn min_count(&self) -> u64 {
        self.min_count
    }

    pub const fn key_map(&self) -> Option<&KeyMap> {
        self.keys.as_ref()
    }

    /// Renders a complete line, trailing newline included.
    pub fn render(&self, label: Label<'_>, table: &CountTable) -> Result<Vec<u8>, KmerCounterError> {
        let entries: Vec<(&[u8], u64)> = table
            .sorted()
            .into_iter()
            .filter(|&(_, count)| count >= self.min_count)
            .collect();

        let mut line = Vec::with_capacity(entries.len() * 8 + 32);
        match self.format {
            OutputFormat::Line => self.render_line(&mut line, label, &entries)?,
            OutputFormat::Json => self.render_json(&mut line, label, &entries)?,
        }
        line.push(b'\n');
        Ok(line)
    }

    /// Renders and writes one line.
    pub fn write<W: Write>(
        &self,
        out: &mut W,
        label: Label<'_>,
        table: &CountTable,
    ) -> Result<(), KmerCounterError> {
        let line = self.render(label, table)?;
        out.write_all(&line)?;
        Ok(())
    }

    fn render_line(
        &self,
        line: &mut Vec<u8>,
        label: Label<'_>,
        entries: &[(&[u8], u64)],
    ) -> Result<(), KmerCounterError> {
        match label {
            Label::Header(header) => write!(line, ">{header}\t")?,
            Label::Interval { chrom, start, end } => write!(line, "{chrom}\t{start}\t{end}\t")?,
            Label::Merged => {}
        }
        for (i, &(kmer, count)) in entries.iter().enumerate() {
            if i > 0 {
                line.push(b' ');
            }
            match self.keys.as_ref().and_then(|keys| keys.id(kmer)) {
                Some(id) => write!(line, "{id}")?,
                None => line.extend_from_slice(kmer),
            }
            write!(line, ":{count}")?;
        }
        Ok(())
    }

    fn render_json(
        &self,
        line: &mut Vec<u8>,
        label: Label<'_>,
        entries: &[(&[u8], u64)],
    ) -> Result<(), KmerCounterError> {
        let header = match label {
            Label::Header(header) => Some(Cow::Borrowed(header)),
            Label::Interval { chrom, start, end } => Some(Cow::Owned(format!("{chrom}:{start}-{end}"))),
            Label::Merged => None,
        };
        let kmers = entries
            .iter()
            .map(|&(kmer, count)| JsonKmer {
                kmer: match self.keys.as_ref().and_then(|keys| keys.id(kmer)) {
                    Some(id) => JsonKey::Id(id),
                    None => JsonKey::Kmer(String::from_utf8_lossy(kmer)),
                },
                count,
            })
            .collect();
        serde_json::to_writer(line, &JsonRecord { header, kmers })?;
        Ok(())
    }
}
