//! Streaming record readers.
//!
//! [`FastaReader`] and [`BedReader`] wrap any [`BufRead`] and yield one record
//! at a time, so only the current record's sequence is ever buffered. Both
//! work on raw bytes: sequence data need not be UTF-8.

use std::io::BufRead;

use bytes::{Bytes, BytesMut};

use crate::{error::KmerCounterError, format::Label};

/// Access to the parts of a record the pipeline needs.
pub trait SequenceRecord {
    /// Raw sequence bytes, in input order.
    fn seq(&self) -> &[u8];
    /// How the record is labelled in the output.
    fn label(&self) -> Label<'_>;
    /// Human-readable name for diagnostics.
    fn name(&self) -> String;
}

/// A FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Header line without the leading `>` and trailing whitespace.
    pub header: String,
    /// Concatenated sequence lines, line terminators removed.
    pub sequence: Bytes,
}

impl Record {
    pub fn new(header: impl Into<String>, sequence: impl Into<Bytes>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }
}

impl SequenceRecord for Record {
    fn seq(&self) -> &[u8] {
        &self.sequence
    }

    fn label(&self) -> Label<'_> {
        Label::Header(&self.header)
    }

    fn name(&self) -> String {
        self.header.clone()
    }
}

/// A BED line carrying a sequence in its fourth column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRecord {
    pub chrom: String,
    pub start: String,
    pub end: String,
    pub sequence: Bytes,
}

impl SequenceRecord for BedRecord {
    fn seq(&self) -> &[u8] {
        &self.sequence
    }

    fn label(&self) -> Label<'_> {
        Label::Interval {
            chrom: &self.chrom,
            start: &self.start,
            end: &self.end,
        }
    }

    fn name(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// Strips a trailing `\n` or `\r\n`.
fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

/// Sequence line without surrounding spaces or tabs.
fn trim_sequence(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

fn parse_header(line: &[u8]) -> String {
    String::from_utf8_lossy(&line[1..]).trim_end().to_string()
}

/// Streaming FASTA parser.
///
/// A record starts at a line beginning with `>`; every following line up to
/// the next header or end of input is appended to its sequence. Blank lines
/// are ignored anywhere. Sequence data before the first header, or an input
/// without any record, is [`KmerCounterError::MalformedInput`].
///
/// The iterator is fused after the first error.
///
/// # Example
///
/// ```rust
/// use kmer_counter::reader::FastaReader;
///
/// let input = b">seq1\nACGT\nAC\n\n>seq2\nGATTACA\n";
/// let records: Vec<_> = FastaReader::new(&input[..]).collect::<Result<_, _>>()?;
/// assert_eq!(records[0].header, "seq1");
/// assert_eq!(&records[0].sequence[..], b"ACGTAC");
/// assert_eq!(records.len(), 2);
/// # Ok::<(), kmer_counter::error::KmerCounterError>(())
/// ```
pub struct FastaReader<R> {
    reader: R,
    line: Vec<u8>,
    line_number: usize,
    pending_header: Option<String>,
    records_read: usize,
    finished: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::with_capacity(256),
            line_number: 0,
            pending_header: None,
            records_read: 0,
            finished: false,
        }
    }

    /// Number of the last line read, 1-based.
    pub const fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next line into `self.line`; `false` at end of input.
    fn next_line(&mut self) -> Result<bool, KmerCounterError> {
        self.line.clear();
        let n = self.reader.read_until(b'\n', &mut self.line)?;
        if n == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    fn read_header(&mut self) -> Result<Option<String>, KmerCounterError> {
        if let Some(header) = self.pending_header.take() {
            return Ok(Some(header));
        }
        loop {
            if !self.next_line()? {
                if self.records_read == 0 {
                    return Err(KmerCounterError::malformed(
                        self.line_number,
                        "input contains no FASTA records",
                    ));
                }
                return Ok(None);
            }
            let line = strip_terminator(&self.line);
            if is_blank(line) {
                continue;
            }
            if line[0] == b'>' {
                return Ok(Some(parse_header(line)));
            }
            return Err(KmerCounterError::malformed(
                self.line_number,
                "sequence data before any header",
            ));
        }
    }

    fn read_record(&mut self) -> Result<Option<Record>, KmerCounterError> {
        let Some(header) = self.read_header()? else {
            return Ok(None);
        };

        let mut sequence = BytesMut::new();
        while self.next_line()? {
            let line = strip_terminator(&self.line);
            if is_blank(line) {
                continue;
            }
            if line[0] == b'>' {
                self.pending_header = Some(parse_header(line));
                break;
            }
            sequence.extend_from_slice(trim_sequence(line));
        }

        self.records_read += 1;
        Ok(Some(Record {
            header,
            sequence: sequence.freeze(),
        }))
    }
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<Record, KmerCounterError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for FastaReader<R> {}

/// Streaming reader for BED lines of the form `chrom start end sequence ...`.
///
/// Fields are split on tabs or spaces; columns after the fourth are ignored.
/// Blank lines and `#`, `track` or `browser` lines are skipped.
pub struct BedReader<R> {
    reader: R,
    line: Vec<u8>,
    line_number: usize,
    records_read: usize,
    finished: bool,
}

impl<R: BufRead> BedReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::with_capacity(256),
            line_number: 0,
            records_read: 0,
            finished: false,
        }
    }

    fn read_record(&mut self) -> Result<Option<BedRecord>, KmerCounterError> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                if self.records_read == 0 {
                    return Err(KmerCounterError::malformed(
                        self.line_number,
                        "input contains no BED records",
                    ));
                }
                return Ok(None);
            }
            self.line_number += 1;

            let line = strip_terminator(&self.line);
            if is_blank(line)
                || line.starts_with(b"#")
                || line.starts_with(b"track")
                || line.starts_with(b"browser")
            {
                continue;
            }

            let mut fields = line
                .split(|b| *b == b'\t' || *b == b' ')
                .filter(|f| !f.is_empty());
            let (Some(chrom), Some(start), Some(end), Some(sequence)) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(KmerCounterError::malformed(
                    self.line_number,
                    "expected at least four fields: chrom, start, end, sequence",
                ));
            };

            self.records_read += 1;
            return Ok(Some(BedRecord {
                chrom: String::from_utf8_lossy(chrom).into_owned(),
                start: String::from_utf8_lossy(start).into_owned(),
                end: String::from_utf8_lossy(end).into_owned(),
                sequence: Bytes::copy_from_slice(sequence),
            }));
        }
    }
}

impl<R: BufRead> Iterator for BedReader<R> {
    type Item = Result<BedRecord, KmerCounterError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for BedReader<R> {}
