//! Command-line interface definition.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::{format::OutputFormat, input::InputFormat, kmer::Strand};

/// Count k-mers in every record of a FASTA or BED file.
///
/// Writes one line per record: `>header<TAB>KMER:COUNT ...`, k-mers sorted.
#[derive(Parser, Debug)]
#[command(name = "kmer-counter")]
#[command(version, author, about, long_about = None)]
#[command(group(ArgGroup::new("layout").required(true).args(["fasta", "bed"])))]
pub struct Args {
    /// K-mer length (at least 1)
    #[arg(short, long, value_parser = parse_k)]
    pub k: usize,

    /// Input is FASTA
    #[arg(short, long)]
    pub fasta: bool,

    /// Input is BED with the sequence in the fourth column
    #[arg(short, long)]
    pub bed: bool,

    /// Input file; reads standard input if omitted or `-`
    pub input: Option<PathBuf>,

    /// Count over all records together and print a single line
    #[arg(long)]
    pub merge: bool,

    /// Which strand(s) to count
    #[arg(long, value_enum, default_value_t = Strand::Forward)]
    pub strand: Strand,

    /// Fail on the first ambiguous or invalid base instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Minimum count threshold (pairs below this are left out)
    #[arg(short, long, default_value_t = 1)]
    pub min_count: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Line)]
    pub format: OutputFormat,

    /// Print integer ids starting at this offset instead of k-mers
    #[arg(short, long)]
    pub offset: Option<u64>,

    /// Write results into this directory instead of standard output
    #[arg(short, long)]
    pub results_dir: Option<PathBuf>,

    /// Worker threads (0 uses every core)
    #[arg(short = 'j', long, default_value_t = 1)]
    pub threads: usize,

    /// Memory-map the input file
    #[cfg(feature = "mmap")]
    #[arg(long)]
    pub mmap: bool,

    /// Suppress informational output (only output k-mer counts)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
}

impl Args {
    pub const fn input_format(&self) -> InputFormat {
        if self.bed {
            InputFormat::Bed
        } else {
            InputFormat::Fasta
        }
    }

    #[cfg(feature = "mmap")]
    pub const fn use_mmap(&self) -> bool {
        self.mmap
    }

    #[cfg(not(feature = "mmap"))]
    pub const fn use_mmap(&self) -> bool {
        false
    }
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k == 0 {
        return Err("k-mer length must be at least 1".to_string());
    }
    Ok(k)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_short_and_long_flags() {
        let args = Args::try_parse_from(["kmer-counter", "--fasta", "--k=4", "in.fa"]).unwrap();
        assert_eq!(args.k, 4);
        assert_eq!(args.input_format(), InputFormat::Fasta);
        assert_eq!(args.input, Some(PathBuf::from("in.fa")));
        assert_eq!(args.strand, Strand::Forward);
        assert_eq!(args.threads, 1);
    }

    #[test]
    fn requires_an_input_layout() {
        assert!(Args::try_parse_from(["kmer-counter", "-k", "4"]).is_err());
        assert!(Args::try_parse_from(["kmer-counter", "-k", "4", "--fasta", "--bed"]).is_err());
    }

    #[test]
    fn rejects_zero_k() {
        assert!(Args::try_parse_from(["kmer-counter", "--bed", "-k", "0"]).is_err());
        assert!(Args::try_parse_from(["kmer-counter", "--bed", "-k", "x"]).is_err());
    }

    #[test]
    fn parses_options() {
        let args = Args::try_parse_from([
            "kmer-counter",
            "-b",
            "-k",
            "3",
            "--merge",
            "--strand",
            "both",
            "--strict",
            "-m",
            "2",
            "--format",
            "json",
            "--offset=100",
            "-r",
            "out",
            "-j",
            "4",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.input_format(), InputFormat::Bed);
        assert!(args.merge && args.strict);
        assert_eq!(args.strand, Strand::Both);
        assert_eq!(args.min_count, 2);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.offset, Some(100));
        assert_eq!(args.results_dir, Some(PathBuf::from("out")));
        assert_eq!(args.threads, 4);
        assert_eq!(args.verbose, 2);
        assert!(args.input.is_none());
    }
}
