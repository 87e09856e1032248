use std::{
    io::{self, BufWriter},
    process,
};

use clap::Parser;
use colored::Colorize;
use kmer_counter::fixture::SequenceGenerator;

/// Write random FASTA records to standard output.
#[derive(Parser, Debug)]
#[command(name = "random-fasta")]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of records
    count: usize,

    /// Bases per record
    length: usize,

    /// Seed for the random generator
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    let args = Args::parse();
    let out = BufWriter::new(io::stdout().lock());
    if let Err(e) = SequenceGenerator::new(args.seed).write_fasta(out, args.count, args.length) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}
