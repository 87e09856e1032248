use std::process;

use clap::Parser;
use colored::Colorize;
use kmer_counter::{cli::Args, config::Config, run};

fn main() {
    let args = Args::parse();

    #[cfg(feature = "tracing")]
    kmer_counter::logging::init(if args.quiet { 0 } else { args.verbose });

    let config = Config::from_args(args).unwrap_or_else(|e| {
        eprintln!();
        eprintln!(
            "{}\n {}",
            "Problem parsing arguments:".blue().bold(),
            e.to_string().blue()
        );
        eprintln!();
        eprintln!(
            "{}\n {}",
            "Help menu:".blue().bold(),
            "$ kmer-counter --help".bold()
        );
        eprintln!();
        process::exit(1);
    });

    if !config.quiet {
        if let Some(k) = config.counter.get_k() {
            eprintln!("{}: {}", "k-length".bold(), k.to_string().blue().bold());
        }
        eprintln!(
            "{}: {}",
            "data".bold(),
            config.input.to_string().underline().bold().blue()
        );
        if let Some(dir) = &config.results_dir {
            eprintln!(
                "{}: {}",
                "results".bold(),
                dir.display().to_string().blue().bold()
            );
        }
        eprintln!();
    }

    match run::run(&config) {
        Ok(summary) => {
            if !config.quiet {
                eprintln!(
                    "{}: {} records, {} bases, {} k-mers",
                    "counted".bold(),
                    summary.records_processed,
                    summary.bases_processed,
                    summary.kmers_counted
                );
            }
        }
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    }
}
