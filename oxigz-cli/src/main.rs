//! OxiGz CLI - single-file gunzip
//!
//! Decompresses one gzip file into one output file, reporting the header
//! fields and throughput on stderr.

mod utils;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use oxigz_core::{ErrorKind, GzError, Result};
use oxigz_gzip::decompress_file_with;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use utils::{create_progress_bar, header_lines, mib_per_sec};

const USAGE: &str = "Usage: oxigz InputFile.gz OutputFile";

#[derive(Parser)]
#[command(name = "oxigz")]
#[command(author, version, about = "Decompress a gzip file")]
#[command(long_about = "
OxiGz decompresses a single-member gzip file and verifies its CRC-32
and length trailer.

Examples:
  oxigz data.gz data
  oxigz -q data.gz data
  oxigz --progress big.gz big
")]
struct Cli {
    /// Gzip file to decompress
    input: PathBuf,

    /// Output file (created or truncated)
    output: PathBuf,

    /// Do not print header and speed diagnostics
    #[arg(short, long)]
    quiet: bool,

    /// Show a progress spinner while decompressing
    #[arg(short = 'P', long)]
    progress: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                let _ = e.print();
                std::process::exit(0);
            }
            _ => {
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = run(&cli) {
        match e.kind() {
            ErrorKind::Usage => eprintln!("{}", e),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.input.exists() {
        return Err(GzError::usage(format!(
            "Input file does not exist: {}",
            cli.input.display()
        )));
    }
    if cli.input.is_dir() {
        return Err(GzError::usage(format!(
            "Input file is a directory: {}",
            cli.input.display()
        )));
    }
    let input_len = fs::metadata(&cli.input)?.len();

    let pb = create_progress_bar(cli.progress);
    let result = decompress_file_with(&cli.input, |header| {
        if !cli.quiet {
            for line in header_lines(header) {
                eprintln!("{}", line);
            }
        }
        Ok(BufWriter::new(pb.wrap_write(File::create(&cli.output)?)))
    });
    pb.finish_and_clear();
    let report = result?;

    if !cli.quiet {
        eprintln!(
            "Input  speed: {:.2} MiB/s",
            mib_per_sec(input_len, report.elapsed)
        );
        eprintln!(
            "Output speed: {:.2} MiB/s",
            mib_per_sec(report.decompressed_size, report.elapsed)
        );
    }
    Ok(())
}
