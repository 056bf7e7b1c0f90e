//! mapbed: extract uniquely mappable regions from a mappability FASTA
//!
//! Usage: mapbed [OPTIONS] <FASTA> <BED>

use clap::Parser;
use log::debug;
use std::fs::File;
use std::path::PathBuf;
use std::process;

use mapbed::commands::ExtractCommand;
use mapbed::error::MapbedError;

#[derive(Parser)]
#[command(name = "mapbed")]
#[command(version)]
#[command(
    about = "Convert a mappability FASTA file to a BED file with uniquely mappable (c3) regions",
    long_about = None
)]
struct Cli {
    /// Input mappability FASTA file (use - for stdin)
    fasta_file: PathBuf,

    /// Output BED file with uniquely mappable regions
    output_bed: PathBuf,

    /// Print extraction statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Use smaller I/O buffers
    #[arg(long)]
    low_memory: bool,
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    println!(
        "BED file with uniquely mappable regions written to: {}",
        cli.output_bed.display()
    );
}

fn run(cli: &Cli) -> Result<(), MapbedError> {
    let cmd = ExtractCommand::new().with_low_memory(cli.low_memory);

    let stats = if cli.fasta_file.to_string_lossy() == "-" {
        let mut output = File::create(&cli.output_bed)?;
        cmd.run_stdin(&mut output)?
    } else {
        cmd.run(&cli.fasta_file, &cli.output_bed)?
    };
    debug!("{:?}", stats);

    if cli.stats {
        eprintln!("Extract stats: {}", stats);
    }

    Ok(())
}
