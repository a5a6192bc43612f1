mod benchmark;
mod generate;
mod search;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use brutetable_core::{HashAlgorithm, TableCtxBuilder};
use clap::{value_parser, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use benchmark::benchmark;
use generate::generate;
use search::search;

/// All the hash algorithms supported.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum AlgorithmArg {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Rmd160,
}

impl From<AlgorithmArg> for HashAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Md5 => HashAlgorithm::Md5,
            AlgorithmArg::Sha1 => HashAlgorithm::Sha1,
            AlgorithmArg::Sha256 => HashAlgorithm::Sha256,
            AlgorithmArg::Sha384 => HashAlgorithm::Sha384,
            AlgorithmArg::Sha512 => HashAlgorithm::Sha512,
            AlgorithmArg::Rmd160 => HashAlgorithm::Rmd160,
        }
    }
}

/// Brute-force table generation and salted digest lookup.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Generate(Generate),
    Search(Search),
    Benchmark(Benchmark),
}

/// The candidate space and hashing parameters shared by every command.
#[derive(Args)]
pub struct SpaceArgs {
    /// The hash algorithm.
    #[arg(short, long, value_enum, default_value = "sha256")]
    algorithm: AlgorithmArg,

    /// A salt prepended to every candidate before hashing.
    #[arg(short, long, default_value = "")]
    salt: String,

    /// The minimum candidate length.
    #[arg(long, value_parser = value_parser!(u64).range(1..), default_value_t = 1)]
    min_length: u64,

    /// The maximum candidate length.
    #[arg(long, value_parser = value_parser!(u64).range(1..), default_value_t = 4)]
    max_length: u64,

    /// The number of worker threads.
    #[arg(short, long, value_parser = value_parser!(u64).range(1..), default_value_t = default_threads())]
    threads: u64,

    /// Include uppercase letters in the charset.
    #[arg(short = 'u', long)]
    uppercase: bool,

    /// Include digits in the charset.
    #[arg(short = 'd', long)]
    digits: bool,

    /// Include special symbols in the charset.
    #[arg(short = 'p', long)]
    special: bool,

    /// Override the base (lowercase) character class.
    #[arg(long, value_parser = check_charset)]
    base_charset: Option<String>,

    /// Override the uppercase character class.
    #[arg(long, value_parser = check_charset)]
    uppercase_charset: Option<String>,

    /// Override the digits character class.
    #[arg(long, value_parser = check_charset)]
    digits_charset: Option<String>,

    /// Override the special symbols character class.
    #[arg(long, value_parser = check_charset)]
    special_charset: Option<String>,
}

impl SpaceArgs {
    fn ctx_builder(&self) -> TableCtxBuilder {
        let mut builder = TableCtxBuilder::new()
            .hash(self.algorithm.into())
            .salt(self.salt.as_bytes())
            .length_range(self.min_length as usize, self.max_length as usize)
            .threads(self.threads as usize)
            .include_uppercase(self.uppercase)
            .include_digits(self.digits)
            .include_special(self.special);

        if let Some(charset) = &self.base_charset {
            builder = builder.base_charset(charset.as_bytes());
        }
        if let Some(charset) = &self.uppercase_charset {
            builder = builder.uppercase_charset(charset.as_bytes());
        }
        if let Some(charset) = &self.digits_charset {
            builder = builder.digits_charset(charset.as_bytes());
        }
        if let Some(charset) = &self.special_charset {
            builder = builder.special_charset(charset.as_bytes());
        }

        builder
    }
}

/// Generate the full digest table and store it to a file.
#[derive(Args)]
pub struct Generate {
    /// The output file. The extension selects the format: txt, csv or json.
    output: PathBuf,

    /// Replace the output file if it already exists.
    #[arg(short = 'f', long)]
    overwrite: bool,

    #[command(flatten)]
    space: SpaceArgs,
}

/// Find the plaintext producing a target digest.
#[derive(Args)]
pub struct Search {
    /// The digest to search for, in hexadecimal.
    #[arg(value_parser = check_hex)]
    digest: String,

    #[command(flatten)]
    space: SpaceArgs,
}

/// Measure the sustained hashing throughput of the pipeline.
#[derive(Args)]
pub struct Benchmark {
    /// The measurement budget in seconds.
    #[arg(short, long, value_parser = value_parser!(u64).range(1..), default_value_t = 10)]
    budget: u64,

    #[command(flatten)]
    space: SpaceArgs,
}

/// Checks if the charset is made of ASCII characters.
fn check_charset(charset: &str) -> Result<String> {
    if !charset.is_ascii() {
        bail!("The charset can only contain ASCII characters");
    }

    Ok(charset.to_owned())
}

/// Checks if the digest is valid hexadecimal.
fn check_hex(hex: &str) -> Result<String> {
    hex::decode(hex).context("The digest is not valid hexadecimal")?;

    Ok(hex.to_owned())
}

fn default_threads() -> u64 {
    std::thread::available_parallelism()
        .map(|threads| threads.get() as u64)
        .unwrap_or(1)
}

/// Default progress bar style for long-running commands.
fn default_progress_style() -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
        .unwrap()
        .progress_chars("#>-")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.commands {
        Commands::Generate(gen) => generate(gen)?,
        Commands::Search(srch) => search(srch)?,
        Commands::Benchmark(bench) => benchmark(bench)?,
    }

    Ok(())
}
