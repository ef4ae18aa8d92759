mod attack;
mod bruteforce;
mod generate;
mod info;
mod simulate;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use prism_core::{
    BackendKind, HashFunction, RainbowTableCtxBuilder, DEFAULT_BATCH_SIZE, DEFAULT_CHAIN_COUNT,
    DEFAULT_CHAIN_LENGTH, DEFAULT_CHARSET, DEFAULT_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH_ALLOWED,
};

use attack::attack;
use bruteforce::bruteforce;
use generate::generate;
use info::info;
use simulate::simulate;

/// All the hash functions supported.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum HashFunctionArg {
    Ntlm,
    Md4,
    Md5,
    Sha1,
    #[value(name = "sha2-224")]
    Sha2_224,
    #[value(name = "sha2-256")]
    Sha2_256,
    #[value(name = "sha2-384")]
    Sha2_384,
    #[value(name = "sha2-512")]
    Sha2_512,
    #[value(name = "sha3-224")]
    Sha3_224,
    #[value(name = "sha3-256")]
    Sha3_256,
    #[value(name = "sha3-384")]
    Sha3_384,
    #[value(name = "sha3-512")]
    Sha3_512,
}

impl From<HashFunctionArg> for HashFunction {
    fn from(arg: HashFunctionArg) -> Self {
        match arg {
            HashFunctionArg::Ntlm => HashFunction::Ntlm,
            HashFunctionArg::Md4 => HashFunction::Md4,
            HashFunctionArg::Md5 => HashFunction::Md5,
            HashFunctionArg::Sha1 => HashFunction::Sha1,
            HashFunctionArg::Sha2_224 => HashFunction::Sha2_224,
            HashFunctionArg::Sha2_256 => HashFunction::Sha2_256,
            HashFunctionArg::Sha2_384 => HashFunction::Sha2_384,
            HashFunctionArg::Sha2_512 => HashFunction::Sha2_512,
            HashFunctionArg::Sha3_224 => HashFunction::Sha3_224,
            HashFunctionArg::Sha3_256 => HashFunction::Sha3_256,
            HashFunctionArg::Sha3_384 => HashFunction::Sha3_384,
            HashFunctionArg::Sha3_512 => HashFunction::Sha3_512,
        }
    }
}

/// The backends available to generate a table.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    /// Single-threaded reference computation.
    Sequential,
    /// Multithreaded CPU computation.
    Cpu,
    /// Multithreaded computation of chains in lockstep lanes.
    Lanes,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sequential => BackendKind::Sequential,
            BackendArg::Cpu => BackendKind::Cpu,
            BackendArg::Lanes => BackendKind::Lanes,
        }
    }
}

/// Rainbow table application allowing table generation and digest attacks.
///
/// Set RUST_LOG (e.g. RUST_LOG=debug) to control the logs.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The number of threads to use. Defaults to the number of logical cores.
    #[arg(long, global = true, value_parser = value_parser!(u16).range(1..))]
    threads: Option<u16>,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Generate(Generate),
    Attack(Attack),
    Info(Info),
    Simulate(Simulate),
    Bruteforce(Bruteforce),
}

/// The parameters a table is generated and searched with.
/// They must be identical when generating and using a table.
#[derive(Args, Clone)]
pub struct CtxArgs {
    /// The hash function.
    #[arg(long = "hash", value_enum, default_value_t = HashFunctionArg::Md5)]
    hash_function: HashFunctionArg,

    /// The charset to use. The order of the characters matters.
    #[arg(short, long, value_parser = check_charset, default_value_t = String::from_utf8_lossy(DEFAULT_CHARSET).to_string())]
    charset: String,

    /// The length of the passwords.
    #[arg(short = 'l', long = "length", value_parser = value_parser!(u8).range(1..=MAX_PASSWORD_LENGTH_ALLOWED as i64), default_value_t = DEFAULT_PASSWORD_LENGTH)]
    password_length: u8,

    /// The chain length.
    /// Increasing the chain length will reduce the memory used
    /// to store the table but increase the time taken to attack.
    #[arg(short = 't', long, value_parser = value_parser!(u64).range(1..), default_value_t = DEFAULT_CHAIN_LENGTH)]
    chain_length: u64,
}

impl CtxArgs {
    fn builder(&self) -> RainbowTableCtxBuilder {
        RainbowTableCtxBuilder::new()
            .hash(self.hash_function.into())
            .charset(self.charset.as_bytes())
            .password_length(self.password_length)
            .chain_length(self.chain_length)
    }
}

/// Generate a rainbow table.
#[derive(Args)]
pub struct Generate {
    /// The path where the generated table should be stored.
    #[arg(value_parser)]
    table: PathBuf,

    #[command(flatten)]
    ctx: CtxArgs,

    /// The number of chains to generate.
    #[arg(short = 'n', long, default_value_t = DEFAULT_CHAIN_COUNT)]
    chains: u64,

    /// Seed the startpoint generator to get a reproducible table.
    #[arg(short, long)]
    seed: Option<u64>,

    /// The backend computing the chains.
    #[arg(short, long, value_enum, default_value_t = BackendArg::Cpu)]
    backend: BackendArg,

    /// The number of chains computed in a batch.
    #[arg(long, value_parser = value_parser!(u64).range(1..), default_value_t = DEFAULT_BATCH_SIZE as u64)]
    batch_size: u64,
}

/// Find the passwords producing the given digests.
#[derive(Args)]
pub struct Attack {
    /// The rainbow table to use.
    #[arg(value_parser)]
    table: PathBuf,

    /// The digests to attack, in hexadecimal.
    #[arg(required = true, value_parser = check_hex)]
    digests: Vec<String>,

    #[command(flatten)]
    ctx: CtxArgs,
}

/// Display the parameters a rainbow table was generated with.
#[derive(Args)]
pub struct Info {
    /// The rainbow table to inspect.
    #[arg(value_parser)]
    table: PathBuf,
}

/// Estimate the success rate of a rainbow table by cracking random passwords.
/// The parameters stored in the table are used.
#[derive(Args)]
pub struct Simulate {
    /// The rainbow table to use.
    #[arg(value_parser)]
    table: PathBuf,

    /// The number of random passwords to crack.
    #[arg(short, long, value_parser = value_parser!(u64).range(1..), default_value_t = 1000)]
    attempts: u64,

    /// Seed the generator of the random passwords.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

/// Find the password producing a digest by trying every password of the search space.
#[derive(Args)]
pub struct Bruteforce {
    /// The digest to attack, in hexadecimal.
    #[arg(value_parser = check_hex)]
    digest: String,

    #[command(flatten)]
    ctx: CtxArgs,
}

/// Checks if the charset is made of printable ASCII characters.
fn check_charset(charset: &str) -> Result<String> {
    if !charset.bytes().all(|c| c.is_ascii_graphic() || c == b' ') {
        bail!("The charset can only contain printable ASCII characters");
    }

    Ok(charset.to_owned())
}

/// Checks if the digest is valid hexadecimal.
fn check_hex(hex: &str) -> Result<String> {
    hex::decode(hex).context("The digest is not valid hexadecimal")?;
    Ok(hex.to_lowercase())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads as usize)
            .build_global()
            .context("Unable to start the thread pool")?;
    }

    match cli.commands {
        Commands::Generate(gen) => generate(gen)?,
        Commands::Attack(atk) => attack(atk)?,
        Commands::Info(inf) => info(inf)?,
        Commands::Simulate(sim) => simulate(sim)?,
        Commands::Bruteforce(bf) => bruteforce(bf)?,
    }

    Ok(())
}
