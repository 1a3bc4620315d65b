use std::path::PathBuf;

use clap::Parser;

use shardcrypt_core::constants::DEFAULT_KEY_BITS;

/// Encrypt or decrypt a whole file with AES across a group of workers.
///
/// Domain arguments are optional at the parser level so that a missing one
/// is reported like every other validation failure (exit code 1).
#[derive(Debug, Parser)]
#[command(name = "shardcrypt", author, version, about, long_about = None)]
pub struct Cli {
    /// Input file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// `encrypt` or `decrypt`
    #[arg(long)]
    pub operation: Option<String>,

    /// `cbc` or `ecb`
    #[arg(long)]
    pub mode: Option<String>,

    /// Raw key text; anything after the first line break is ignored
    #[arg(long)]
    pub key: Option<String>,

    /// IV as 32 hex characters (cbc only)
    #[arg(long)]
    pub iv: Option<String>,

    /// Key length in bits: 128, 192 or 256
    #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
    pub keylen: usize,

    /// Workers in the group (default: derived from core count)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Cipher threads per worker (default: derived from core count)
    #[arg(long)]
    pub threads: Option<usize>,

    /// CBC chaining: `per-block` (IV on every block) or `standard`
    #[arg(long, default_value = "per-block")]
    pub chaining: String,

    /// Print the run's telemetry as JSON
    #[arg(long)]
    pub stats: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}
