use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// BIP39 mnemonic and multi-chain address tool
#[derive(Debug, Parser)]
#[command(name = "criptool", version, about = "BIP39 mnemonic and multi-chain address tool")]
pub struct Cli {
    /// TOML config file (overrides environment defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new mnemonic
    Generate(GenerateArgs),
    /// Normalize and validate a mnemonic
    Normalize(NormalizeArgs),
    /// Derive Bitcoin, Ethereum, Tron and Solana addresses
    Derive {
        /// Mnemonic (read from stdin when omitted)
        phrase: Option<String>,
    },
    /// Check an address against a chain's format
    ValidateAddress {
        /// Chain name, symbol or coin type (btc, eth, trx, sol, ...)
        chain: String,
        address: String,
    },
    /// Report whether a strong random source is available
    CheckRandom,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Number of words (12, 15, 18, 21 or 24)
    #[arg(long, short = 'w')]
    pub words: Option<usize>,

    /// Require both halves to be valid mnemonics
    #[arg(long)]
    pub valid_halfs: bool,
}

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Mnemonic (read from stdin when omitted)
    pub phrase: Option<String>,

    /// Required number of words, 0 for any valid length
    #[arg(long, short = 'l', default_value_t = 0)]
    pub length: usize,

    #[arg(long)]
    pub valid_halfs: bool,
}
