//! criptool 主入口

use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use criptool::cli::{Cli, Commands};
use criptool::config::Config;
use criptool::infrastructure::log_redact::SensitiveRedact;
use criptool::infrastructure::logging;
use criptool::utils::chain_normalizer;
use criptool::{
    derive_address_report, generate_mnemonic, has_strong_randomness, normalize, AddressValidator,
};
use serde_json::json;
use zeroize::Zeroizing;

fn main() -> Result<ExitCode> {
    // 1. 加载 .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 2. 配置（文件优先于环境变量）
    let loaded = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = loaded.config;
    config.validate().context("Invalid configuration")?;

    // 3. 日志写到 stderr
    logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Some(path) = &loaded.missing_file {
        tracing::warn!(path = ?path, "config file not found, using environment");
    }

    let json = cli.json || config.output.is_json();

    match cli.command {
        Commands::Generate(args) => {
            let words = args.words.unwrap_or(config.mnemonic.word_count);
            let valid_halfs = args.valid_halfs || config.mnemonic.valid_halfs;

            let mnemonic = Zeroizing::new(
                generate_mnemonic(words, valid_halfs).context("Failed to generate mnemonic")?,
            );
            tracing::info!(words, valid_halfs, "mnemonic generated");

            if json {
                println!(
                    "{}",
                    json!({ "mnemonic": mnemonic.as_str(), "word_count": words })
                );
            } else {
                println!("{}", mnemonic.as_str());
            }
        }
        Commands::Normalize(args) => {
            let phrase = read_phrase(args.phrase)?;
            let normalized = normalize(&phrase, args.length, args.valid_halfs)
                .context("Mnemonic rejected")?;
            tracing::info!(mnemonic = %normalized.redact(), "mnemonic normalized");

            if json {
                println!("{}", serde_json::to_string(&normalized)?);
            } else {
                println!("{}", normalized.phrase);
                println!("words: {}", normalized.word_count);
                println!("valid halfs: {}", normalized.halfs_valid);
            }
        }
        Commands::Derive { phrase } => {
            let phrase = read_phrase(phrase)?;
            let normalized = normalize(&phrase, 0, false).context("Mnemonic rejected")?;
            let report = derive_address_report(&normalized.phrase)
                .context("Failed to derive addresses")?;

            for entry in &report.entries {
                for derived in &entry.addresses {
                    tracing::debug!(chain = %entry.chain, address = %derived.redact(), "derived");
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Commands::ValidateAddress { chain, address } => {
            let chain = chain_normalizer::normalize_chain_identifier(&chain)?;
            let valid = AddressValidator::validate_for(chain, address.trim());

            if json {
                println!(
                    "{}",
                    json!({ "chain": chain, "address": address.trim(), "valid": valid })
                );
            } else {
                println!("{}: {}", chain, if valid { "valid" } else { "invalid" });
            }

            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::CheckRandom => {
            let strong = has_strong_randomness();
            if json {
                println!("{}", json!({ "strong_randomness": strong }));
            } else if strong {
                println!("strong random source available");
            } else {
                println!("no strong random source available");
            }

            if !strong {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// 参数缺省时从 stdin 读取助记词
fn read_phrase(arg: Option<String>) -> Result<Zeroizing<String>> {
    match arg {
        Some(phrase) => Ok(Zeroizing::new(phrase)),
        None => {
            let mut buffer = Zeroizing::new(String::new());
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read mnemonic from stdin")?;
            Ok(buffer)
        }
    }
}
