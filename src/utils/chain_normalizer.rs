//! 链标识符标准化模块
//!
//! 统一命令行与校验器中链标识符的处理，支持名称、符号、别名与 SLIP-44 coin type

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::chain_config::Chain;

/// 链标识符配置
#[derive(Debug, Clone)]
pub struct ChainIdentifier {
    pub chain: Chain,
    /// 规范名称（小写）
    pub canonical_name: &'static str,
    /// SLIP-44 coin type
    pub coin_type: u32,
    /// 全称
    pub full_name: &'static str,
    /// 符号之外的别名（小写）
    pub aliases: &'static [&'static str],
}

/// 链标识符注册表（静态初始化，键为小写）
static CHAIN_REGISTRY: Lazy<HashMap<String, ChainIdentifier>> = Lazy::new(|| {
    let chains = vec![
        ChainIdentifier {
            chain: Chain::Bitcoin,
            canonical_name: "bitcoin",
            coin_type: 0,
            full_name: "Bitcoin",
            aliases: &["xbt"],
        },
        ChainIdentifier {
            chain: Chain::Ethereum,
            canonical_name: "ethereum",
            coin_type: 60,
            full_name: "Ethereum Mainnet",
            aliases: &["ether", "mainnet"],
        },
        ChainIdentifier {
            chain: Chain::Tron,
            canonical_name: "tron",
            coin_type: 195,
            full_name: "TRON",
            aliases: &[],
        },
        ChainIdentifier {
            chain: Chain::Solana,
            canonical_name: "solana",
            coin_type: 501,
            full_name: "Solana",
            aliases: &[],
        },
    ];

    let mut registry = HashMap::new();
    for chain in chains {
        registry.insert(chain.canonical_name.to_string(), chain.clone());
        registry.insert(chain.chain.symbol().to_lowercase(), chain.clone());

        for alias in chain.aliases {
            registry.insert(alias.to_string(), chain.clone());
        }

        // coin type 作为字符串
        registry.insert(chain.coin_type.to_string(), chain.clone());
    }

    registry
});

/// 获取链标识符配置（大小写不敏感）
pub fn get_chain_identifier(input: &str) -> anyhow::Result<&'static ChainIdentifier> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        anyhow::bail!("Chain identifier cannot be empty");
    }

    CHAIN_REGISTRY
        .get(&trimmed.to_lowercase())
        .ok_or_else(|| anyhow::anyhow!("Unsupported chain identifier: {}", trimmed))
}

/// 标准化链标识符
///
/// ```rust
/// # use criptool::utils::chain_normalizer::normalize_chain_identifier;
/// # use criptool::Chain;
/// assert_eq!(normalize_chain_identifier("ETH").unwrap(), Chain::Ethereum);
/// assert_eq!(normalize_chain_identifier("195").unwrap(), Chain::Tron);
/// ```
pub fn normalize_chain_identifier(input: &str) -> anyhow::Result<Chain> {
    get_chain_identifier(input).map(|id| id.chain)
}
