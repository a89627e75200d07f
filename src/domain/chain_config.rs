//! 多链配置模块
//!
//! 定义报告中支持的区块链、加密曲线与派生路径。
//! 注册表的顺序即报告顺序：Bitcoin, Ethereum, Tron, Solana。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::derivation_path_validator::DerivationPathValidator;

/// 支持的链
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Bitcoin,
    Ethereum,
    Tron,
    Solana,
}

impl Chain {
    /// 报告中使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "Bitcoin",
            Chain::Ethereum => "Ethereum",
            Chain::Tron => "Tron",
            Chain::Solana => "Solana",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "BTC",
            Chain::Ethereum => "ETH",
            Chain::Tron => "TRX",
            Chain::Solana => "SOL",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 加密曲线类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// secp256k1 曲线 (Bitcoin, Ethereum, Tron)
    Secp256k1,
    /// ed25519 曲线 (Solana)
    Ed25519,
}

/// 地址编码格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFormat {
    /// Bech32 编码 (Bitcoin native segwit, P2WPKH)
    Bech32,
    /// 0x + EIP-55 混合大小写十六进制
    EthereumHex,
    /// Base58Check, 版本字节 0x41
    TronBase58Check,
    /// 公钥直接 Base58 编码
    SolanaBase58,
}

/// HD 派生标准
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivationStandard {
    /// BIP44: m/44'/coin_type'/account'/change/index
    BIP44,
    /// BIP84: m/84'/coin_type'/account'/change/index (native segwit)
    BIP84,
    /// SLIP-0010: 适用于 ed25519，仅硬化派生
    SLIP0010,
}

/// 带标签的派生路径（Solana 同时报告两个钱包的路径）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledPath {
    pub path: String,
    pub label: Option<String>,
}

impl LabeledPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: None,
        }
    }

    pub fn labeled(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: Some(label.into()),
        }
    }
}

/// 链配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain: Chain,
    /// 加密曲线类型
    pub curve_type: CurveType,
    /// 地址格式
    pub address_format: AddressFormat,
    /// HD 派生标准
    pub derivation_standard: DerivationStandard,
    /// SLIP-44 coin type
    pub coin_type: u32,
    /// 报告使用的固定路径
    pub paths: Vec<LabeledPath>,
}

impl ChainConfig {
    /// 验证配置完整性：曲线与地址格式匹配，每条路径符合派生标准
    pub fn validate(&self) -> Result<(), String> {
        if self.paths.is_empty() {
            return Err("no derivation paths configured".to_string());
        }

        match (self.curve_type, self.address_format) {
            (
                CurveType::Secp256k1,
                AddressFormat::Bech32 | AddressFormat::EthereumHex | AddressFormat::TronBase58Check,
            ) => {}
            (CurveType::Ed25519, AddressFormat::SolanaBase58) => {}
            _ => {
                return Err(format!(
                    "incompatible curve_type and address_format: {:?} / {:?}",
                    self.curve_type, self.address_format
                ));
            }
        }

        for labeled in &self.paths {
            DerivationPathValidator::validate(self, &labeled.path)?;
        }

        Ok(())
    }
}

/// 链配置注册表
pub struct ChainRegistry {
    configs: Vec<ChainConfig>,
}

impl ChainRegistry {
    /// 创建预配置的注册表
    pub fn new() -> Self {
        let mut registry = Self {
            configs: Vec::new(),
        };

        registry.register_default_chains();
        registry
    }

    /// 注册默认支持的链（注册顺序即报告顺序）
    fn register_default_chains(&mut self) {
        // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
        // Secp256k1 系列 (BIP32)
        // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

        // Bitcoin (BIP84 - native segwit)
        self.register(ChainConfig {
            chain: Chain::Bitcoin,
            curve_type: CurveType::Secp256k1,
            address_format: AddressFormat::Bech32,
            derivation_standard: DerivationStandard::BIP84,
            coin_type: 0,
            paths: vec![LabeledPath::new("m/84'/0'/0'/0/0")],
        });

        // Ethereum Mainnet
        self.register(ChainConfig {
            chain: Chain::Ethereum,
            curve_type: CurveType::Secp256k1,
            address_format: AddressFormat::EthereumHex,
            derivation_standard: DerivationStandard::BIP44,
            coin_type: 60,
            paths: vec![LabeledPath::new("m/44'/60'/0'/0/0")],
        });

        // Tron: 与 Ethereum 相同的地址哈希方式，Base58Check 编码
        self.register(ChainConfig {
            chain: Chain::Tron,
            curve_type: CurveType::Secp256k1,
            address_format: AddressFormat::TronBase58Check,
            derivation_standard: DerivationStandard::BIP44,
            coin_type: 195,
            paths: vec![LabeledPath::new("m/44'/195'/0'/0/0")],
        });

        // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
        // Ed25519 系列 (SLIP-0010)
        // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

        // Solana: Trust Wallet 用 m/44'/501'/0'，Solflare 用 m/44'/501'/0'/0'
        self.register(ChainConfig {
            chain: Chain::Solana,
            curve_type: CurveType::Ed25519,
            address_format: AddressFormat::SolanaBase58,
            derivation_standard: DerivationStandard::SLIP0010,
            coin_type: 501,
            paths: vec![
                LabeledPath::labeled("m/44'/501'/0'", "trustwallet"),
                LabeledPath::labeled("m/44'/501'/0'/0'", "solflare"),
            ],
        });
    }

    /// 注册链配置（同一条链重复注册时覆盖原配置）
    pub fn register(&mut self, config: ChainConfig) {
        match self.configs.iter_mut().find(|c| c.chain == config.chain) {
            Some(existing) => *existing = config,
            None => self.configs.push(config),
        }
    }

    pub fn get(&self, chain: Chain) -> Option<&ChainConfig> {
        self.configs.iter().find(|c| c.chain == chain)
    }

    /// 按报告顺序列出所有链
    pub fn list_all(&self) -> &[ChainConfig] {
        &self.configs
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}
