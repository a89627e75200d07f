//! 多链地址派生服务
//!
//! 从同一个助记词派生 Bitcoin / Ethereum / Tron / Solana 地址，
//! 按注册表顺序生成地址报告。任一链失败则整个调用失败。

use std::fmt;

use bip39::{Language, Mnemonic};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::domain::chain_config::{Chain, ChainRegistry};
use crate::domain::derivation::{DerivationStrategyFactory, DerivedAddress};
use crate::error::DerivationError;

/// 单条链的派生结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainAddresses {
    pub chain: Chain,
    pub addresses: Vec<DerivedAddress>,
}

/// 地址报告
///
/// `Display` 输出固定格式，每条链一行：
///
/// ```text
/// Bitcoin: bc1q...
/// Ethereum: 0x...
/// Tron: T...
/// Solana: <addr> (trustwallet), <addr> (solflare)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressReport {
    pub entries: Vec<ChainAddresses>,
}

impl AddressReport {
    /// 某条链的第一个地址
    pub fn address(&self, chain: Chain) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.chain == chain)
            .and_then(|e| e.addresses.first())
            .map(|a| a.address.as_str())
    }

    /// 某条链上带指定标签的地址
    pub fn labeled_address(&self, chain: Chain, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.chain == chain)?
            .addresses
            .iter()
            .find(|a| a.label.as_deref() == Some(label))
            .map(|a| a.address.as_str())
    }
}

impl fmt::Display for AddressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: ", entry.chain)?;
            for (j, derived) in entry.addresses.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&derived.address)?;
                if let Some(label) = &derived.label {
                    write!(f, " ({})", label)?;
                }
            }
        }
        Ok(())
    }
}

/// 地址派生服务
pub struct AddressDeriver {
    registry: ChainRegistry,
}

impl AddressDeriver {
    pub fn new() -> Self {
        Self::with_registry(ChainRegistry::new())
    }

    pub fn with_registry(registry: ChainRegistry) -> Self {
        Self { registry }
    }

    /// 派生地址报告
    ///
    /// # 流程
    /// 1. 解析助记词（调用方应先经过规范化）
    /// 2. PBKDF2 拉伸为 64 字节种子（空口令）
    /// 3. 按注册表顺序校验每条链的配置，选择策略并派生
    pub fn derive_report(&self, mnemonic: &str) -> Result<AddressReport, DerivationError> {
        let parsed = Mnemonic::parse_in_normalized(Language::English, mnemonic).map_err(|e| {
            tracing::warn!(error = %e, "rejected mnemonic before derivation");
            DerivationError::InvalidMnemonic {
                detail: e.to_string(),
            }
        })?;

        let seed = Zeroizing::new(parsed.to_seed(""));

        let entries = self
            .registry
            .list_all()
            .iter()
            .map(|config| {
                // 自定义注册表可能含不合法的路径或格式
                config
                    .validate()
                    .map_err(|e| DerivationError::failed(config.chain, e))?;

                let strategy = DerivationStrategyFactory::create_strategy(config.curve_type);
                let addresses = config
                    .paths
                    .iter()
                    .map(|path| strategy.derive_address(&seed[..], config, path))
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(ChainAddresses {
                    chain: config.chain,
                    addresses,
                })
            })
            .collect::<Result<Vec<_>, DerivationError>>()?;

        tracing::debug!(chains = entries.len(), "address report derived");

        Ok(AddressReport { entries })
    }
}

impl Default for AddressDeriver {
    fn default() -> Self {
        Self::new()
    }
}

/// 用默认注册表派生地址报告
pub fn derive_address_report(mnemonic: &str) -> Result<AddressReport, DerivationError> {
    AddressDeriver::new().derive_report(mnemonic)
}

/// 派生地址并渲染为文本报告
pub fn derive_addresses(mnemonic: &str) -> Result<String, DerivationError> {
    derive_address_report(mnemonic).map(|report| report.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain_config::{
        AddressFormat, ChainConfig, CurveType, DerivationStandard, LabeledPath,
    };

    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_report_layout() {
        let text = derive_addresses(TEST_MNEMONIC).unwrap();

        assert_eq!(
            text,
            "Bitcoin: bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu\n\
             Ethereum: 0x9858EfFD232B4033E47d90003D41EC34EcaEda94\n\
             Tron: TUEZSdKsoDHQMeZwihtdoBiN46zxhGWYdH\n\
             Solana: GjJyeC1r2RgkuoCWMyPYkCWSGSGLcz266EaAkLA27AhL (trustwallet), \
             HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk (solflare)"
        );
    }

    #[test]
    fn test_report_lookup() {
        let report = derive_address_report(TEST_MNEMONIC).unwrap();
        assert_eq!(
            report.address(Chain::Ethereum),
            Some("0x9858EfFD232B4033E47d90003D41EC34EcaEda94")
        );

        assert_eq!(
            report.labeled_address(Chain::Solana, "trustwallet"),
            Some("GjJyeC1r2RgkuoCWMyPYkCWSGSGLcz266EaAkLA27AhL")
        );
        assert_eq!(
            report.labeled_address(Chain::Solana, "solflare"),
            Some("HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk")
        );
        assert!(report.labeled_address(Chain::Solana, "phantom").is_none());
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            derive_addresses(TEST_MNEMONIC).unwrap(),
            derive_addresses(TEST_MNEMONIC).unwrap()
        );
    }

    #[test]
    fn test_invalid_mnemonic() {
        let err = derive_addresses("abandon abandon abandon").unwrap_err();
        assert!(matches!(err, DerivationError::InvalidMnemonic { .. }));
    }

    #[test]
    fn test_failure_aborts_whole_report() {
        let mut registry = ChainRegistry::new();
        // ed25519 不允许非硬化层级
        registry.register(ChainConfig {
            chain: Chain::Solana,
            curve_type: CurveType::Ed25519,
            address_format: AddressFormat::SolanaBase58,
            derivation_standard: DerivationStandard::SLIP0010,
            coin_type: 501,
            paths: vec![LabeledPath::new("m/44'/501'/0'/0")],
        });

        let err = AddressDeriver::with_registry(registry)
            .derive_report(TEST_MNEMONIC)
            .unwrap_err();
        assert!(matches!(
            err,
            DerivationError::DerivationFailed {
                chain: Chain::Solana,
                ..
            }
        ));
    }

    #[test]
    fn test_custom_registry_is_validated() {
        let mut registry = ChainRegistry::new();
        // coin type 与路径不符
        registry.register(ChainConfig {
            chain: Chain::Ethereum,
            curve_type: CurveType::Secp256k1,
            address_format: AddressFormat::EthereumHex,
            derivation_standard: DerivationStandard::BIP44,
            coin_type: 60,
            paths: vec![LabeledPath::new("m/44'/0'/0'/0/0")],
        });

        match AddressDeriver::with_registry(registry).derive_report(TEST_MNEMONIC) {
            Err(DerivationError::DerivationFailed { chain, reason }) => {
                assert_eq!(chain, Chain::Ethereum);
                assert!(reason.contains("Coin type"), "{}", reason);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_incompatible_format_is_rejected() {
        let mut registry = ChainRegistry::new();
        registry.register(ChainConfig {
            chain: Chain::Tron,
            curve_type: CurveType::Secp256k1,
            address_format: AddressFormat::SolanaBase58,
            derivation_standard: DerivationStandard::BIP44,
            coin_type: 195,
            paths: vec![LabeledPath::new("m/44'/195'/0'/0/0")],
        });

        let err = AddressDeriver::with_registry(registry)
            .derive_report(TEST_MNEMONIC)
            .unwrap_err();
        assert!(err.to_string().starts_with("Tron derivation failed: incompatible"));
    }

    #[test]
    fn test_empty_paths_are_rejected() {
        let mut registry = ChainRegistry::new();
        registry.register(ChainConfig {
            chain: Chain::Bitcoin,
            curve_type: CurveType::Secp256k1,
            address_format: AddressFormat::Bech32,
            derivation_standard: DerivationStandard::BIP84,
            coin_type: 0,
            paths: Vec::new(),
        });

        let err = AddressDeriver::with_registry(registry)
            .derive_report(TEST_MNEMONIC)
            .unwrap_err();
        assert_eq!(
            err,
            DerivationError::failed(Chain::Bitcoin, "no derivation paths configured")
        );
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = derive_address_report(TEST_MNEMONIC).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["entries"][0]["chain"], "Bitcoin");
        assert_eq!(json["entries"][3]["addresses"][1]["label"], "solflare");
        // 无标签时不输出 label 字段
        assert!(json["entries"][1]["addresses"][0].get("label").is_none());
    }
}
