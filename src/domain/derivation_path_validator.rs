//! 派生路径解析与验证
//!
//! 确保注册表中的每条路径符合其派生标准：
//! - BIP44/BIP84: purpose 与 coin_type 必须匹配
//! - SLIP-0010 (ed25519): 所有层级必须硬化

use crate::domain::chain_config::{ChainConfig, CurveType, DerivationStandard};

/// 硬化索引偏移 (2^31)
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// 派生路径验证器
pub struct DerivationPathValidator;

impl DerivationPathValidator {
    /// 解析 `m/44'/60'/0'/0/0` 形式的路径为索引列表
    ///
    /// 硬化层级（`'` 或 `h` 后缀）会加上 [`HARDENED_OFFSET`]。
    pub fn parse(path: &str) -> Result<Vec<u32>, String> {
        let path = path.trim();
        let rest = path
            .strip_prefix("m/")
            .ok_or_else(|| "Path must start with 'm/'".to_string())?;

        if rest.is_empty() {
            return Err("Path must have at least one component".to_string());
        }

        rest.split('/')
            .map(|component| {
                let (digits, hardened) = match component
                    .strip_suffix('\'')
                    .or_else(|| component.strip_suffix('h'))
                {
                    Some(digits) => (digits, true),
                    None => (component, false),
                };

                let index = digits
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid path component: '{}'", component))?;
                if index >= HARDENED_OFFSET {
                    return Err(format!("Path component out of range: '{}'", component));
                }

                Ok(if hardened {
                    index | HARDENED_OFFSET
                } else {
                    index
                })
            })
            .collect()
    }

    /// 解析仅含硬化层级的路径 (SLIP-0010 ed25519)
    pub fn parse_hardened_only(path: &str) -> Result<Vec<u32>, String> {
        let indices = Self::parse(path)?;
        if let Some(pos) = indices.iter().position(|i| i & HARDENED_OFFSET == 0) {
            return Err(format!(
                "ed25519 derivation only supports hardened indices (component {} of '{}')",
                pos + 1,
                path
            ));
        }
        Ok(indices)
    }

    /// 验证路径与链配置一致
    pub fn validate(config: &ChainConfig, path: &str) -> Result<(), String> {
        let indices = match config.curve_type {
            CurveType::Ed25519 => Self::parse_hardened_only(path)?,
            CurveType::Secp256k1 => Self::parse(path)?,
        };

        let expected_purpose = match config.derivation_standard {
            DerivationStandard::BIP84 => 84,
            DerivationStandard::BIP44 | DerivationStandard::SLIP0010 => 44,
        };

        if indices.len() < 2 {
            return Err(format!("Path '{}' must include purpose and coin type", path));
        }
        if indices[0] != expected_purpose | HARDENED_OFFSET {
            return Err(format!(
                "First component of '{}' must be {}'",
                path, expected_purpose
            ));
        }
        if indices[1] != config.coin_type | HARDENED_OFFSET {
            return Err(format!(
                "Coin type of '{}' must be {}'",
                path, config.coin_type
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chain_config::{Chain, ChainRegistry};

    #[test]
    fn test_parse_path() {
        let indices = DerivationPathValidator::parse("m/44'/60'/0'/0/7").unwrap();
        assert_eq!(
            indices,
            vec![
                44 | HARDENED_OFFSET,
                60 | HARDENED_OFFSET,
                HARDENED_OFFSET,
                0,
                7
            ]
        );

        // h 后缀等价于 '
        assert_eq!(
            DerivationPathValidator::parse("m/44h/501h").unwrap(),
            DerivationPathValidator::parse("m/44'/501'").unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DerivationPathValidator::parse("44'/60'/0'/0/0").is_err());
        assert!(DerivationPathValidator::parse("m/").is_err());
        assert!(DerivationPathValidator::parse("m/44'/x/0").is_err());
        assert!(DerivationPathValidator::parse("m/2147483648").is_err());
    }

    #[test]
    fn test_hardened_only() {
        assert!(DerivationPathValidator::parse_hardened_only("m/44'/501'/0'/0'").is_ok());

        let err = DerivationPathValidator::parse_hardened_only("m/44'/501'/0'/0").unwrap_err();
        assert!(err.contains("component 4"));
    }

    #[test]
    fn test_validate_against_registry() {
        let registry = ChainRegistry::new();
        let eth = registry.get(Chain::Ethereum).unwrap();
        let btc = registry.get(Chain::Bitcoin).unwrap();
        let sol = registry.get(Chain::Solana).unwrap();

        assert!(DerivationPathValidator::validate(eth, "m/44'/60'/0'/0/0").is_ok());
        // 错误的 coin_type
        assert!(DerivationPathValidator::validate(eth, "m/44'/0'/0'/0/0").is_err());
        // Bitcoin 使用 BIP84
        assert!(DerivationPathValidator::validate(btc, "m/44'/0'/0'/0/0").is_err());
        // ed25519 不允许非硬化层级
        assert!(DerivationPathValidator::validate(sol, "m/44'/501'/0'/0").is_err());
        assert!(DerivationPathValidator::validate(sol, "m/44'/501'/0'").is_ok());
    }
}
