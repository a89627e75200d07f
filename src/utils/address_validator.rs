//! 地址验证模块
//!
//! 统一的地址格式验证：Bitcoin / Ethereum / Tron / Solana

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::domain::chain_config::Chain;
use crate::domain::derivation::{to_checksum_address, TRON_ADDRESS_PREFIX};
use crate::utils::chain_normalizer;

/// 地址验证器
pub struct AddressValidator;

impl AddressValidator {
    /// 验证地址格式
    ///
    /// # 参数
    /// - `chain`: 链标识符（会自动标准化）
    /// - `address`: 待验证的地址
    ///
    /// # 返回
    /// - Ok(true): 地址有效
    /// - Ok(false): 地址无效
    /// - Err: 不支持的链
    pub fn validate(chain: &str, address: &str) -> Result<bool> {
        let chain = chain_normalizer::normalize_chain_identifier(chain)?;
        Ok(Self::validate_for(chain, address))
    }

    /// 按已解析的链验证
    pub fn validate_for(chain: Chain, address: &str) -> bool {
        match chain {
            Chain::Bitcoin => Self::validate_bitcoin_address(address),
            Chain::Ethereum => Self::validate_evm_address(address),
            Chain::Tron => Self::validate_tron_address(address),
            Chain::Solana => Self::validate_solana_address(address),
        }
    }

    /// 验证EVM地址（支持EIP-55 Checksum）
    fn validate_evm_address(address: &str) -> bool {
        // 1. 基本格式检查
        let hex_part = match address.strip_prefix("0x") {
            Some(hex_part) if hex_part.len() == 40 => hex_part,
            _ => return false,
        };

        // 2. 验证hex字符
        let mut bytes = [0u8; 20];
        if hex::decode_to_slice(hex_part, &mut bytes).is_err() {
            return false;
        }

        // 3. 全小写或全大写不带校验和，混合大小写必须符合 EIP-55
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            return to_checksum_address(&bytes) == address;
        }

        true
    }

    /// 验证Tron地址（Base58Check，25字节，版本 0x41）
    fn validate_tron_address(address: &str) -> bool {
        let decoded = match bs58::decode(address).into_vec() {
            Ok(decoded) => decoded,
            Err(_) => return false,
        };

        if decoded.len() != 25 || decoded[0] != TRON_ADDRESS_PREFIX {
            return false;
        }

        let (payload, checksum) = decoded.split_at(21);
        let expected = Sha256::digest(Sha256::digest(payload));
        checksum == &expected[..4]
    }

    /// 验证Solana地址（Base58编码，32字节）
    fn validate_solana_address(address: &str) -> bool {
        // 典型长度：32-44个字符
        if address.len() < 32 || address.len() > 44 {
            return false;
        }

        match bs58::decode(address).into_vec() {
            Ok(decoded) => decoded.len() == 32,
            Err(_) => false,
        }
    }

    /// 验证Bitcoin主网地址（P2PKH / P2SH / Bech32 / Bech32m）
    fn validate_bitcoin_address(address: &str) -> bool {
        use bitcoin::address::NetworkUnchecked;
        use bitcoin::{Address, Network};

        address
            .parse::<Address<NetworkUnchecked>>()
            .map(|unchecked| unchecked.require_network(Network::Bitcoin).is_ok())
            .unwrap_or(false)
    }
}
