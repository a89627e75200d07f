//! 钱包派生策略
//!
//! 为不同的加密曲线提供统一的地址派生接口：
//! - secp256k1: BIP32 派生，按链编码为 bech32 / EIP-55 / Tron Base58Check
//! - ed25519: SLIP-0010 派生（仅硬化），公钥 Base58 编码

use coins_bip32::path::DerivationPath;
use hmac::{Hmac, Mac};
use k256::ecdsa::{SigningKey, VerifyingKey};
use serde::Serialize;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;
use zeroize::Zeroizing;

use crate::domain::chain_config::{AddressFormat, ChainConfig, CurveType, LabeledPath};
use crate::domain::derivation_path_validator::{DerivationPathValidator, HARDENED_OFFSET};
use crate::error::DerivationError;

type HmacSha512 = Hmac<Sha512>;

/// Tron 主网地址版本字节
pub const TRON_ADDRESS_PREFIX: u8 = 0x41;

/// 派生结果（只含公开信息，私钥不离开派生函数）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedAddress {
    /// 派生路径
    pub path: String,
    /// 钱包标签 (例如 "trustwallet")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// 地址
    pub address: String,
    /// 公钥 (hex 编码)
    pub public_key: String,
}

/// 钱包派生策略 trait
pub trait DerivationStrategy: Send + Sync {
    /// 从种子按给定路径派生地址
    ///
    /// # Arguments
    /// * `seed` - BIP39 种子 (64 字节)
    /// * `chain_config` - 链配置
    /// * `path` - 带标签的派生路径
    fn derive_address(
        &self,
        seed: &[u8],
        chain_config: &ChainConfig,
        path: &LabeledPath,
    ) -> Result<DerivedAddress, DerivationError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Secp256k1 策略 (Bitcoin, Ethereum, Tron)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct Secp256k1Strategy;

impl DerivationStrategy for Secp256k1Strategy {
    fn derive_address(
        &self,
        seed: &[u8],
        chain_config: &ChainConfig,
        path: &LabeledPath,
    ) -> Result<DerivedAddress, DerivationError> {
        use coins_bip32::prelude::*;

        let chain = chain_config.chain;

        // 解析派生路径
        let derivation_path = path.path.parse::<DerivationPath>().map_err(|e| {
            DerivationError::failed(chain, format!("invalid derivation path: {}", e))
        })?;

        // 从种子派生密钥
        let master_key = XPriv::root_from_seed(seed, None)
            .map_err(|e| DerivationError::failed(chain, format!("master key: {}", e)))?;

        let derived_key = master_key
            .derive_path(&derivation_path)
            .map_err(|e| DerivationError::failed(chain, format!("child key: {}", e)))?;

        // XPriv 实现 AsRef<SigningKey>
        let signing_key: &SigningKey = derived_key.as_ref();
        let verifying_key = signing_key.verifying_key();
        let compressed = verifying_key.to_encoded_point(true);

        let address = match chain_config.address_format {
            AddressFormat::Bech32 => bitcoin_p2wpkh_address(compressed.as_bytes())
                .map_err(|e| DerivationError::failed(chain, e))?,
            AddressFormat::EthereumHex => to_checksum_address(&keccak_address(verifying_key)),
            AddressFormat::TronBase58Check => tron_address(&keccak_address(verifying_key)),
            AddressFormat::SolanaBase58 => {
                return Err(DerivationError::failed(
                    chain,
                    "unsupported address format for secp256k1",
                ))
            }
        };

        tracing::debug!(chain = %chain, path = %path.path, "derived secp256k1 address");

        Ok(DerivedAddress {
            path: path.path.clone(),
            label: path.label.clone(),
            address,
            public_key: hex::encode(compressed.as_bytes()),
        })
    }
}

/// P2WPKH (bc1q...) 地址
fn bitcoin_p2wpkh_address(compressed_pubkey: &[u8]) -> Result<String, String> {
    use bitcoin::{Address, Network, PublicKey};

    let public_key = PublicKey::from_slice(compressed_pubkey)
        .map_err(|e| format!("invalid secp256k1 public key: {}", e))?;

    let address = Address::p2wpkh(&public_key, Network::Bitcoin)
        .map_err(|e| format!("failed to create P2WPKH address: {}", e))?;

    Ok(address.to_string())
}

/// Keccak256(未压缩公钥去掉 0x04 前缀) 的后 20 字节
pub fn keccak_address(verifying_key: &VerifyingKey) -> [u8; 20] {
    let uncompressed = verifying_key.to_encoded_point(false);
    let hash = Keccak256::digest(&uncompressed.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// EIP-55 混合大小写校验和地址
/// https://eips.ethereum.org/EIPS/eip-55
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if ch.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(ch.to_ascii_uppercase());
        } else {
            checksummed.push(ch);
        }
    }
    checksummed
}

/// Tron 地址: Base58Check(0x41 || address)
pub fn tron_address(address: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(25);
    payload.push(TRON_ADDRESS_PREFIX);
    payload.extend_from_slice(address);

    let checksum = Sha256::digest(Sha256::digest(&payload));
    payload.extend_from_slice(&checksum[..4]);

    bs58::encode(payload).into_string()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Ed25519 策略 (Solana)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct Ed25519Strategy;

impl DerivationStrategy for Ed25519Strategy {
    fn derive_address(
        &self,
        seed: &[u8],
        chain_config: &ChainConfig,
        path: &LabeledPath,
    ) -> Result<DerivedAddress, DerivationError> {
        let chain = chain_config.chain;

        if chain_config.address_format != AddressFormat::SolanaBase58 {
            return Err(DerivationError::failed(
                chain,
                "unsupported address format for ed25519",
            ));
        }

        let indices = DerivationPathValidator::parse_hardened_only(&path.path)
            .map_err(|e| DerivationError::failed(chain, e))?;

        let node =
            Slip10Node::derive(seed, &indices).map_err(|e| DerivationError::failed(chain, e))?;
        let public_key = node.public_key();

        tracing::debug!(chain = %chain, path = %path.path, "derived ed25519 address");

        // Solana 地址就是公钥的 Base58 编码
        Ok(DerivedAddress {
            path: path.path.clone(),
            label: path.label.clone(),
            address: bs58::encode(public_key).into_string(),
            public_key: hex::encode(public_key),
        })
    }
}

/// SLIP-0010 ed25519 节点
pub struct Slip10Node {
    key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl Slip10Node {
    /// 主密钥: HMAC-SHA512("ed25519 seed", seed)
    pub fn master(seed: &[u8]) -> Result<Self, String> {
        let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
            .map_err(|e| format!("HMAC initialization failed: {}", e))?;
        mac.update(seed);
        Ok(Self::from_hmac(&mac.finalize().into_bytes()))
    }

    /// 硬化子密钥: HMAC-SHA512(chain_code, 0x00 || key || index)
    pub fn derive_child(&self, index: u32) -> Result<Self, String> {
        if index < HARDENED_OFFSET {
            return Err(format!("ed25519 index {} is not hardened", index));
        }

        let mut mac = HmacSha512::new_from_slice(&self.chain_code[..])
            .map_err(|e| format!("HMAC initialization failed: {}", e))?;
        mac.update(&[0x00]);
        mac.update(&self.key[..]);
        mac.update(&index.to_be_bytes());
        Ok(Self::from_hmac(&mac.finalize().into_bytes()))
    }

    pub fn derive(seed: &[u8], indices: &[u32]) -> Result<Self, String> {
        indices
            .iter()
            .try_fold(Self::master(seed)?, |node, &index| node.derive_child(index))
    }

    fn from_hmac(output: &[u8]) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&output[..32]);
        chain_code.copy_from_slice(&output[32..64]);
        Self { key, chain_code }
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn public_key(&self) -> [u8; 32] {
        ed25519_dalek::SigningKey::from_bytes(&self.key)
            .verifying_key()
            .to_bytes()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 策略工厂
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 策略工厂
pub struct DerivationStrategyFactory;

impl DerivationStrategyFactory {
    /// 根据曲线类型创建策略
    pub fn create_strategy(curve_type: CurveType) -> Box<dyn DerivationStrategy> {
        match curve_type {
            CurveType::Secp256k1 => Box::new(Secp256k1Strategy),
            CurveType::Ed25519 => Box::new(Ed25519Strategy),
        }
    }
}
