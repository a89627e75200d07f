//! criptool - BIP39 助记词与多链地址派生
//!
//! 生成、规范化、校验助记词（含 "valid halfs" 模式），
//! 并从助记词派生 Bitcoin / Ethereum / Tron / Solana 地址。

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

// 重新导出常用类型
pub use domain::{
    derive_address_report, derive_addresses, generate, generate_mnemonic, has_strong_randomness,
    is_valid_mnemonic_length, normalize, AddressReport, Chain, NormalizedMnemonic,
};
pub use error::{DerivationError, HalfSide, MnemonicError};
pub use utils::address_validator::AddressValidator;

// 统一模块导出
pub mod prelude {
    pub use crate::{
        config::Config,
        domain::{AddressDeriver, AddressReport, Chain, ChainRegistry, NormalizedMnemonic},
        error::{DerivationError, MnemonicError},
        utils::address_validator::AddressValidator,
    };
}
