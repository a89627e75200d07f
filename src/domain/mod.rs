//! Domain 模块
//!
//! 助记词引擎与多链地址派生的核心逻辑，不做任何 I/O

pub mod address_deriver;
pub mod chain_config;
pub mod derivation;
pub mod derivation_path_validator;
pub mod mnemonic;

// 重新导出常用类型
pub use address_deriver::{
    derive_address_report, derive_addresses, AddressDeriver, AddressReport, ChainAddresses,
};
pub use chain_config::{
    AddressFormat, Chain, ChainConfig, ChainRegistry, CurveType, DerivationStandard, LabeledPath,
};
pub use derivation::{DerivationStrategy, DerivationStrategyFactory, DerivedAddress};
pub use derivation_path_validator::DerivationPathValidator;
pub use mnemonic::{
    generate, generate_mnemonic, has_strong_randomness, is_valid_mnemonic_length, normalize,
    NormalizedMnemonic, VALID_MNEMONIC_LENGTHS,
};
