pub mod address_validator;
pub mod chain_normalizer;
