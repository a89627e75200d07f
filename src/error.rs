//! 错误类型
//!
//! 助记词引擎与地址派生器各自的错误枚举。所有错误都是值，消息可直接展示给终端用户。

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::chain_config::Chain;

/// 拆半校验时的半边标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfSide {
    Left,
    Right,
}

impl fmt::Display for HalfSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalfSide::Left => f.write_str("left"),
            HalfSide::Right => f.write_str("right"),
        }
    }
}

/// 助记词引擎错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    /// 输入为空或只含空白
    #[error("mnemonic is empty")]
    EmptyInput,

    /// 规范化后的词数不在 {12,15,18,21,24}
    #[error("invalid mnemonic length: {found} words (expected 12, 15, 18, 21 or 24)")]
    InvalidWordCount { found: usize },

    /// 调用方要求的长度本身不合法
    #[error("invalid required length: {required} (expected 12, 15, 18, 21 or 24)")]
    InvalidRequiredLength { required: usize },

    #[error("mnemonic length mismatch: required {required} words, found {found}")]
    WordCountMismatch { required: usize, found: usize },

    /// 未知单词或校验和错误，携带底层解码信息
    #[error("invalid mnemonic ({detail})")]
    InvalidChecksumOrWord { detail: String },

    #[error("invalid {side} half: {source}")]
    InvalidHalf {
        side: HalfSide,
        #[source]
        source: Box<MnemonicError>,
    },

    /// 运行环境无法提供密码学安全的随机数
    #[error("no cryptographically strong random source available: {detail}")]
    WeakRandomSource { detail: String },

    #[error("cannot split {requested} words into valid halfs ({half} is not a valid mnemonic length)")]
    InvalidHalfWordCount { requested: usize, half: usize },
}

/// 地址派生错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DerivationError {
    #[error("invalid mnemonic ({detail})")]
    InvalidMnemonic { detail: String },

    /// 单条链派生失败，整个调用失败，不返回部分结果
    #[error("{chain} derivation failed: {reason}")]
    DerivationFailed { chain: Chain, reason: String },
}

impl DerivationError {
    pub fn failed(chain: Chain, reason: impl fmt::Display) -> Self {
        Self::DerivationFailed {
            chain,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_detail() {
        let err = MnemonicError::WordCountMismatch {
            required: 12,
            found: 15,
        };
        assert_eq!(
            err.to_string(),
            "mnemonic length mismatch: required 12 words, found 15"
        );

        let err = MnemonicError::InvalidHalf {
            side: HalfSide::Right,
            source: Box::new(MnemonicError::InvalidWordCount { found: 9 }),
        };
        assert!(err.to_string().starts_with("invalid right half: "));
        assert!(err.to_string().contains("9 words"));

        let err = DerivationError::failed(Chain::Tron, "bad key");
        assert_eq!(err.to_string(), "Tron derivation failed: bad key");
    }
}
