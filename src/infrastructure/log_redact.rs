//! 日志脱敏
//! 助记词不进入日志，地址只显示首尾

use serde::Serialize;

use crate::domain::derivation::DerivedAddress;
use crate::domain::mnemonic::NormalizedMnemonic;

/// 可脱敏trait
pub trait SensitiveRedact {
    fn redact(&self) -> String;
}

/// 脱敏地址（显示前6位和后4位）
pub fn redact_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < 10 {
        return "*".repeat(chars.len());
    }

    let prefix: String = chars[..6].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

/// 助记词只保留词数
pub fn redact_mnemonic(phrase: &str) -> String {
    format!("<{} words redacted>", phrase.split_whitespace().count())
}

#[derive(Debug, Serialize)]
struct RedactedMnemonic {
    phrase: String,
    word_count: usize,
    halfs_valid: bool,
}

impl SensitiveRedact for NormalizedMnemonic {
    fn redact(&self) -> String {
        serde_json::to_string(&RedactedMnemonic {
            phrase: redact_mnemonic(&self.phrase),
            word_count: self.word_count,
            halfs_valid: self.halfs_valid,
        })
        .unwrap_or_else(|_| "{ redacted }".to_string())
    }
}

impl SensitiveRedact for DerivedAddress {
    fn redact(&self) -> String {
        format!("{} {}", self.path, redact_address(&self.address))
    }
}
