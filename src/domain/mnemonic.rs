//! 助记词引擎
//!
//! BIP39 助记词的生成、规范化与校验，包括 "valid halfs" 模式：
//! 长助记词的前后两半各自也是合法助记词。
//!
//! 随机源通过 `RngCore + CryptoRng` 注入，生产环境使用操作系统 CSPRNG (`OsRng`)，
//! 测试可以传入固定种子的 `StdRng`。

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::error::{HalfSide, MnemonicError};

/// 合法的助记词词数
pub const VALID_MNEMONIC_LENGTHS: [usize; 5] = [12, 15, 18, 21, 24];

/// 规范化结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedMnemonic {
    /// 由熵重新编码得到的规范助记词
    pub phrase: String,
    pub word_count: usize,
    /// 前后两半是否各自为合法助记词（无论是否要求都会计算）
    pub halfs_valid: bool,
}

pub fn is_valid_mnemonic_length(n: usize) -> bool {
    VALID_MNEMONIC_LENGTHS.contains(&n)
}

/// NFKD、小写、去首尾空白、连续空白折叠为单个空格
pub fn canonicalize(value: &str) -> String {
    let decomposed: String = value.to_lowercase().nfkd().collect();
    decomposed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按词数把助记词切成前后两半（奇数词数时右半多一个词）
pub fn split_halfs(phrase: &str) -> (String, String) {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let (left, right) = words.split_at(words.len() / 2);
    (left.join(" "), right.join(" "))
}

/// 规范化并校验助记词
///
/// # Arguments
/// * `value` - 用户输入
/// * `required_length` - 要求的词数，0 表示不限制
/// * `require_valid_halfs` - 要求前后两半各自合法
pub fn normalize(
    value: &str,
    required_length: usize,
    require_valid_halfs: bool,
) -> Result<NormalizedMnemonic, MnemonicError> {
    // 1. 调用方给出的长度必须先合法
    if required_length > 0 && !is_valid_mnemonic_length(required_length) {
        return Err(MnemonicError::InvalidRequiredLength {
            required: required_length,
        });
    }

    // 2. 规范化
    let canonical = canonicalize(value);
    if canonical.is_empty() {
        return Err(MnemonicError::EmptyInput);
    }

    // 3. 词数
    check_word_count(canonical.split(' ').count(), required_length)?;

    // 4. 解码为熵（未知单词、校验和错误）
    let decoded = Mnemonic::parse_in_normalized(Language::English, &canonical).map_err(|e| {
        MnemonicError::InvalidChecksumOrWord {
            detail: e.to_string(),
        }
    })?;

    // 5. 熵重新编码才是权威输出
    let entropy = Zeroizing::new(decoded.to_entropy());
    let reencoded = Mnemonic::from_entropy_in(Language::English, &entropy).map_err(|e| {
        MnemonicError::InvalidChecksumOrWord {
            detail: e.to_string(),
        }
    })?;
    let phrase = reencoded.to_string();
    let word_count = reencoded.word_count();
    check_word_count(word_count, required_length)?;

    // 6. 两半各自校验
    let (left, right) = split_halfs(&phrase);
    let left = normalize(&left, 0, false);
    let right = normalize(&right, 0, false);
    let halfs_valid = left.is_ok() && right.is_ok();

    if require_valid_halfs {
        if let Err(e) = left {
            return Err(MnemonicError::InvalidHalf {
                side: HalfSide::Left,
                source: Box::new(e),
            });
        }
        if let Err(e) = right {
            return Err(MnemonicError::InvalidHalf {
                side: HalfSide::Right,
                source: Box::new(e),
            });
        }
    }

    Ok(NormalizedMnemonic {
        phrase,
        word_count,
        halfs_valid,
    })
}

fn check_word_count(found: usize, required_length: usize) -> Result<(), MnemonicError> {
    if !is_valid_mnemonic_length(found) {
        return Err(MnemonicError::InvalidWordCount { found });
    }
    if required_length > 0 && found != required_length {
        return Err(MnemonicError::WordCountMismatch {
            required: required_length,
            found,
        });
    }
    Ok(())
}

/// 操作系统是否能提供密码学安全的随机数
pub fn has_strong_randomness() -> bool {
    ensure_strong_randomness(&mut OsRng).is_ok()
}

fn ensure_strong_randomness<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(), MnemonicError> {
    let mut sample = Zeroizing::new([0u8; 32]);
    rng.try_fill_bytes(&mut sample[..])
        .map_err(|e| MnemonicError::WeakRandomSource {
            detail: e.to_string(),
        })
}

/// 使用操作系统 CSPRNG 生成助记词
pub fn generate_mnemonic(
    num_words: usize,
    require_valid_halfs: bool,
) -> Result<String, MnemonicError> {
    generate(&mut OsRng, num_words, require_valid_halfs)
}

/// 生成助记词
///
/// `require_valid_halfs` 时做拒绝采样：反复生成两个半长助记词并拼接，
/// 直到拼接结果整体通过校验和（24 词约 1/256 的概率），不设重试上限。
pub fn generate<R: RngCore + CryptoRng>(
    rng: &mut R,
    num_words: usize,
    require_valid_halfs: bool,
) -> Result<String, MnemonicError> {
    if !is_valid_mnemonic_length(num_words) {
        return Err(MnemonicError::InvalidWordCount { found: num_words });
    }

    ensure_strong_randomness(rng)?;

    if !require_valid_halfs {
        return random_mnemonic(rng, num_words);
    }

    let half = num_words / 2;
    if num_words % 2 != 0 || !is_valid_mnemonic_length(half) {
        return Err(MnemonicError::InvalidHalfWordCount {
            requested: num_words,
            half,
        });
    }

    let mut attempts: u64 = 0;
    loop {
        attempts += 1;
        let left = random_mnemonic(rng, half)?;
        let right = random_mnemonic(rng, half)?;

        match normalize(&format!("{} {}", left, right), 0, false) {
            Ok(normalized) => {
                tracing::debug!(num_words, attempts, "generated mnemonic with valid halfs");
                return Ok(normalized.phrase);
            }
            Err(e) => {
                tracing::trace!(attempts, error = %e, "concatenated halfs rejected");
            }
        }
    }
}

/// 熵长度 = num_words * 32 / 3 位
fn random_mnemonic<R: RngCore + CryptoRng>(
    rng: &mut R,
    num_words: usize,
) -> Result<String, MnemonicError> {
    let mut entropy = Zeroizing::new(vec![0u8; num_words * 4 / 3]);
    rng.try_fill_bytes(&mut entropy[..])
        .map_err(|e| MnemonicError::WeakRandomSource {
            detail: e.to_string(),
        })?;

    Mnemonic::from_entropy_in(Language::English, &entropy)
        .map(|m| m.to_string())
        .map_err(|e| MnemonicError::InvalidChecksumOrWord {
            detail: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const ZERO_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    /// 总是失败的随机源
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            unreachable!("only try_fill_bytes is used")
        }
        fn next_u64(&mut self) -> u64 {
            unreachable!("only try_fill_bytes is used")
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            unreachable!("only try_fill_bytes is used")
        }
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "entropy source unavailable",
            )))
        }
    }

    impl CryptoRng for BrokenRng {}

    #[test]
    fn test_valid_lengths() {
        for n in VALID_MNEMONIC_LENGTHS {
            assert!(is_valid_mnemonic_length(n));
        }
        for n in [0, 6, 9, 11, 13, 25, 48] {
            assert!(!is_valid_mnemonic_length(n));
        }
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("  Abandon \t\n ABOUT  "), "abandon about");
        // 全角空格在 NFKD 下变为普通空格
        assert_eq!(canonicalize("zoo\u{3000}wrong"), "zoo wrong");
    }

    #[test]
    fn test_normalize_messy_input() {
        let messy = format!("  {}  ", ZERO_12.replace(' ', "   ").to_uppercase());
        let normalized = normalize(&messy, 0, false).unwrap();
        assert_eq!(normalized.phrase, ZERO_12);
        assert_eq!(normalized.word_count, 12);
        // 6 词不是合法长度
        assert!(!normalized.halfs_valid);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize("", 0, false), Err(MnemonicError::EmptyInput));
        assert_eq!(normalize(" \t\n", 0, false), Err(MnemonicError::EmptyInput));
    }

    #[test]
    fn test_invalid_required_length_checked_first() {
        assert_eq!(
            normalize("", 13, false),
            Err(MnemonicError::InvalidRequiredLength { required: 13 })
        );
    }

    #[test]
    fn test_unknown_word() {
        let phrase = ZERO_12.replace("about", "bitcoinz");
        match normalize(&phrase, 0, false) {
            Err(MnemonicError::InvalidChecksumOrWord { detail }) => assert!(!detail.is_empty()),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_half_is_tagged() {
        let err = normalize(ZERO_12, 0, true).unwrap_err();
        assert!(matches!(
            err,
            MnemonicError::InvalidHalf {
                side: HalfSide::Left,
                ..
            }
        ));
    }

    #[test]
    fn test_split_halfs() {
        let (left, right) = split_halfs("a b c d e");
        assert_eq!(left, "a b");
        assert_eq!(right, "c d e");
    }

    #[test]
    fn test_generate_lengths() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in VALID_MNEMONIC_LENGTHS {
            let phrase = generate(&mut rng, n, false).unwrap();
            let normalized = normalize(&phrase, n, false).unwrap();
            assert_eq!(normalized.phrase, phrase);
        }
    }

    #[test]
    fn test_generate_rejects_invalid_word_count() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            generate(&mut rng, 13, false),
            Err(MnemonicError::InvalidWordCount { found: 13 })
        );
    }

    #[test]
    fn test_generate_valid_halfs() {
        let mut rng = StdRng::seed_from_u64(42);
        let phrase = generate(&mut rng, 24, true).unwrap();
        let normalized = normalize(&phrase, 24, true).unwrap();
        assert!(normalized.halfs_valid);
    }

    #[test]
    fn test_generate_is_deterministic_for_seeded_rng() {
        let a = generate(&mut StdRng::seed_from_u64(3), 24, true).unwrap();
        let b = generate(&mut StdRng::seed_from_u64(3), 24, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_invalid_half_word_count() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in [12, 15, 18, 21] {
            assert!(matches!(
                generate(&mut rng, n, true),
                Err(MnemonicError::InvalidHalfWordCount { requested, .. }) if requested == n
            ));
        }
    }

    #[test]
    fn test_weak_random_source() {
        assert!(matches!(
            generate(&mut BrokenRng, 12, false),
            Err(MnemonicError::WeakRandomSource { .. })
        ));
        // 词数检查先于随机源检查
        assert_eq!(
            generate(&mut BrokenRng, 13, false),
            Err(MnemonicError::InvalidWordCount { found: 13 })
        );
    }

    #[test]
    fn test_os_randomness_available() {
        assert!(has_strong_randomness());
        assert_eq!(generate_mnemonic(15, false).unwrap().split(' ').count(), 15);
    }
}
