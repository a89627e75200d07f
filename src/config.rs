//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::mnemonic::is_valid_mnemonic_length;

/// 默认助记词长度
pub const DEFAULT_WORD_COUNT: usize = 15;

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: [&str; 2] = ["text", "json"];

/// 应用配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mnemonic: MnemonicConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// [`Config::load`] 的结果
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// 指定了但不存在的配置文件
    pub missing_file: Option<PathBuf>,
}

/// 助记词生成默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MnemonicConfig {
    pub word_count: usize,
    pub valid_halfs: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: String, // "json" or "text"
}

impl Default for MnemonicConfig {
    fn default() -> Self {
        Self {
            word_count: std::env::var("CRIPTOOL_WORD_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_WORD_COUNT),
            valid_halfs: std::env::var("CRIPTOOL_VALID_HALFS")
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: std::env::var("CRIPTOOL_OUTPUT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl OutputConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            mnemonic: MnemonicConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        Self::load(path).map(|loaded| loaded.config)
    }

    /// 同 [`Config::from_env_and_file`]，并返回未找到的配置文件路径。
    /// 加载发生在日志初始化之前，由调用方在日志就绪后再提示。
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<LoadedConfig> {
        let mut loaded = LoadedConfig {
            config: Self::from_env()?,
            missing_file: None,
        };

        if let Some(path) = path {
            if path.as_ref().exists() {
                loaded.config = Self::from_file(path)?;
            } else {
                loaded.missing_file = Some(path.as_ref().to_path_buf());
            }
        }

        Ok(loaded)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let words = self.mnemonic.word_count;
        if !is_valid_mnemonic_length(words) {
            anyhow::bail!(
                "CRIPTOOL_WORD_COUNT must be one of 12, 15, 18, 21, 24 (got {})",
                words
            );
        }

        // 拆半模式要求半长也是合法长度
        if self.mnemonic.valid_halfs && (words % 2 != 0 || !is_valid_mnemonic_length(words / 2)) {
            anyhow::bail!(
                "CRIPTOOL_VALID_HALFS requires a word count whose half is a valid length (got {})",
                words
            );
        }

        if !VALID_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", VALID_LEVELS);
        }

        if !VALID_FORMATS.contains(&self.logging.format.to_lowercase().as_str()) {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        if !VALID_FORMATS.contains(&self.output.format.to_lowercase().as_str()) {
            anyhow::bail!("CRIPTOOL_OUTPUT must be 'json' or 'text'");
        }

        Ok(())
    }
}
