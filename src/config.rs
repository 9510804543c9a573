//! flash 検索の設定
//!
//! JSON 形式の設定ファイルを読み込む。未指定の項目は既定値で補う。

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// ホームポジション優先のラベル文字
pub const DEFAULT_LABELS: &str = "asdfghjklqwertyuiopzxcvbnm";

/// 設定ファイルパスを上書きする環境変数
pub const CONFIG_ENV_VAR: &str = "ALTRE_FLASH_CONFIG";

/// 大文字小文字の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
    /// 検索文字列に大文字が含まれる場合のみ区別する
    Smart,
}

impl CaseSensitivity {
    /// パターンに対して大文字小文字を区別するか判定
    pub fn is_sensitive_for(self, pattern: &str) -> bool {
        match self {
            CaseSensitivity::Sensitive => true,
            CaseSensitivity::Insensitive => false,
            CaseSensitivity::Smart => pattern.chars().any(|c| c.is_uppercase()),
        }
    }
}

/// flash 設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FlashConfig {
    /// 機能の有効化
    pub enable: bool,
    /// ラベルに使う文字（優先順）
    pub labels: String,
    pub case_sensitivity: CaseSensitivity,
    /// 確定時、カーソル以降にマッチがなければ先頭へ折り返す
    pub wrap: bool,
    /// 1回のスキャンで収集するマッチ数の上限
    pub max_matches: usize,
    /// ラベル不足時に2文字ラベルを使う
    pub hierarchical_labels: bool,
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            enable: true,
            labels: DEFAULT_LABELS.to_string(),
            case_sensitivity: CaseSensitivity::Smart,
            wrap: true,
            max_matches: 1000,
            hierarchical_labels: false,
        }
    }
}

impl FlashConfig {
    /// JSON 文字列から読み込む
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FlashConfig =
            serde_json::from_str(json).map_err(|err| ConfigError::InvalidFile {
                path: "<inline>".to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 指定パスから読み込む
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: FlashConfig =
            serde_json::from_str(&content).map_err(|err| ConfigError::InvalidFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        config.validate()?;
        log::debug!("loaded flash config from {}", path.display());
        Ok(config)
    }

    /// 既定の場所から読み込む。ファイルがなければ既定値を返す。
    pub fn load() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// ラベルに使う文字の一覧
    pub fn label_chars(&self) -> Vec<char> {
        self.labels.chars().collect()
    }

    /// 設定値を検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.is_empty() {
            return Err(invalid("labels", &self.labels));
        }

        let mut seen = HashSet::new();
        for ch in self.labels.chars() {
            if ch.is_whitespace() || ch.is_control() || !seen.insert(ch) {
                return Err(invalid("labels", &self.labels));
            }
        }

        if self.max_matches == 0 {
            return Err(invalid("max-matches", "0"));
        }

        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// 設定ファイルの既定パス（環境変数があればそちらを優先）
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let expanded = shellexpand::tilde(&raw);
        return Some(PathBuf::from(expanded.as_ref()));
    }
    dirs::config_dir().map(|dir| dir.join("altre").join("flash.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_uses_defaults() {
        let config = FlashConfig::from_json_str(r#"{ "labels": "asd", "wrap": false }"#).unwrap();
        assert_eq!(config.labels, "asd");
        assert!(!config.wrap);
        assert!(config.enable);
        assert_eq!(config.case_sensitivity, CaseSensitivity::Smart);
    }

    #[test]
    fn kebab_case_keys_are_accepted() {
        let config = FlashConfig::from_json_str(
            r#"{ "case-sensitivity": "insensitive", "hierarchical-labels": true }"#,
        )
        .unwrap();
        assert_eq!(config.case_sensitivity, CaseSensitivity::Insensitive);
        assert!(config.hierarchical_labels);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = FlashConfig::from_json_str(r#"{ "labels": "aba" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "labels"));
    }

    #[test]
    fn whitespace_labels_are_rejected() {
        assert!(FlashConfig::from_json_str(r#"{ "labels": "a b" }"#).is_err());
        assert!(FlashConfig::from_json_str(r#"{ "labels": "" }"#).is_err());
    }

    #[test]
    fn zero_max_matches_is_rejected() {
        assert!(FlashConfig::from_json_str(r#"{ "max-matches": 0 }"#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "labels": "jkl", "max-matches": 10 }}"#).unwrap();

        let config = FlashConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.label_chars(), vec!['j', 'k', 'l']);
        assert_eq!(config.max_matches, 10);
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        match FlashConfig::load_from_path(file.path()) {
            Err(ConfigError::InvalidFile { path, .. }) => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn smart_case_follows_pattern() {
        assert!(!CaseSensitivity::Smart.is_sensitive_for("foo"));
        assert!(CaseSensitivity::Smart.is_sensitive_for("Foo"));
        assert!(CaseSensitivity::Sensitive.is_sensitive_for("foo"));
        assert!(!CaseSensitivity::Insensitive.is_sensitive_for("FOO"));
    }
}
