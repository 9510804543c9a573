//! エラーハンドリングシステム
//!
//! flash 検索全体で使用されるエラー型と、ユーザー表示用の分類を定義する。
//! いずれのエラーも現在のキー操作に対する終端結果であり、制御フローには使わない。

use thiserror::Error;

/// flash 検索のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlashError {
    /// 検索文字列も前回の検索文字列も空のまま確定された
    #[error("No previous search string")]
    NoLastSearch,

    /// スキャン結果が0件
    #[error("Pattern not found: {pattern}")]
    NoMatches { pattern: String },

    /// ラベル文字が足りずにラベルなしのマッチが残った
    #[error("Label alphabet exhausted: {matches} matches, {labels} labels")]
    LabelAlphabetExhausted { matches: usize, labels: usize },

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file: {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Info,
    Warning,
    Error,
}

impl FlashError {
    /// 表示レベルを取得
    pub fn level(&self) -> ErrorLevel {
        match self {
            FlashError::NoMatches { .. } => ErrorLevel::Info,
            FlashError::LabelAlphabetExhausted { .. } => ErrorLevel::Warning,
            FlashError::NoLastSearch | FlashError::Config(_) => ErrorLevel::Error,
        }
    }

    /// ステータス表示用メッセージ
    pub fn display_message(&self) -> String {
        match self {
            FlashError::NoLastSearch => "前回の検索文字列がありません".to_string(),
            FlashError::NoMatches { pattern } => format!("{} は見つかりません", pattern),
            FlashError::LabelAlphabetExhausted { matches, labels } => format!(
                "ラベルが不足しています: {} 件中 {} 件のみラベル付け",
                matches, labels
            ),
            FlashError::Config(err) => format!("設定エラー: {}", err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io {
            message: error.to_string(),
        }
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, FlashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_last_search_is_an_error_level_message() {
        let error = FlashError::NoLastSearch;
        assert_eq!(error.level(), ErrorLevel::Error);
        assert!(error.display_message().contains("前回の検索文字列"));
    }

    #[test]
    fn no_matches_is_informational() {
        let error = FlashError::NoMatches {
            pattern: "xyz".to_string(),
        };
        assert_eq!(error.level(), ErrorLevel::Info);
        assert!(error.display_message().starts_with("xyz"));
    }

    #[test]
    fn config_error_converts_into_flash_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: FlashError = ConfigError::from(io).into();
        match error {
            FlashError::Config(ConfigError::Io { message }) => assert!(message.contains("missing")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
