//! altre-flash - ラベル付きジャンプ検索
//!
//! 入力した文字で表示中のマッチを絞り込み、ラベルのキーで移動する

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// 検索
pub mod flash;
pub mod search;

// 表示層
pub mod frontend;

// 公開API
pub use config::FlashConfig;
pub use error::{FlashError, Result};
pub use flash::{FlashEngine, FlashHost, Keystroke, Mode, Transition};
pub use frontend::TuiApplication;
