//! フロントエンド実装

pub mod tui;

pub use tui::TuiApplication;
