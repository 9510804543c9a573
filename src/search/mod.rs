//! 検索モジュール
//!
//! 表示テキストに対するリテラル検索を提供

pub mod matcher;
pub mod types;

pub use matcher::{LiteralMatcher, StringMatcher};
pub use types::{SearchMatch, VisibleText};
