//! flash: ラベル付きジャンプ検索
//!
//! 文字を入力するたびに表示中のマッチを絞り込み、各マッチに短いラベルを
//! 付ける。ラベルのキーを押すとその位置へ移動する（複数選択モードでは
//! カーソル集合への追加・削除になる）。

pub mod cache;
pub mod controller;
pub mod engine;
pub mod host;
pub mod keystroke;
pub mod label;
pub mod marker;
pub mod selection;
pub mod session;

pub use cache::MarkerCache;
pub use controller::{ExitReason, FlashController, StepEvent, Transition};
pub use engine::FlashEngine;
pub use host::{FlashHost, Mode};
pub use keystroke::Keystroke;
pub use label::{ExcludedChars, LabelAllocator};
pub use marker::{HighlightState, LabelContext, Marker, MarkerSet, MarkerStore, RenderMarker};
pub use selection::{SelectedPositions, SelectionModeAdapter};
pub use session::FlashSession;
