//! flash 検索セッション

use super::cache::MarkerCache;
use super::host::Mode;
use super::marker::{MarkerSet, RenderMarker};
use super::selection::SelectedPositions;

/// 1回の flash 検索の状態
///
/// 開始時に作られ、確定・取り消し・複数選択の確定で破棄される。
#[derive(Debug, Clone)]
pub struct FlashSession {
    /// 入力中の検索文字列
    pub search_string: String,
    /// 開始時点での前回の検索文字列
    pub previous_search_string: String,
    /// 終了時に戻すモード
    pub prior_mode: Mode,
    /// 最初のスキャンを起こした文字
    pub first_character: Option<char>,
    pub multi_select: bool,
    pub selected: SelectedPositions,
    /// 2文字ラベルの入力途中
    pub label_input: String,
    pub cache: MarkerCache,
    /// 直前にホストへ渡した描画指示
    pub(crate) last_render: Vec<RenderMarker>,
}

impl FlashSession {
    pub fn new(prior_mode: Mode, previous_search_string: &str, multi_select: bool) -> Self {
        Self {
            search_string: String::new(),
            previous_search_string: previous_search_string.to_string(),
            prior_mode,
            first_character: None,
            multi_select,
            selected: SelectedPositions::new(),
            label_input: String::new(),
            cache: MarkerCache::new(),
            last_render: Vec::new(),
        }
    }

    /// 現在の検索文字列に対応するマーカー集合
    pub fn current_markers(&self) -> Option<&MarkerSet> {
        self.cache.get(&self.search_string)
    }

    pub fn search_len(&self) -> usize {
        self.search_string.chars().count()
    }

    /// 最後の1文字を除いた検索文字列
    pub fn parent_prefix(&self) -> &str {
        match self.search_string.char_indices().last() {
            Some((index, _)) => &self.search_string[..index],
            None => "",
        }
    }

    /// ホストに表示中の描画指示
    pub fn rendered(&self) -> &[RenderMarker] {
        &self.last_render
    }
}
