//! TUI 用の文書とホスト実装

use std::collections::BTreeMap;

use crate::error::FlashError;
use crate::flash::{FlashHost, Mode, RenderMarker};
use crate::search::VisibleText;

/// 入力待ちのオペレーター
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// 開始位置からの削除
    Delete { origin: usize },
}

/// 表示中の文書
#[derive(Debug, Clone)]
pub struct DocumentHost {
    chars: Vec<char>,
    line_starts: Vec<usize>,
    cursor: usize,
    cursors: Vec<usize>,
    mode: Mode,
    pub(crate) operator: Option<Operator>,
    scroll: usize,
    height: usize,
    markers: BTreeMap<usize, RenderMarker>,
    message: Option<String>,
}

impl DocumentHost {
    pub fn new(text: &str) -> Self {
        let mut host = Self {
            chars: text.chars().collect(),
            line_starts: Vec::new(),
            cursor: 0,
            cursors: Vec::new(),
            mode: Mode::Normal,
            operator: None,
            scroll: 0,
            height: 24,
            markers: BTreeMap::new(),
            message: None,
        };
        host.rebuild_lines();
        host
    }

    fn rebuild_lines(&mut self) {
        self.line_starts = std::iter::once(0)
            .chain(
                self.chars
                    .iter()
                    .enumerate()
                    .filter(|(_, ch)| **ch == '\n')
                    .map(|(index, _)| index + 1),
            )
            .collect();
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 改行を含まない行の文字範囲
    pub fn line_range(&self, line: usize) -> std::ops::Range<usize> {
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.chars.len());
        start..end
    }

    pub fn char_at(&self, position: usize) -> Option<char> {
        self.chars.get(position).copied()
    }

    pub fn line_of(&self, position: usize) -> usize {
        match self.line_starts.binary_search(&position) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn cursors(&self) -> &[usize] {
        &self.cursors
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// 位置にあるラベル付きマーカー
    pub fn marker_at(&self, position: usize) -> Option<&RenderMarker> {
        self.markers.get(&position)
    }

    /// 位置が表示中のマッチ範囲に含まれるか
    pub fn in_match(&self, position: usize) -> bool {
        self.markers
            .range(..=position)
            .next_back()
            .is_some_and(|(_, m)| position < m.range.end)
    }

    /// 表示行数を更新し、カーソルが見える位置までスクロール
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.ensure_cursor_visible();
    }

    fn ensure_cursor_visible(&mut self) {
        let line = self.line_of(self.cursor);
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + self.height {
            self.scroll = line + 1 - self.height;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > self.line_range(self.line_of(self.cursor)).start {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.line_range(self.line_of(self.cursor)).end {
            self.cursor += 1;
        }
    }

    /// 行移動（列は行末で切り詰める）
    pub fn move_line(&mut self, down: bool) {
        let line = self.line_of(self.cursor);
        let column = self.cursor - self.line_starts[line];
        let target = if down {
            (line + 1).min(self.line_count() - 1)
        } else {
            line.saturating_sub(1)
        };
        let range = self.line_range(target);
        self.cursor = (range.start + column).min(range.end);
        self.ensure_cursor_visible();
    }

    /// 範囲を削除してカーソルを先頭へ置く
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let start = start.min(self.chars.len());
        let end = end.min(self.chars.len());
        if start >= end {
            return;
        }
        self.chars.drain(start..end);
        self.rebuild_lines();
        self.cursor = start;
        self.markers.clear();
        self.ensure_cursor_visible();
    }
}

impl FlashHost for DocumentHost {
    fn visible_text(&self) -> VisibleText {
        let first = self.scroll.min(self.line_count() - 1);
        let last = (first + self.height).min(self.line_count()) - 1;
        let start = self.line_starts[first];
        let end = self.line_range(last).end;
        let text: String = self.chars[start..end].iter().collect();
        VisibleText::new(start, first, &text)
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.chars.len());
        self.ensure_cursor_visible();
    }

    fn set_cursor_set(&mut self, positions: &[usize]) {
        self.cursors = positions.to_vec();
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn has_pending_operator(&self) -> bool {
        self.operator.is_some()
    }

    fn is_multi_cursor(&self) -> bool {
        self.cursors.len() > 1
    }

    fn render_markers(&mut self, markers: &[RenderMarker]) {
        for marker in markers {
            if marker.visible {
                self.markers.insert(marker.position, marker.clone());
            } else {
                self.markers.remove(&marker.position);
            }
        }
    }

    fn report_error(&mut self, error: &FlashError) {
        self.message = Some(error.display_message());
    }
}
