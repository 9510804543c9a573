//! マーカー管理
//!
//! マッチ1件につき1つのマーカーを持ち、ラベル・表示状態・ハイライトを管理する。
//! 描画は行わず、ホストへ渡す [`RenderMarker`] の一覧だけを作る。

use crate::search::{matcher::chars_equal, SearchMatch, VisibleText};

use super::label::{ExcludedChars, LabelAllocator};
use super::selection::SelectedPositions;

/// マーカーのハイライト状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightState {
    #[default]
    Default,
    /// 確定キーで移動する先
    NextMatch,
    /// 複数カーソル選択に含まれている
    Chosen,
}

/// 1件のマッチに対応するマーカー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub match_range: SearchMatch,
    pub label: Option<String>,
    pub jump_position: usize,
    pub operator_position: usize,
    pub visible: bool,
    pub highlight: HighlightState,
}

impl Marker {
    pub fn new(match_range: SearchMatch, cursor: usize) -> Self {
        let mut marker = Self {
            match_range,
            label: None,
            jump_position: match_range.start,
            operator_position: match_range.start,
            visible: true,
            highlight: HighlightState::Default,
        };
        marker.set_range(match_range, cursor);
        marker
    }

    /// マッチ範囲を更新し、移動先を計算し直す
    ///
    /// オペレーター待機中の移動先は、カーソル以降のマッチなら終端、
    /// カーソルより前なら先頭。
    pub fn set_range(&mut self, match_range: SearchMatch, cursor: usize) {
        self.match_range = match_range;
        self.jump_position = match_range.start;
        self.operator_position = if match_range.start >= cursor {
            match_range.end
        } else {
            match_range.start
        };
    }

    /// 確定したときの移動先
    pub fn resolve_position(&self, operator_pending: bool) -> usize {
        if operator_pending {
            self.operator_position
        } else {
            self.jump_position
        }
    }

    fn hide(&mut self) {
        self.visible = false;
        self.label = None;
        self.highlight = HighlightState::Default;
    }

    pub fn to_render(&self) -> RenderMarker {
        RenderMarker {
            position: self.jump_position,
            range: self.match_range,
            label: self.label.clone(),
            highlight: self.highlight,
            visible: self.visible,
        }
    }
}

/// ビュー層へ渡す描画指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderMarker {
    pub position: usize,
    pub range: SearchMatch,
    pub label: Option<String>,
    pub highlight: HighlightState,
    pub visible: bool,
}

impl RenderMarker {
    /// 非表示指示に変換
    pub fn hidden(&self) -> Self {
        Self {
            label: None,
            highlight: HighlightState::Default,
            visible: false,
            ..self.clone()
        }
    }
}

/// 1つの検索文字列に対するマーカー集合（文書順）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    capped: bool,
}

impl MarkerSet {
    /// スキャンが上限で打ち切られた集合か
    ///
    /// 打ち切られた集合から絞り込むと上限より後ろのマッチを取りこぼす。
    pub fn is_capped(&self) -> bool {
        self.capped
    }

    pub fn set_capped(&mut self, capped: bool) {
        self.capped = capped;
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    /// ラベルなしで表示されているマーカー数
    pub fn unlabeled_count(&self) -> usize {
        self.visible().filter(|m| m.label.is_none()).count()
    }

    /// 表示中マーカーからラベルで検索
    pub fn get_by_label(&self, label: &str) -> Option<&Marker> {
        self.visible().find(|m| m.label.as_deref() == Some(label))
    }

    /// 表示中のラベルに、指定文字列で始まるより長いものがあるか
    pub fn has_label_prefix(&self, prefix: &str) -> bool {
        self.visible().any(|m| {
            m.label
                .as_deref()
                .is_some_and(|label| label.len() > prefix.len() && label.starts_with(prefix))
        })
    }

    /// 条件に合わないマーカーを非表示にする
    pub fn set_visibility(&mut self, predicate: impl Fn(&Marker) -> bool) {
        for marker in &mut self.markers {
            if marker.visible && !predicate(marker) {
                marker.hide();
            }
        }
    }

    /// 確定キーの移動先
    ///
    /// カーソル位置以降で最初の表示中マーカー。見つからず `wrap` が有効なら
    /// 文書順で最初の表示中マーカー。
    pub fn next_match(&self, cursor: usize, wrap: bool) -> Option<&Marker> {
        self.visible()
            .find(|m| m.jump_position >= cursor)
            .or_else(|| if wrap { self.visible().next() } else { None })
    }

    /// 選択状態と次の移動先に合わせてハイライトを更新
    pub fn refresh_highlights(
        &mut self,
        selected: &SelectedPositions,
        operator_pending: bool,
        cursor: usize,
        wrap: bool,
    ) {
        let next = self.next_match(cursor, wrap).map(|m| m.jump_position);
        for marker in &mut self.markers {
            marker.highlight = if !marker.visible {
                HighlightState::Default
            } else if selected.contains(marker.resolve_position(operator_pending)) {
                HighlightState::Chosen
            } else if Some(marker.jump_position) == next {
                HighlightState::NextMatch
            } else {
                HighlightState::Default
            };
        }
    }

    /// 全マーカーの描画指示
    pub fn render_list(&self) -> Vec<RenderMarker> {
        self.markers.iter().map(Marker::to_render).collect()
    }

    fn matches(&self) -> Vec<SearchMatch> {
        self.visible().map(|m| m.match_range).collect()
    }
}

/// ラベル計算に必要な周辺情報
#[derive(Debug, Clone, Copy)]
pub struct LabelContext<'a> {
    pub visible_text: &'a VisibleText,
    pub cursor: usize,
    pub first_character: Option<char>,
    pub case_sensitive: bool,
}

impl LabelContext<'_> {
    /// 現在のマーカー集合に対する除外文字
    ///
    /// セッション最初の文字と、表示中マッチの直後の文字（検索の続きとして
    /// 入力されうる文字）を除外する。
    pub fn excluded_chars(&self, set: &MarkerSet) -> ExcludedChars {
        let mut excluded = ExcludedChars::new();
        if let Some(first) = self.first_character {
            excluded.insert(first, self.case_sensitive);
        }
        for marker in set.visible() {
            if let Some(next) = self.visible_text.next_char_after(&marker.match_range) {
                excluded.insert(next, self.case_sensitive);
            }
        }
        excluded
    }
}

/// マーカー集合に対する操作
#[derive(Debug, Clone)]
pub struct MarkerStore {
    allocator: LabelAllocator,
}

impl MarkerStore {
    pub fn new(allocator: LabelAllocator) -> Self {
        Self { allocator }
    }

    pub fn allocator(&self) -> &LabelAllocator {
        &self.allocator
    }

    /// スキャン結果からマーカー集合を作成
    pub fn create(&self, matches: Vec<SearchMatch>, ctx: &LabelContext<'_>) -> MarkerSet {
        let mut set = MarkerSet {
            markers: matches
                .into_iter()
                .map(|m| Marker::new(m, ctx.cursor))
                .collect(),
            capped: false,
        };
        let excluded = ctx.excluded_chars(&set);
        let labels = self
            .allocator
            .assign_labels(&set.matches(), &excluded, ctx.cursor);
        apply_labels(&mut set, labels);
        set
    }

    /// 1文字追加された検索文字列へ絞り込む
    ///
    /// 続きが `appended` で始まるマーカーだけを残して範囲を1文字伸ばし、
    /// 他は非表示にする。残ったマーカーにはラベルを割り当て直す。
    pub fn narrow(&self, prior: &MarkerSet, appended: char, ctx: &LabelContext<'_>) -> MarkerSet {
        let mut set = prior.clone();
        set.set_visibility(|marker| {
            ctx.visible_text
                .next_char_after(&marker.match_range)
                .is_some_and(|next| chars_equal(next, appended, ctx.case_sensitive))
        });
        for marker in set.markers.iter_mut().filter(|m| m.visible) {
            marker.set_range(marker.match_range.extended(), ctx.cursor);
        }
        self.relabel(&mut set, ctx);
        set
    }

    /// キャッシュ済みの集合を再表示する
    pub fn restore(&self, cached: &MarkerSet, ctx: &LabelContext<'_>) -> MarkerSet {
        let mut set = cached.clone();
        for marker in set.markers.iter_mut().filter(|m| m.visible) {
            marker.set_range(marker.match_range, ctx.cursor);
        }
        self.relabel(&mut set, ctx);
        set
    }

    /// 表示中マーカーのラベルを割り当て直す
    pub fn relabel(&self, set: &mut MarkerSet, ctx: &LabelContext<'_>) {
        let excluded = ctx.excluded_chars(set);
        let previous: Vec<Option<String>> = set.visible().map(|m| m.label.clone()).collect();
        let labels = self
            .allocator
            .relabel(&set.matches(), &previous, &excluded, ctx.cursor);
        apply_labels(set, labels);
    }
}

fn apply_labels(set: &mut MarkerSet, labels: Vec<Option<String>>) {
    for (marker, label) in set.markers.iter_mut().filter(|m| m.visible).zip(labels) {
        marker.label = label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{LiteralMatcher, StringMatcher};

    const TEXT: &str = "foo bar foo baz";

    fn store(labels: &str) -> MarkerStore {
        MarkerStore::new(LabelAllocator::new(labels.chars().collect(), false))
    }

    fn ctx<'a>(visible: &'a VisibleText, first: char) -> LabelContext<'a> {
        LabelContext {
            visible_text: visible,
            cursor: 0,
            first_character: Some(first),
            case_sensitive: false,
        }
    }

    fn scan(visible: &VisibleText, pattern: &str) -> Vec<SearchMatch> {
        LiteralMatcher::new().find_matches(visible, pattern, false, usize::MAX)
    }

    #[test]
    fn create_labels_every_match() {
        let visible = VisibleText::whole(TEXT);
        let set = store("asd").create(scan(&visible, "fo"), &ctx(&visible, 'f'));
        let labels: Vec<_> = set.visible().map(|m| m.label.clone().unwrap()).collect();
        assert_eq!(labels, vec!["a", "s"]);
        assert_eq!(set.get_by_label("s").unwrap().jump_position, 8);
    }

    #[test]
    fn next_search_characters_are_not_labels() {
        let visible = VisibleText::whole(TEXT);
        // "ba" の直後は 'r' と 'z'
        let set = store("rzab").create(scan(&visible, "ba"), &ctx(&visible, 'b'));
        assert_eq!(set.markers()[0].label.as_deref(), Some("a"));
        assert_eq!(set.markers()[1].label, None);
        assert_eq!(set.unlabeled_count(), 1);
    }

    #[test]
    fn narrow_hides_non_continuing_markers() {
        let visible = VisibleText::whole(TEXT);
        let store = store("asdf");
        let base = store.create(scan(&visible, "b"), &ctx(&visible, 'b'));
        assert_eq!(base.visible_count(), 2);

        let narrowed = store.narrow(&base, 'a', &ctx(&visible, 'b'));
        assert_eq!(narrowed.visible_count(), 2);

        let narrowed = store.narrow(&narrowed, 'z', &ctx(&visible, 'b'));
        assert_eq!(narrowed.visible_count(), 1);
        let survivor = narrowed.visible().next().unwrap();
        assert_eq!(survivor.match_range.start, 12);
        assert_eq!(survivor.match_range.end, 15);
        assert_eq!(narrowed.len(), 2);
        assert!(narrowed.markers().iter().any(|m| !m.visible && m.label.is_none()));
    }

    #[test]
    fn operator_position_is_match_end_after_cursor() {
        let m = SearchMatch { start: 4, end: 7, line: 0, column: 4 };
        let marker = Marker::new(m, 2);
        assert_eq!(marker.resolve_position(false), 4);
        assert_eq!(marker.resolve_position(true), 7);

        let behind = Marker::new(m, 10);
        assert_eq!(behind.resolve_position(true), 4);
    }

    #[test]
    fn next_match_wraps_when_enabled() {
        let visible = VisibleText::whole(TEXT);
        let set = store("asd").create(scan(&visible, "fo"), &ctx(&visible, 'f'));
        assert_eq!(set.next_match(0, false).unwrap().jump_position, 0);
        assert_eq!(set.next_match(1, false).unwrap().jump_position, 8);
        assert!(set.next_match(9, false).is_none());
        assert_eq!(set.next_match(9, true).unwrap().jump_position, 0);
    }

    #[test]
    fn chosen_highlight_wins_over_next_match() {
        let visible = VisibleText::whole(TEXT);
        let mut set = store("asd").create(scan(&visible, "fo"), &ctx(&visible, 'f'));
        let mut selected = SelectedPositions::new();
        selected.toggle(0);

        set.refresh_highlights(&selected, false, 0, true);
        assert_eq!(set.markers()[0].highlight, HighlightState::Chosen);
        assert_eq!(set.markers()[1].highlight, HighlightState::Default);

        selected.toggle(0);
        set.refresh_highlights(&selected, false, 0, true);
        assert_eq!(set.markers()[0].highlight, HighlightState::NextMatch);
    }

    #[test]
    fn hierarchical_prefix_lookup() {
        let visible = VisibleText::whole("x x x x");
        let store = MarkerStore::new(LabelAllocator::new(vec!['a', 's'], true));
        let set = store.create(scan(&visible, "x"), &ctx(&visible, 'x'));
        assert!(set.has_label_prefix("a"));
        assert!(!set.has_label_prefix("aa"));
        assert!(set.get_by_label("ss").is_some());
    }
}
