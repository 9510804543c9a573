//! 検索関連の共通型

/// 1件の検索マッチ情報
///
/// 位置はすべて文書全体での文字インデックス。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchMatch {
    /// マッチ開始位置
    pub start: usize,
    /// マッチ終了位置（排他的）
    pub end: usize,
    /// マッチ開始行
    pub line: usize,
    /// マッチ開始列
    pub column: usize,
}

impl SearchMatch {
    /// マッチ長（文字数）
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// マッチが空か判定
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 終端を1文字伸ばしたマッチ
    pub fn extended(&self) -> Self {
        Self {
            end: self.end + 1,
            ..*self
        }
    }
}

/// 画面に表示されているテキスト
///
/// ホストから渡される検索対象。`offset` は先頭文字の文書内位置、
/// `first_line` はその行番号。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleText {
    offset: usize,
    first_line: usize,
    chars: Vec<char>,
}

impl VisibleText {
    pub fn new(offset: usize, first_line: usize, text: &str) -> Self {
        Self {
            offset,
            first_line,
            chars: text.chars().collect(),
        }
    }

    /// 文書全体が表示されている場合
    pub fn whole(text: &str) -> Self {
        Self::new(0, 0, text)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn first_line(&self) -> usize {
        self.first_line
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len_chars(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// 表示範囲の終端（排他的、文書内位置）
    pub fn end(&self) -> usize {
        self.offset + self.chars.len()
    }

    /// 文書内位置の文字を取得（表示範囲外は `None`）
    pub fn char_at(&self, position: usize) -> Option<char> {
        position
            .checked_sub(self.offset)
            .and_then(|local| self.chars.get(local).copied())
    }

    /// マッチ直後の文字
    pub fn next_char_after(&self, m: &SearchMatch) -> Option<char> {
        self.char_at(m.end)
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}
