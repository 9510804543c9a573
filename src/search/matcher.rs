//! 検索用マッチャー

use super::types::{SearchMatch, VisibleText};

/// 文字列マッチング戦略
pub trait StringMatcher {
    /// 表示テキスト内のマッチを文書順で最大 `limit` 件返す
    fn find_matches(
        &self,
        visible: &VisibleText,
        pattern: &str,
        case_sensitive: bool,
        limit: usize,
    ) -> Vec<SearchMatch>;
}

/// 単純なリテラルマッチャー
#[derive(Debug, Default, Clone)]
pub struct LiteralMatcher;

impl LiteralMatcher {
    /// インスタンスを作成
    pub fn new() -> Self {
        Self
    }
}

impl StringMatcher for LiteralMatcher {
    fn find_matches(
        &self,
        visible: &VisibleText,
        pattern: &str,
        case_sensitive: bool,
        limit: usize,
    ) -> Vec<SearchMatch> {
        let chars = visible.chars();
        let pattern_chars: Vec<char> = pattern.chars().collect();

        if pattern_chars.is_empty() || pattern_chars.len() > chars.len() || limit == 0 {
            return Vec::new();
        }

        // 文字ごとの位置情報を前計算
        let mut line = visible.first_line();
        let mut column = 0usize;
        let mut line_map = Vec::with_capacity(chars.len());

        for ch in chars {
            line_map.push((line, column));
            if *ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }

        let last_start = chars.len() - pattern_chars.len();
        let mut matches = Vec::new();

        'outer: for start in 0..=last_start {
            for (offset, pat_ch) in pattern_chars.iter().enumerate() {
                if !chars_equal(chars[start + offset], *pat_ch, case_sensitive) {
                    continue 'outer;
                }
            }

            let (line, column) = line_map[start];
            let start = visible.offset() + start;

            matches.push(SearchMatch {
                start,
                end: start + pattern_chars.len(),
                line,
                column,
            });

            if matches.len() >= limit {
                break;
            }
        }

        matches
    }
}

/// 大文字小文字の方針に従って文字を比較
pub fn chars_equal(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        return a == b;
    }

    // Unicodeケースフォールディング（簡易）
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{LiteralMatcher, StringMatcher};
    use crate::search::types::VisibleText;

    fn find(text: &str, pattern: &str, case_sensitive: bool) -> Vec<crate::search::SearchMatch> {
        LiteralMatcher::new().find_matches(&VisibleText::whole(text), pattern, case_sensitive, usize::MAX)
    }

    #[test]
    fn finds_basic_matches() {
        let result = find("hello world hello", "hello", true);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].start, 0);
        assert_eq!(result[1].start, 12);
        assert_eq!(result[1].end, 17);
    }

    #[test]
    fn handles_newlines() {
        let result = find("hello\nworld", "world", true);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].line, 1);
        assert_eq!(result[0].column, 0);
    }

    #[test]
    fn returns_empty_for_non_match() {
        assert!(find("abc", "z", true).is_empty());
        assert!(find("abc", "", true).is_empty());
    }

    #[test]
    fn supports_case_insensitive() {
        let result = find("Hello World", "hello", false);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].start, 0);
    }

    #[test]
    fn overlapping_occurrences_are_reported() {
        let result = find("aaa", "aa", true);
        assert_eq!(result.iter().map(|m| m.start).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn positions_are_offset_into_document() {
        let visible = VisibleText::new(100, 7, "ab\ncab");
        let result = LiteralMatcher::new().find_matches(&visible, "ab", true, usize::MAX);
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].start, result[0].line, result[0].column), (100, 7, 0));
        assert_eq!((result[1].start, result[1].line, result[1].column), (104, 8, 1));
    }

    #[test]
    fn stops_at_limit() {
        let visible = VisibleText::whole("x x x x x");
        let result = LiteralMatcher::new().find_matches(&visible, "x", true, 3);
        assert_eq!(result.len(), 3);
        assert_eq!(result[2].start, 4);
    }
}
