//! flash のラベル割り当てと絞り込みの性質テスト
//!
//! 公開 API だけを使い、ラベルの一意性・除外文字・絞り込みの単調性・
//! 後退での復元を確認する。

use std::collections::{BTreeMap, HashSet};

use altre_flash::flash::{LabelAllocator, LabelContext, MarkerStore, RenderMarker};
use altre_flash::search::{LiteralMatcher, StringMatcher, VisibleText};
use altre_flash::{FlashConfig, FlashEngine, FlashError, FlashHost, Keystroke, Mode};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

struct PropHost {
    text: String,
    cursor: usize,
    mode: Mode,
    markers: BTreeMap<usize, RenderMarker>,
}

impl PropHost {
    fn new(text: &str, cursor: usize) -> Self {
        Self {
            text: text.to_string(),
            cursor,
            mode: Mode::Normal,
            markers: BTreeMap::new(),
        }
    }

    fn snapshot(&self) -> Vec<(usize, Option<String>)> {
        self.markers
            .values()
            .map(|m| (m.position, m.label.clone()))
            .collect()
    }
}

impl FlashHost for PropHost {
    fn visible_text(&self) -> VisibleText {
        VisibleText::whole(&self.text)
    }
    fn cursor(&self) -> usize {
        self.cursor
    }
    fn set_cursor(&mut self, position: usize) {
        self.cursor = position;
    }
    fn set_cursor_set(&mut self, _positions: &[usize]) {}
    fn mode(&self) -> Mode {
        self.mode
    }
    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
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
    fn report_error(&mut self, _error: &FlashError) {}
}

fn alphabet_strategy() -> impl Strategy<Value = Vec<char>> {
    proptest::sample::subsequence(vec!['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'], 1..=8)
        .prop_shuffle()
}

/// 検索文字と衝突しない数字ラベルのエンジン
fn digit_engine() -> FlashEngine {
    FlashEngine::new(FlashConfig {
        labels: "0123456789".to_string(),
        ..FlashConfig::default()
    })
}

fn naive_starts(text: &str, pattern: &str) -> Vec<usize> {
    let chars: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    if pattern.len() > chars.len() {
        return Vec::new();
    }
    (0..=chars.len() - pattern.len())
        .filter(|&start| chars[start..start + pattern.len()] == pattern[..])
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn labels_are_unique_prefix_free_and_never_continuations(
        text in "[abcd ]{1,60}",
        pattern in "[abcd]{1,2}",
        alphabet in alphabet_strategy(),
        hierarchical in any::<bool>(),
        cursor in 0usize..60,
    ) {
        let visible = VisibleText::whole(&text);
        let cursor = cursor.min(text.len());
        let matches = LiteralMatcher::new().find_matches(&visible, &pattern, false, usize::MAX);
        let store = MarkerStore::new(LabelAllocator::new(alphabet, hierarchical));
        let ctx = LabelContext {
            visible_text: &visible,
            cursor,
            first_character: pattern.chars().next(),
            case_sensitive: false,
        };
        let set = store.create(matches.clone(), &ctx);

        let mut excluded: HashSet<char> = pattern.chars().take(1).collect();
        excluded.extend(matches.iter().filter_map(|m| visible.next_char_after(m)));

        let labels: Vec<String> = set.visible().filter_map(|m| m.label.clone()).collect();
        let unique: HashSet<&String> = labels.iter().collect();
        prop_assert_eq!(unique.len(), labels.len());

        for (i, a) in labels.iter().enumerate() {
            prop_assert!(a.chars().all(|ch| !excluded.contains(&ch)), "label {} uses an excluded char", a);
            for (j, b) in labels.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a.as_str()), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn narrowing_only_shrinks_the_candidate_set(
        text in "[abc \n]{0,40}",
        pattern in "[abc]{1,4}",
        cursor in 0usize..40,
    ) {
        let mut host = PropHost::new(&text, cursor.min(text.len()));
        let mut engine = digit_engine();
        prop_assert!(engine.start(&mut host));

        let mut previous: Option<HashSet<usize>> = None;
        let mut typed = String::new();
        for ch in pattern.chars() {
            typed.push(ch);
            engine.handle_key(&mut host, Keystroke::Printable(ch));

            let current: HashSet<usize> = host.markers.keys().copied().collect();
            let expected: HashSet<usize> = naive_starts(&text, &typed).into_iter().collect();
            prop_assert_eq!(&current, &expected);
            if let Some(prior) = &previous {
                prop_assert!(current.is_subset(prior));
            }
            previous = Some(current);
        }
    }

    #[test]
    fn backspace_restores_every_prior_state(
        text in "[abc \n]{0,40}",
        pattern in "[abc]{2,5}",
        cursor in 0usize..40,
    ) {
        let mut host = PropHost::new(&text, cursor.min(text.len()));
        let mut engine = digit_engine();
        prop_assert!(engine.start(&mut host));

        let mut snapshots = Vec::new();
        for ch in pattern.chars() {
            engine.handle_key(&mut host, Keystroke::Printable(ch));
            snapshots.push(host.snapshot());
        }

        snapshots.pop();
        while let Some(expected) = snapshots.pop() {
            engine.handle_key(&mut host, Keystroke::Backspace);
            prop_assert_eq!(host.snapshot(), expected);
        }

        engine.handle_key(&mut host, Keystroke::Backspace);
        prop_assert!(!engine.is_active());
        prop_assert!(host.markers.is_empty());
        prop_assert_eq!(host.mode, Mode::Normal);
    }
}
