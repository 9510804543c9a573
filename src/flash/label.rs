//! ラベル割り当て
//!
//! マッチごとに押しやすい短いラベルを割り当てる。検索を続けるための次の文字と
//! 衝突する文字はラベルに使わない。

use std::collections::HashSet;

use crate::config::FlashConfig;
use crate::search::SearchMatch;

/// ラベルから除外する文字集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedChars {
    chars: HashSet<char>,
}

impl ExcludedChars {
    pub fn new() -> Self {
        Self::default()
    }

    /// 文字を除外対象に追加する。大文字小文字を区別しない場合は両方を追加。
    pub fn insert(&mut self, ch: char, case_sensitive: bool) {
        self.chars.insert(ch);
        if !case_sensitive {
            self.chars.extend(ch.to_lowercase());
            self.chars.extend(ch.to_uppercase());
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// ラベル割り当て器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelAllocator {
    alphabet: Vec<char>,
    hierarchical: bool,
}

impl LabelAllocator {
    pub fn new(alphabet: Vec<char>, hierarchical: bool) -> Self {
        Self {
            alphabet,
            hierarchical,
        }
    }

    pub fn from_config(config: &FlashConfig) -> Self {
        Self::new(config.label_chars(), config.hierarchical_labels)
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// 除外文字を取り除いた使用可能なラベル文字
    pub fn available(&self, excluded: &ExcludedChars) -> Vec<char> {
        self.alphabet
            .iter()
            .copied()
            .filter(|ch| !excluded.contains(*ch))
            .collect()
    }

    /// マッチにラベルを割り当てる
    ///
    /// 戻り値は `matches` と同じ並び。カーソルに近いマッチから順に押しやすい
    /// ラベルを受け取り、足りない分は `None` になる。
    pub fn assign_labels(
        &self,
        matches: &[SearchMatch],
        excluded: &ExcludedChars,
        cursor: usize,
    ) -> Vec<Option<String>> {
        let available = self.available(excluded);
        let labels = self.generate(&available, matches.len());

        let mut assigned = vec![None; matches.len()];
        for (index, label) in order_by_distance(matches, cursor).into_iter().zip(labels) {
            assigned[index] = Some(label);
        }
        assigned
    }

    /// 既存ラベルをできるだけ維持して割り当て直す
    ///
    /// 1文字ラベルで収まる場合、まだ使用可能な既存ラベルはそのまま残し、
    /// 空いた文字をラベルのないマッチへ近い順に配る。収まらない場合は
    /// [`assign_labels`](Self::assign_labels) と同じ結果になる。
    pub fn relabel(
        &self,
        matches: &[SearchMatch],
        previous: &[Option<String>],
        excluded: &ExcludedChars,
        cursor: usize,
    ) -> Vec<Option<String>> {
        let available = self.available(excluded);
        if matches.len() > available.len() {
            return self.assign_labels(matches, excluded, cursor);
        }

        let order = order_by_distance(matches, cursor);
        let mut assigned: Vec<Option<String>> = vec![None; matches.len()];
        let mut used = HashSet::new();

        for &index in &order {
            let kept = previous
                .get(index)
                .and_then(|label| label.as_deref())
                .and_then(single_char)
                .filter(|ch| available.contains(ch) && !used.contains(ch));
            if let Some(ch) = kept {
                used.insert(ch);
                assigned[index] = Some(ch.to_string());
            }
        }

        let mut free = available.iter().copied().filter(|ch| !used.contains(ch));
        for &index in &order {
            if assigned[index].is_some() {
                continue;
            }
            match free.next() {
                Some(ch) => assigned[index] = Some(ch.to_string()),
                None => break,
            }
        }

        assigned
    }

    fn generate(&self, available: &[char], count: usize) -> Vec<String> {
        let n = available.len();
        if n == 0 || count == 0 {
            return Vec::new();
        }

        if count <= n || !self.hierarchical {
            return available.iter().take(count).map(|ch| ch.to_string()).collect();
        }

        // 末尾 g 文字をグループ接頭辞にし、残りを1文字ラベルとして使う
        let groups = (1..=n)
            .find(|g| (n - g) + g * n >= count)
            .unwrap_or(n);
        let (singles, prefixes) = available.split_at(n - groups);

        let mut labels: Vec<String> = singles.iter().map(|ch| ch.to_string()).collect();
        'outer: for prefix in prefixes {
            for second in available {
                if labels.len() >= count {
                    break 'outer;
                }
                labels.push(format!("{}{}", prefix, second));
            }
        }
        labels.truncate(count);
        labels
    }
}

/// カーソルからの距離順（同距離は文書順）に並べたインデックス
pub fn order_by_distance(matches: &[SearchMatch], cursor: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..matches.len()).collect();
    order.sort_by_key(|&index| (matches[index].start.abs_diff(cursor), matches[index].start));
    order
}

fn single_char(label: &str) -> Option<char> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}
