//! 検索文字列ごとのマーカーキャッシュ

use std::collections::BTreeMap;

use super::marker::MarkerSet;

/// 検索文字列（接頭辞）ごとのマーカー集合
///
/// 文字数ごとに最大1件を保持する。登録時には同じ長さ以上の項目を捨てるため、
/// 後退後に別の文字を入力して到達不能になった分岐は残らない。
#[derive(Debug, Clone, Default)]
pub struct MarkerCache {
    entries: BTreeMap<usize, (String, MarkerSet)>,
}

impl MarkerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 検索文字列に対応する集合を登録
    pub fn insert(&mut self, prefix: &str, set: MarkerSet) {
        let len = prefix.chars().count();
        self.evict_from(len);
        self.entries.insert(len, (prefix.to_string(), set));
    }

    /// 後退や再入力で戻った集合を差し替える。より長い項目は残す。
    pub fn replace(&mut self, prefix: &str, set: MarkerSet) {
        let len = prefix.chars().count();
        if self.entries.get(&len).is_some_and(|entry| entry.0 != prefix) {
            self.evict_from(len);
        }
        self.entries.insert(len, (prefix.to_string(), set));
    }

    pub fn get(&self, prefix: &str) -> Option<&MarkerSet> {
        self.entries
            .get(&prefix.chars().count())
            .filter(|entry| entry.0 == prefix)
            .map(|(_, set)| set)
    }

    pub fn get_mut(&mut self, prefix: &str) -> Option<&mut MarkerSet> {
        self.entries
            .get_mut(&prefix.chars().count())
            .filter(|entry| entry.0 == prefix)
            .map(|(_, set)| set)
    }

    /// 指定した文字数以上の項目を破棄
    pub fn evict_from(&mut self, len: usize) {
        self.entries.split_off(&len);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 保持している検索文字列（短い順）
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(key, _)| key.as_str())
    }
}
