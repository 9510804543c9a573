//! 複数カーソル選択モード

use super::host::FlashHost;

/// 選択済みカーソル位置（位置で一意、追加順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedPositions {
    positions: Vec<usize>,
}

impl SelectedPositions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未選択なら追加、選択済みなら削除する。追加した場合は `true`。
    pub fn toggle(&mut self, position: usize) -> bool {
        match self.positions.iter().position(|&p| p == position) {
            Some(index) => {
                self.positions.remove(index);
                false
            }
            None => {
                self.positions.push(position);
                true
            }
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }
}

/// 移動先をカーソル移動ではなく選択の切り替えに変換する
pub struct SelectionModeAdapter;

impl SelectionModeAdapter {
    /// 位置の選択を切り替え、ホストのカーソル集合を同期する
    pub fn toggle<H: FlashHost + ?Sized>(
        selected: &mut SelectedPositions,
        position: usize,
        host: &mut H,
    ) -> bool {
        let added = selected.toggle(position);
        log::debug!(
            "flash multi-select {} {} ({} selected)",
            if added { "add" } else { "remove" },
            position,
            selected.len()
        );
        host.set_cursor_set(selected.as_slice());
        added
    }
}
