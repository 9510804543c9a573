//! ホスト（エディタ）とのインターフェース

use crate::error::FlashError;
use crate::search::VisibleText;

use super::marker::RenderMarker;

/// ホストの編集モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Normal,
    Visual,
    VisualLine,
    VisualBlock,
    /// flash 検索の入力中
    FlashSearch,
}

impl Mode {
    /// flash 検索を開始できるモードか
    pub fn can_start_flash(self) -> bool {
        matches!(
            self,
            Mode::Normal | Mode::Visual | Mode::VisualLine | Mode::VisualBlock
        )
    }
}

/// flash 検索が利用するホスト側の機能
///
/// 呼び出しはすべて同期的に完了するものとして扱う。
pub trait FlashHost {
    /// 画面に表示されているテキスト
    fn visible_text(&self) -> VisibleText;

    /// 現在のカーソル位置（文書内の文字インデックス）
    fn cursor(&self) -> usize;

    fn set_cursor(&mut self, position: usize);

    /// 複数カーソルを設定
    fn set_cursor_set(&mut self, positions: &[usize]);

    fn mode(&self) -> Mode;

    fn set_mode(&mut self, mode: Mode);

    /// 削除などのオペレーターが入力待ちか
    fn has_pending_operator(&self) -> bool {
        false
    }

    /// 既に複数カーソル状態か
    fn is_multi_cursor(&self) -> bool {
        false
    }

    /// マーカーの描画指示
    fn render_markers(&mut self, markers: &[RenderMarker]);

    fn report_error(&mut self, error: &FlashError);
}
