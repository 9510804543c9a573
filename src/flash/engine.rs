//! flash 検索の開始・終了とセッションの所有

use crate::config::FlashConfig;
use crate::search::{LiteralMatcher, StringMatcher};

use super::controller::{ExitReason, FlashController, StepEvent, Transition};
use super::host::{FlashHost, Mode};
use super::keystroke::Keystroke;
use super::session::FlashSession;

/// flash 検索のエントリポイント
///
/// セッションがない状態（待機）と、セッションがある状態（入力中）を持つ。
/// 前回の検索文字列はプロセスの生存中だけ保持する。
#[derive(Debug, Clone)]
pub struct FlashEngine<M: StringMatcher = LiteralMatcher> {
    controller: FlashController<M>,
    session: Option<FlashSession>,
    previous_search_string: String,
}

impl FlashEngine<LiteralMatcher> {
    pub fn new(config: FlashConfig) -> Self {
        Self::with_matcher(config, LiteralMatcher::new())
    }
}

impl Default for FlashEngine<LiteralMatcher> {
    fn default() -> Self {
        Self::new(FlashConfig::default())
    }
}

impl<M: StringMatcher> FlashEngine<M> {
    pub fn with_matcher(config: FlashConfig, matcher: M) -> Self {
        Self {
            controller: FlashController::with_matcher(config, matcher),
            session: None,
            previous_search_string: String::new(),
        }
    }

    pub fn config(&self) -> &FlashConfig {
        self.controller.config()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&FlashSession> {
        self.session.as_ref()
    }

    pub fn previous_search_string(&self) -> &str {
        &self.previous_search_string
    }

    /// 通常の flash 検索を開始
    pub fn start<H: FlashHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.activate(host, false)
    }

    /// 複数カーソル選択の flash 検索を開始
    pub fn start_multi_select<H: FlashHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.activate(host, true)
    }

    /// 1キーを処理する。セッションがなければ何もしない。
    pub fn handle_key<H: FlashHost + ?Sized>(&mut self, host: &mut H, key: Keystroke) -> Transition {
        let Some(session) = self.session.as_mut() else {
            return Transition::Stay(StepEvent::Ignored);
        };

        let transition = self.controller.handle_key(session, host, key);
        if let Transition::Exit(reason) = &transition {
            self.finish(host, reason);
        }
        transition
    }

    /// セッションを取り消す
    pub fn cancel<H: FlashHost + ?Sized>(&mut self, host: &mut H) {
        if self.session.is_some() {
            self.finish(host, &ExitReason::Cancelled);
        }
    }

    fn activate<H: FlashHost + ?Sized>(&mut self, host: &mut H, multi_select: bool) -> bool {
        let mode = host.mode();
        if !self.config().enable || host.is_multi_cursor() || !mode.can_start_flash() {
            log::debug!("flash not started in {:?}", mode);
            return false;
        }
        if let Some(mut stale) = self.session.take() {
            self.controller.clear(&mut stale, host);
        }

        self.session = Some(FlashSession::new(
            mode,
            &self.previous_search_string,
            multi_select,
        ));
        host.set_mode(Mode::FlashSearch);
        true
    }

    fn finish<H: FlashHost + ?Sized>(&mut self, host: &mut H, reason: &ExitReason) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        self.controller.clear(&mut session, host);
        host.set_mode(session.prior_mode);
        if reason.completes_search() {
            self.previous_search_string = session.search_string;
        }
        log::debug!("flash session finished: {:?}", reason);
    }
}
