//! flash 検索のキー入力処理
//!
//! 1キーごとに検索文字列を更新し、スキャン・絞り込み・キャッシュからの復元の
//! いずれかでマーカー集合を作り直す。ラベルに一致する文字は検索の続きより
//! 優先してジャンプとして扱う。

use crate::config::FlashConfig;
use crate::error::FlashError;
use crate::search::{LiteralMatcher, StringMatcher, VisibleText};

use super::host::FlashHost;
use super::keystroke::Keystroke;
use super::label::LabelAllocator;
use super::marker::{LabelContext, Marker, MarkerSet, MarkerStore};
use super::selection::SelectionModeAdapter;
use super::session::FlashSession;

/// 1キー処理後の状態遷移
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// セッション継続
    Stay(StepEvent),
    /// セッション終了
    Exit(ExitReason),
}

/// セッション継続時に起きたこと
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Scanned { matches: usize },
    Narrowed { visible: usize },
    Restored { visible: usize },
    Toggled { position: usize, selected: bool },
    /// 2文字ラベルの1文字目を受け付けた
    PendingLabel,
    NoMatches,
    Ignored,
}

/// セッション終了の理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    Jumped { position: usize },
    /// 複数選択を確定
    Committed { positions: Vec<usize> },
    Cancelled,
    NoLastSearch,
}

impl ExitReason {
    /// 検索が完了した（前回の検索文字列として記録する）か
    pub fn completes_search(&self) -> bool {
        matches!(self, ExitReason::Jumped { .. } | ExitReason::Committed { .. })
    }
}

/// キー入力ごとの状態機械
#[derive(Debug, Clone)]
pub struct FlashController<M: StringMatcher = LiteralMatcher> {
    config: FlashConfig,
    matcher: M,
    store: MarkerStore,
}

impl FlashController<LiteralMatcher> {
    pub fn new(config: FlashConfig) -> Self {
        Self::with_matcher(config, LiteralMatcher::new())
    }
}

impl<M: StringMatcher> FlashController<M> {
    /// マッチャーを差し替えて作成
    pub fn with_matcher(config: FlashConfig, matcher: M) -> Self {
        let store = MarkerStore::new(LabelAllocator::from_config(&config));
        Self {
            config,
            matcher,
            store,
        }
    }

    pub fn config(&self) -> &FlashConfig {
        &self.config
    }

    /// 1キーを処理する
    pub fn handle_key<H: FlashHost + ?Sized>(
        &self,
        session: &mut FlashSession,
        host: &mut H,
        key: Keystroke,
    ) -> Transition {
        match key {
            Keystroke::Escape => Transition::Exit(ExitReason::Cancelled),
            Keystroke::Confirm => self.confirm(session, host),
            Keystroke::Backspace => self.backspace(session, host),
            Keystroke::Printable(ch) if !ch.is_control() => self.printable(session, host, ch),
            Keystroke::Printable(_) | Keystroke::Ignored => Transition::Stay(StepEvent::Ignored),
        }
    }

    /// 表示中のマーカーをすべて消す
    pub fn clear<H: FlashHost + ?Sized>(&self, session: &mut FlashSession, host: &mut H) {
        let hidden: Vec<_> = session
            .last_render
            .iter()
            .filter(|m| m.visible)
            .map(|m| m.hidden())
            .collect();
        if !hidden.is_empty() {
            host.render_markers(&hidden);
        }
        session.last_render.clear();
        session.cache.clear();
        session.label_input.clear();
    }

    fn confirm<H: FlashHost + ?Sized>(&self, session: &mut FlashSession, host: &mut H) -> Transition {
        session.label_input.clear();

        if session.search_string.is_empty() {
            if session.previous_search_string.is_empty() {
                host.report_error(&FlashError::NoLastSearch);
                return Transition::Exit(ExitReason::NoLastSearch);
            }
            log::debug!("flash repeat last search {:?}", session.previous_search_string);
            session.search_string = session.previous_search_string.clone();
            session.first_character = session.search_string.chars().next();
            return self.scan(session, host);
        }

        if session.multi_select {
            return Transition::Exit(ExitReason::Committed {
                positions: session.selected.as_slice().to_vec(),
            });
        }

        let cursor = host.cursor();
        let target = session
            .current_markers()
            .and_then(|set| set.next_match(cursor, self.config.wrap))
            .cloned();

        match target {
            Some(marker) => self.jump(session, host, &marker),
            None => Transition::Stay(StepEvent::NoMatches),
        }
    }

    fn backspace<H: FlashHost + ?Sized>(
        &self,
        session: &mut FlashSession,
        host: &mut H,
    ) -> Transition {
        if !session.label_input.is_empty() {
            session.label_input.clear();
            return Transition::Stay(StepEvent::Ignored);
        }

        session.search_string.pop();
        if session.search_string.is_empty() {
            return Transition::Exit(ExitReason::Cancelled);
        }

        let visible_text = host.visible_text();
        let ctx = self.label_context(session, host, &visible_text);
        let restored = session
            .current_markers()
            .map(|cached| self.store.restore(cached, &ctx));

        match restored {
            Some(set) => {
                let visible = self.reinstate(session, host, set);
                Transition::Stay(StepEvent::Restored { visible })
            }
            None => self.scan(session, host),
        }
    }

    fn printable<H: FlashHost + ?Sized>(
        &self,
        session: &mut FlashSession,
        host: &mut H,
        ch: char,
    ) -> Transition {
        // ラベル一致は検索の続きより優先
        if let Some(set) = session.current_markers() {
            let mut candidate = session.label_input.clone();
            candidate.push(ch);

            if let Some(marker) = set.get_by_label(&candidate).cloned() {
                session.label_input.clear();
                return self.jump(session, host, &marker);
            }
            if set.has_label_prefix(&candidate) {
                session.label_input = candidate;
                return Transition::Stay(StepEvent::PendingLabel);
            }
        }
        // 接頭辞の文字は表示中マッチの次の文字にならないので、捨てても検索の続きは失われない
        session.label_input.clear();

        session.search_string.push(ch);
        if session.search_len() == 1 {
            session.first_character = Some(ch);
            return self.scan(session, host);
        }
        self.append(session, host, ch)
    }

    fn append<H: FlashHost + ?Sized>(
        &self,
        session: &mut FlashSession,
        host: &mut H,
        ch: char,
    ) -> Transition {
        let visible_text = host.visible_text();
        let ctx = self.label_context(session, host, &visible_text);

        // 後退後に同じ文字を入力し直した場合
        if let Some(cached) = session.current_markers() {
            let set = self.store.restore(cached, &ctx);
            let visible = self.reinstate(session, host, set);
            return Transition::Stay(StepEvent::Restored { visible });
        }

        let parent = session.parent_prefix();
        let parent_sensitive = self.case_sensitive(parent);
        let narrowed = session
            .cache
            .get(parent)
            .filter(|prior| parent_sensitive == ctx.case_sensitive && !prior.is_capped())
            .map(|prior| self.store.narrow(prior, ch, &ctx));

        match narrowed {
            Some(set) => {
                let visible = self.commit(session, host, set);
                log::debug!("flash narrowed {:?}: {} visible", session.search_string, visible);
                if visible == 0 {
                    host.report_error(&FlashError::NoMatches {
                        pattern: session.search_string.clone(),
                    });
                    return Transition::Stay(StepEvent::NoMatches);
                }
                Transition::Stay(StepEvent::Narrowed { visible })
            }
            None => self.scan(session, host),
        }
    }

    /// 検索文字列全体で表示テキストをスキャンし直す
    fn scan<H: FlashHost + ?Sized>(&self, session: &mut FlashSession, host: &mut H) -> Transition {
        let visible_text = host.visible_text();
        let ctx = self.label_context(session, host, &visible_text);
        let matches = self.matcher.find_matches(
            &visible_text,
            &session.search_string,
            ctx.case_sensitive,
            self.config.max_matches,
        );
        log::debug!(
            "flash scan {:?}: {} matches in {} chars",
            session.search_string,
            matches.len(),
            visible_text.len_chars()
        );

        if matches.is_empty() {
            session.cache.evict_from(session.search_len());
            self.render(session, host);
            host.report_error(&FlashError::NoMatches {
                pattern: session.search_string.clone(),
            });
            return Transition::Stay(StepEvent::NoMatches);
        }

        let count = matches.len();
        let mut set = self.store.create(matches, &ctx);
        set.set_capped(count >= self.config.max_matches);
        self.commit(session, host, set);
        Transition::Stay(StepEvent::Scanned { matches: count })
    }

    /// 移動先を確定する。複数選択中は選択を切り替える。
    fn jump<H: FlashHost + ?Sized>(
        &self,
        session: &mut FlashSession,
        host: &mut H,
        marker: &Marker,
    ) -> Transition {
        let operator_pending = host.has_pending_operator();
        let position = marker.resolve_position(operator_pending);

        if !session.multi_select {
            log::debug!("flash jump to {}", position);
            host.set_cursor(position);
            return Transition::Exit(ExitReason::Jumped { position });
        }

        let selected = SelectionModeAdapter::toggle(&mut session.selected, position, host);
        let cursor = host.cursor();
        if let Some(set) = session.cache.get_mut(&session.search_string) {
            set.refresh_highlights(&session.selected, operator_pending, cursor, self.config.wrap);
        }
        self.render(session, host);
        Transition::Stay(StepEvent::Toggled { position, selected })
    }

    /// 新しいマーカー集合をキャッシュに登録して描画する
    ///
    /// 同じ長さ以上のキャッシュは到達できない分岐として捨てる。
    fn commit<H: FlashHost + ?Sized>(
        &self,
        session: &mut FlashSession,
        host: &mut H,
        mut set: MarkerSet,
    ) -> usize {
        let visible = self.prepare(session, host, &mut set);
        session.cache.insert(&session.search_string, set);
        self.render(session, host);
        visible
    }

    /// キャッシュから戻した集合を描画する。より長いキャッシュは残す。
    fn reinstate<H: FlashHost + ?Sized>(
        &self,
        session: &mut FlashSession,
        host: &mut H,
        mut set: MarkerSet,
    ) -> usize {
        let visible = self.prepare(session, host, &mut set);
        session.cache.replace(&session.search_string, set);
        self.render(session, host);
        visible
    }

    /// ハイライトを更新し、ラベルが足りなければホストへ通知する
    fn prepare<H: FlashHost + ?Sized>(
        &self,
        session: &FlashSession,
        host: &mut H,
        set: &mut MarkerSet,
    ) -> usize {
        set.refresh_highlights(
            &session.selected,
            host.has_pending_operator(),
            host.cursor(),
            self.config.wrap,
        );

        let visible = set.visible_count();
        let unlabeled = set.unlabeled_count();
        if unlabeled > 0 {
            log::warn!(
                "flash label alphabet exhausted: {} of {} markers unlabeled",
                unlabeled,
                visible
            );
            host.report_error(&FlashError::LabelAlphabetExhausted {
                matches: visible,
                labels: visible - unlabeled,
            });
        }
        visible
    }

    fn render<H: FlashHost + ?Sized>(&self, session: &mut FlashSession, host: &mut H) {
        let current = session
            .current_markers()
            .map(MarkerSet::render_list)
            .unwrap_or_default();

        let mut directives = current.clone();
        directives.extend(
            session
                .last_render
                .iter()
                .filter(|old| old.visible && !current.iter().any(|m| m.position == old.position))
                .map(|old| old.hidden()),
        );

        if !directives.is_empty() {
            host.render_markers(&directives);
        }
        session.last_render = current;
    }

    fn label_context<'a, H: FlashHost + ?Sized>(
        &self,
        session: &FlashSession,
        host: &H,
        visible_text: &'a VisibleText,
    ) -> LabelContext<'a> {
        LabelContext {
            visible_text,
            cursor: host.cursor(),
            first_character: session.first_character,
            case_sensitive: self.case_sensitive(&session.search_string),
        }
    }

    fn case_sensitive(&self, pattern: &str) -> bool {
        self.config.case_sensitivity.is_sensitive_for(pattern)
    }
}
