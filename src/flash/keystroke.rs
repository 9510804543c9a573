//! flash 検索中のキー入力

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// 分類済みのキー入力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Printable(char),
    Backspace,
    Confirm,
    Escape,
    /// 解釈しない入力（何もしない）
    Ignored,
}

impl Keystroke {
    /// 1文字から分類
    pub fn from_char(ch: char) -> Self {
        match ch {
            '\n' | '\r' => Keystroke::Confirm,
            '\u{8}' | '\u{7f}' => Keystroke::Backspace,
            '\u{1b}' => Keystroke::Escape,
            c if c.is_control() => Keystroke::Ignored,
            c => Keystroke::Printable(c),
        }
    }

    /// Vim 風表記のキー列を分類する
    ///
    /// `<CR>`, `<BS>`, `<S-BS>`, `<Esc>`, `<C-c>`, `<C-[>` を解釈し、
    /// それ以外の `<...>` はそのまま文字として扱う。
    pub fn parse_notation(keys: &str) -> Vec<Keystroke> {
        let mut result = Vec::new();
        let mut rest = keys;

        while let Some(ch) = rest.chars().next() {
            if ch == '<' {
                if let Some(end) = rest.find('>') {
                    let special = match &rest[..=end] {
                        "<CR>" | "<Enter>" => Some(Keystroke::Confirm),
                        "<BS>" | "<S-BS>" => Some(Keystroke::Backspace),
                        "<Esc>" | "<C-c>" | "<C-[>" => Some(Keystroke::Escape),
                        _ => None,
                    };
                    if let Some(stroke) = special {
                        result.push(stroke);
                        rest = &rest[end + 1..];
                        continue;
                    }
                }
            }
            result.push(Keystroke::from_char(ch));
            rest = &rest[ch.len_utf8()..];
        }

        result
    }
}

impl From<KeyEvent> for Keystroke {
    fn from(event: KeyEvent) -> Self {
        if event.kind == KeyEventKind::Release {
            return Keystroke::Ignored;
        }

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = event.modifiers.contains(KeyModifiers::ALT);

        match event.code {
            KeyCode::Esc => Keystroke::Escape,
            KeyCode::Char('c') | KeyCode::Char('[') if ctrl => Keystroke::Escape,
            KeyCode::Enter => Keystroke::Confirm,
            KeyCode::Backspace => Keystroke::Backspace,
            KeyCode::Char(ch) if !ctrl && !alt => Keystroke::from_char(ch),
            _ => Keystroke::Ignored,
        }
    }
}
