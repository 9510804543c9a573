//! flash 検索を試すための端末フロントエンド

mod document;

pub use document::{DocumentHost, Operator};

use crate::config::FlashConfig;
use crate::flash::{ExitReason, FlashEngine, FlashHost, HighlightState, Keystroke, Mode, Transition};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::stdout;
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

pub struct TuiApplication {
    engine: FlashEngine,
    host: DocumentHost,
    running: bool,
}

impl TuiApplication {
    pub fn new(config: FlashConfig, text: &str) -> Self {
        Self {
            engine: FlashEngine::new(config),
            host: DocumentHost::new(text),
            running: true,
        }
    }

    pub fn host(&self) -> &DocumentHost {
        &self.host
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend).context("terminal init")?;
        terminal.hide_cursor().context("hide cursor")?;

        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().context("show cursor");
        drop(terminal);
        let cleanup_result = leave_terminal();

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            terminal
                .draw(|frame| self.render(frame))
                .context("render")?;

            if event::poll(Duration::from_millis(16)).context("event poll")? {
                if let Event::Key(key_event) = event::read().context("event read")? {
                    self.handle_key_event(key_event);
                }
            }
        }

        Ok(())
    }

    /// キー入力を処理する
    pub fn handle_key_event(&mut self, event: KeyEvent) {
        if event.kind == KeyEventKind::Release {
            return;
        }

        if self.engine.is_active() {
            let transition = self.engine.handle_key(&mut self.host, Keystroke::from(event));
            self.after_flash(transition);
            return;
        }

        self.host.clear_message();
        match event.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('f') => self.start_flash(false),
            KeyCode::Char('F') => self.start_flash(true),
            KeyCode::Char('d') => {
                let origin = self.host.cursor();
                self.host.operator = Some(Operator::Delete { origin });
            }
            KeyCode::Char('h') | KeyCode::Left => self.host.move_left(),
            KeyCode::Char('l') | KeyCode::Right => self.host.move_right(),
            KeyCode::Char('j') | KeyCode::Down => self.host.move_line(true),
            KeyCode::Char('k') | KeyCode::Up => self.host.move_line(false),
            KeyCode::Esc => {
                self.host.operator = None;
                self.host.set_cursor_set(&[]);
            }
            _ => {}
        }
    }

    fn start_flash(&mut self, multi_select: bool) {
        let started = if multi_select {
            self.engine.start_multi_select(&mut self.host)
        } else {
            self.engine.start(&mut self.host)
        };
        if !started {
            self.host.operator = None;
            self.host.set_message("flash を開始できません");
        }
    }

    fn after_flash(&mut self, transition: Transition) {
        let Transition::Exit(reason) = transition else {
            return;
        };

        if let (ExitReason::Jumped { position }, Some(Operator::Delete { origin })) =
            (&reason, self.host.operator)
        {
            let (start, end) = if *position >= origin {
                (origin, *position)
            } else {
                (*position, origin)
            };
            self.host.delete_range(start, end);
        }
        self.host.operator = None;

        if let ExitReason::Committed { positions } = reason {
            self.host.set_message(format!("{} cursors", positions.len()));
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        self.host.set_height(chunks[0].height as usize);
        let width = chunks[0].width as usize;
        let first = self.host.scroll();
        let last = (first + chunks[0].height as usize).min(self.host.line_count());
        let lines: Vec<Line> = (first..last).map(|line| self.render_line(line, width)).collect();
        frame.render_widget(Paragraph::new(lines), chunks[0]);

        let status = self.status_line();
        frame.render_widget(
            Paragraph::new(status).style(Style::default().add_modifier(Modifier::REVERSED)),
            chunks[1],
        );
    }

    fn render_line(&self, line: usize, width: usize) -> Line<'static> {
        let host = &self.host;
        let range = host.line_range(line);
        let mut spans = Vec::new();
        let mut used = 0usize;
        let mut position = range.start;

        while position < range.end {
            if let Some(label) = host.marker_at(position).and_then(|m| m.label.clone().map(|l| (l, m.highlight))) {
                let (text, highlight) = label;
                let label_width: usize = text.chars().map(|c| c.width().unwrap_or(1)).sum();
                if used + label_width > width {
                    break;
                }
                used += label_width;
                position += text.chars().count();
                spans.push(Span::styled(text, label_style(highlight)));
                continue;
            }

            let Some(ch) = host.char_at(position) else {
                break;
            };
            let ch_width = ch.width().unwrap_or(1);
            if used + ch_width > width {
                break;
            }
            used += ch_width;

            let style = if position == host.cursor() || host.cursors().contains(&position) {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if host.in_match(position) {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            spans.push(Span::styled(ch.to_string(), style));
            position += 1;
        }

        if position == host.cursor() && used < width {
            spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
        }
        Line::from(spans)
    }

    fn status_line(&self) -> String {
        let mode = match self.host.mode() {
            Mode::FlashSearch => {
                let search = self
                    .engine
                    .session()
                    .map(|s| s.search_string.as_str())
                    .unwrap_or_default();
                format!("FLASH {}", search)
            }
            other => format!("{:?}", other).to_uppercase(),
        };
        let operator = if self.host.operator.is_some() { " d" } else { "" };
        match self.host.message() {
            Some(message) => format!("{}{}  {}", mode, operator, message),
            None => format!("{}{}", mode, operator),
        }
    }
}

fn label_style(highlight: HighlightState) -> Style {
    let background = match highlight {
        HighlightState::Chosen => Color::Green,
        HighlightState::NextMatch => Color::Yellow,
        HighlightState::Default => Color::Magenta,
    };
    Style::default()
        .fg(Color::Black)
        .bg(background)
        .add_modifier(Modifier::BOLD)
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).context("enter alternate screen")?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, LeaveAlternateScreen).context("leave alternate screen")?;
    disable_raw_mode().context("disable raw mode")?;
    Ok(())
}
