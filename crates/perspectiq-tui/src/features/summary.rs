//! Post-session analysis and transcript.

use crossterm::event::{KeyCode, KeyEvent};
use perspectiq_core::transcript::{display_summary, speaker_label};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use super::PageAction;
use crate::common::{sanitize_for_display, wrap_text};
use crate::events::SummaryData;
use crate::overlays::render_utils::{InputHint, render_hints};
use crate::route::Route;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryTab {
    #[default]
    Analysis,
    Conversation,
}

impl SummaryTab {
    fn toggle(self) -> Self {
        match self {
            SummaryTab::Analysis => SummaryTab::Conversation,
            SummaryTab::Conversation => SummaryTab::Analysis,
        }
    }

    fn index(self) -> usize {
        match self {
            SummaryTab::Analysis => 0,
            SummaryTab::Conversation => 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SummaryState {
    pub session_id: i64,
    pub data: Option<SummaryData>,
    pub not_found: bool,
    pub error: Option<String>,
    /// Summary generated on view when none was stored.
    pub generated: Option<String>,
    pub tab: SummaryTab,
    pub scroll: u16,
}

impl SummaryState {
    pub fn new(session_id: i64) -> Self {
        Self {
            session_id,
            ..Self::default()
        }
    }

    pub fn set_data(&mut self, data: SummaryData) {
        self.not_found = data.session.is_none();
        self.data = Some(data);
        self.error = None;
        self.scroll = 0;
    }

    /// Summary text to show, if the session was found.
    pub fn summary_text(&self) -> Option<&str> {
        let session = self.data.as_ref()?.session.as_ref()?;
        Some(display_summary(session, self.generated.as_deref()))
    }
}

pub fn handle_key(state: &mut SummaryState, key: KeyEvent) -> Vec<PageAction> {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            state.tab = state.tab.toggle();
            state.scroll = 0;
            vec![]
        }
        KeyCode::Esc | KeyCode::Char('b') => vec![PageAction::Navigate(Route::Dashboard)],
        KeyCode::Char('n') => vec![PageAction::Navigate(Route::Setup)],
        KeyCode::Up | KeyCode::Char('k') => {
            state.scroll = state.scroll.saturating_sub(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.scroll = state.scroll.saturating_add(1);
            vec![]
        }
        KeyCode::Char('q') => vec![PageAction::Quit],
        _ => vec![],
    }
}

pub fn render(state: &SummaryState, generating: bool, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let hints = [
        InputHint::new("Tab", "Switch tab"),
        InputHint::new("↑↓", "Scroll"),
        InputHint::new("n", "New simulation"),
        InputHint::new("Esc", "Dashboard"),
    ];

    let Some(data) = &state.data else {
        let (text, color) = match &state.error {
            Some(error) => (error.as_str(), Color::Red),
            None => ("Loading analysis...", Color::DarkGray),
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(color)),
            chunks[1],
        );
        render_hints(frame, chunks[2], &hints[3..], Color::Cyan);
        return;
    };

    let Some(session) = &data.session else {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Session not found",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("Simulation #{} is not in your history.", state.session_id),
                    Style::default().fg(Color::Gray),
                )),
            ]),
            chunks[1],
        );
        render_hints(frame, chunks[2], &hints[3..], Color::Cyan);
        return;
    };

    let tabs = Tabs::new(vec!["Analysis", "Conversation"])
        .select(state.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    frame.render_widget(tabs, chunks[0]);

    let width = chunks[1].width.saturating_sub(2) as usize;
    let lines = match state.tab {
        SummaryTab::Analysis => {
            let mut lines = vec![
                Line::from(Span::styled(
                    session.display_title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(
                        "{}  {}  {} messages",
                        session.persona,
                        session.created_date().unwrap_or("—"),
                        session.message_count
                    ),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::default(),
                section_heading("Executive Summary"),
            ];
            if generating && state.generated.is_none() && session.stored_summary().is_none() {
                lines.push(Line::from(Span::styled(
                    "Generating summary…",
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                let summary = display_summary(session, state.generated.as_deref());
                push_wrapped(&mut lines, summary, width, Color::White);
            }
            let evaluation = session.evaluation.as_deref().filter(|e| !e.trim().is_empty());
            if let Some(evaluation) = evaluation {
                lines.push(Line::default());
                lines.push(section_heading("Evaluation"));
                push_wrapped(&mut lines, evaluation, width, Color::Gray);
            }
            lines
        }
        SummaryTab::Conversation => {
            let mut lines = Vec::new();
            if data.messages.is_empty() {
                lines.push(Line::from(Span::styled(
                    "No messages in this session.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for message in &data.messages {
                let color = if message.is_user() {
                    Color::Cyan
                } else {
                    Color::Magenta
                };
                lines.push(Line::from(Span::styled(
                    speaker_label(message, Some(&session.persona)).to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )));
                push_wrapped(&mut lines, &message.content, width, Color::White);
                lines.push(Line::default());
            }
            lines
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Simulation #{} ", session.id));
    frame.render_widget(
        Paragraph::new(lines).block(block).scroll((state.scroll, 0)),
        chunks[1],
    );

    render_hints(frame, chunks[2], &hints, Color::Cyan);
}

fn section_heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, color: Color) {
    for line in wrap_text(&sanitize_for_display(text), width) {
        lines.push(Line::from(Span::styled(line, Style::default().fg(color))));
    }
}
