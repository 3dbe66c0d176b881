//! Dashboard: greeting and session history.

use chrono::Timelike;
use crossterm::event::{KeyCode, KeyEvent};
use perspectiq_core::api::SessionHistoryItem;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::PageAction;
use crate::common::{single_line, truncate_with_ellipsis};
use crate::overlays::ModalState;
use crate::overlays::render_utils::{InputHint, render_hints};
use crate::route::Route;

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Newest first.
    pub sessions: Vec<SessionHistoryItem>,
    pub loaded: bool,
    pub error: Option<String>,
    pub selected: usize,
}

impl DashboardState {
    /// Stores the server's history list, newest first.
    pub fn set_history(&mut self, mut sessions: Vec<SessionHistoryItem>) {
        sessions.reverse();
        self.sessions = sessions;
        self.loaded = true;
        self.error = None;
        self.clamp_selection();
    }

    pub fn remove_session(&mut self, session_id: i64) {
        self.sessions.retain(|s| s.id != session_id);
        self.clamp_selection();
    }

    pub fn selected_session(&self) -> Option<&SessionHistoryItem> {
        self.sessions.get(self.selected)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.sessions.len().saturating_sub(1));
    }
}

/// Greeting for the local hour of day.
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

pub fn handle_key(state: &mut DashboardState, key: KeyEvent) -> Vec<PageAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected = state.selected.saturating_sub(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.selected + 1 < state.sessions.len() {
                state.selected += 1;
            }
            vec![]
        }
        KeyCode::Enter => state
            .selected_session()
            .map(|s| vec![PageAction::Navigate(Route::Summary(s.id))])
            .unwrap_or_default(),
        KeyCode::Char('d') | KeyCode::Delete => state
            .selected_session()
            .map(|s| vec![PageAction::OpenModal(ModalState::confirm_delete(s.id))])
            .unwrap_or_default(),
        KeyCode::Char('n') => vec![PageAction::Navigate(Route::Setup)],
        KeyCode::Char('r') => vec![PageAction::ReloadHistory],
        KeyCode::Char('q') => vec![PageAction::Quit],
        _ => vec![],
    }
}

pub fn render(
    state: &DashboardState,
    username: Option<&str>,
    loading: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let hour = chrono::Local::now().hour();
    let name = username.unwrap_or("there");
    let header = vec![
        Line::from(Span::styled(
            format!("{}, {name}.", greeting(hour)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Review past negotiations or start a new simulation.",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Recent Simulations ");

    if loading && !state.loaded {
        frame.render_widget(
            Paragraph::new("Loading history…")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[1],
        );
    } else if let Some(error) = &state.error {
        frame.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block),
            chunks[1],
        );
    } else if state.sessions.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "No history yet",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Press n to start your first simulation.",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .block(block),
            chunks[1],
        );
    } else {
        let row_width = chunks[1].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = state
            .sessions
            .iter()
            .map(|s| session_item(s, row_width))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▸ ");
        let mut list_state = ListState::default().with_selected(Some(state.selected));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    render_hints(
        frame,
        chunks[2],
        &[
            InputHint::new("Enter", "Analysis"),
            InputHint::new("n", "New simulation"),
            InputHint::new("d", "Delete"),
            InputHint::new("r", "Reload"),
        ],
        Color::Cyan,
    );
}

fn session_item(session: &SessionHistoryItem, width: usize) -> ListItem<'static> {
    let meta = format!(
        "ID #{}  {}  {}  {} messages",
        session.id,
        session.created_date().unwrap_or("—"),
        session.persona,
        session.message_count
    );
    let title = truncate_with_ellipsis(&single_line(session.display_title()), width);
    ListItem::new(vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
    ])
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn item(id: i64) -> SessionHistoryItem {
        SessionHistoryItem {
            id,
            scenario: format!("Scenario {id}"),
            persona: "CTO".to_string(),
            created_at: Some("2024-03-01T09:00:00".to_string()),
            summary: None,
            evaluation: None,
            message_count: 2,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn greeting_bands() {
        assert_eq!(greeting(0), "Good morning");
        assert_eq!(greeting(11), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(17), "Good afternoon");
        assert_eq!(greeting(18), "Good evening");
        assert_eq!(greeting(23), "Good evening");
    }

    #[test]
    fn history_is_shown_newest_first() {
        let mut state = DashboardState::default();
        state.set_history(vec![item(1), item(2), item(3)]);
        let ids: Vec<i64> = state.sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(state.loaded);
    }

    #[test]
    fn enter_opens_selected_summary() {
        let mut state = DashboardState::default();
        state.set_history(vec![item(1), item(2)]);
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Enter)),
            vec![PageAction::Navigate(Route::Summary(1))]
        );
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut state = DashboardState::default();
        state.set_history(vec![item(5)]);
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Char('d'))),
            vec![PageAction::OpenModal(ModalState::confirm_delete(5))]
        );
    }

    #[test]
    fn removing_last_row_clamps_selection() {
        let mut state = DashboardState::default();
        state.set_history(vec![item(1), item(2)]);
        state.selected = 1;
        state.remove_session(1);
        assert_eq!(state.selected, 0);
        assert_eq!(state.sessions.len(), 1);
        state.remove_session(2);
        assert!(state.selected_session().is_none());
        assert!(handle_key(&mut state, key(KeyCode::Enter)).is_empty());
    }
}
