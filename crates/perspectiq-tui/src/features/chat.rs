//! Chat with the persona.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use perspectiq_core::api::Message;
use perspectiq_core::transcript::speaker_label;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::PageAction;
use crate::common::{sanitize_for_display, wrap_text};
use crate::overlays::ModalState;
use crate::overlays::render_utils::{InputHint, render_hints};
use crate::route::Route;

pub const EMPTY_STATE: &str = "The simulation is ready. Start speaking.";

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub session_id: i64,
    pub messages: Vec<Message>,
    pub input: String,
    pub loaded: bool,
    pub error: Option<String>,
    /// Lines scrolled up from the latest message; 0 follows the latest.
    pub scroll_back: u16,
}

impl ChatState {
    pub fn new(session_id: i64) -> Self {
        Self {
            session_id,
            ..Self::default()
        }
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.loaded = true;
        self.error = None;
        self.scroll_back = 0;
    }

    /// Appends a message and follows it.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.scroll_back = 0;
    }
}

/// `sending` is true while a reply is pending.
pub fn handle_key(state: &mut ChatState, key: KeyEvent, sending: bool) -> Vec<PageAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => vec![PageAction::Navigate(Route::Dashboard)],
        KeyCode::Char('e') if ctrl => {
            vec![PageAction::OpenModal(ModalState::confirm_end(state.session_id))]
        }
        KeyCode::Enter => {
            let text = state.input.trim().to_string();
            if text.is_empty() || sending {
                return vec![];
            }
            state.input.clear();
            state.push_message(Message::user(text.clone()));
            vec![PageAction::SendMessage {
                session_id: state.session_id,
                text,
            }]
        }
        KeyCode::PageUp => {
            state.scroll_back = state.scroll_back.saturating_add(5);
            vec![]
        }
        KeyCode::PageDown => {
            state.scroll_back = state.scroll_back.saturating_sub(5);
            vec![]
        }
        KeyCode::Backspace => {
            state.input.pop();
            vec![]
        }
        KeyCode::Char(c) if !ctrl => {
            state.input.push(c);
            vec![]
        }
        _ => vec![],
    }
}

pub fn render(
    state: &ChatState,
    sending: bool,
    spinner: &str,
    frame: &mut Frame,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Simulation #{} ", state.session_id));

    let inner_width = chunks[0].width.saturating_sub(2) as usize;
    let inner_height = chunks[0].height.saturating_sub(2) as usize;
    let lines = transcript_lines(state, sending, spinner, inner_width);

    let bottom = lines.len().saturating_sub(inner_height);
    let offset = bottom.saturating_sub(usize::from(state.scroll_back));
    let visible: Vec<Line> = lines.into_iter().skip(offset).take(inner_height).collect();
    frame.render_widget(Paragraph::new(visible).block(block), chunks[0]);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if sending {
            Color::DarkGray
        } else {
            Color::Cyan
        }));
    let input_line = if state.input.is_empty() {
        Line::from(vec![
            Span::styled("█", Style::default().fg(Color::Cyan)),
            Span::styled("Type your response…", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::raw(state.input.as_str()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ])
    };
    frame.render_widget(Paragraph::new(input_line).block(input_block), chunks[1]);

    render_hints(
        frame,
        chunks[2],
        &[
            InputHint::new("Enter", "Send"),
            InputHint::new("^E", "End & Evaluate"),
            InputHint::new("PgUp/PgDn", "Scroll"),
            InputHint::new("Esc", "Dashboard"),
        ],
        Color::Cyan,
    );
}

/// Pre-wrapped transcript lines for `width` columns.
fn transcript_lines(
    state: &ChatState,
    sending: bool,
    spinner: &str,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(error) = &state.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if state.messages.is_empty() && !sending {
        let placeholder = if state.loaded {
            EMPTY_STATE
        } else {
            "Loading conversation…"
        };
        lines.push(Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        )));
    }

    for message in &state.messages {
        let (label_color, body_color) = if message.is_user() {
            (Color::Cyan, Color::White)
        } else {
            (Color::Magenta, Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            speaker_label(message, None).to_string(),
            Style::default().fg(label_color).add_modifier(Modifier::BOLD),
        )));
        for text_line in wrap_text(&sanitize_for_display(&message.content), width) {
            lines.push(Line::from(Span::styled(
                text_line,
                Style::default().fg(body_color),
            )));
        }
        lines.push(Line::default());
    }

    if sending {
        lines.push(Line::from(Span::styled(
            format!("{spinner} typing…"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn blank_input_is_not_sent() {
        let mut state = ChatState::new(3);
        state.input = "   ".to_string();
        assert!(handle_key(&mut state, key(KeyCode::Enter), false).is_empty());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn send_appends_user_message_and_clears_input() {
        let mut state = ChatState::new(3);
        state.scroll_back = 10;
        for c in "Two more weeks".chars() {
            handle_key(&mut state, key(KeyCode::Char(c)), false);
        }
        let actions = handle_key(&mut state, key(KeyCode::Enter), false);
        assert_eq!(
            actions,
            vec![PageAction::SendMessage {
                session_id: 3,
                text: "Two more weeks".to_string()
            }]
        );
        assert_eq!(state.input, "");
        assert_eq!(state.messages, vec![Message::user("Two more weeks")]);
        assert_eq!(state.scroll_back, 0);
    }

    #[test]
    fn send_trims_surrounding_whitespace() {
        let mut state = ChatState::new(3);
        state.input = "  Budget is fixed.\n".to_string();
        let actions = handle_key(&mut state, key(KeyCode::Enter), false);
        assert_eq!(
            actions,
            vec![PageAction::SendMessage {
                session_id: 3,
                text: "Budget is fixed.".to_string()
            }]
        );
        assert_eq!(state.messages, vec![Message::user("Budget is fixed.")]);
    }

    #[test]
    fn send_ignored_while_reply_pending() {
        let mut state = ChatState::new(3);
        state.input = "hello".to_string();
        assert!(handle_key(&mut state, key(KeyCode::Enter), true).is_empty());
        assert_eq!(state.input, "hello");
        assert!(state.messages.is_empty());
    }

    #[test]
    fn end_session_asks_for_confirmation() {
        let mut state = ChatState::new(8);
        let actions = handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL),
            false,
        );
        assert_eq!(actions, vec![PageAction::OpenModal(ModalState::confirm_end(8))]);
    }
}
