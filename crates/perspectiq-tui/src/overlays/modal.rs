//! Alert and confirmation modal.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::render_utils::{InputHint, render_overlay};

/// Action run when a confirmation modal is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteSession(i64),
    EndSession(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKind {
    Alert,
    Confirm {
        action: ConfirmAction,
        confirm_label: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub title: String,
    pub body: String,
    pub kind: ModalKind,
    /// Set while the confirmed action's request is in flight.
    pub busy: bool,
}

/// Result of a key press on the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    Stay,
    Close,
    Confirm(ConfirmAction),
}

impl ModalState {
    pub fn alert(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: ModalKind::Alert,
            busy: false,
        }
    }

    pub fn confirm_delete(session_id: i64) -> Self {
        Self {
            title: "Delete Simulation".to_string(),
            body: "This action cannot be undone. This will permanently delete the chat \
                   history and its evaluation."
                .to_string(),
            kind: ModalKind::Confirm {
                action: ConfirmAction::DeleteSession(session_id),
                confirm_label: "Delete Permanently",
            },
            busy: false,
        }
    }

    pub fn confirm_end(session_id: i64) -> Self {
        Self {
            title: "End Simulation".to_string(),
            body: "Are you sure you want to end this session? You will receive a detailed \
                   performance evaluation."
                .to_string(),
            kind: ModalKind::Confirm {
                action: ConfirmAction::EndSession(session_id),
                confirm_label: "End & Evaluate",
            },
            busy: false,
        }
    }

    /// Alerts close on Enter or Esc. Confirmations run on Enter/`y` and
    /// cancel on Esc/`n`. Keys are ignored while busy.
    pub fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome {
        if self.busy {
            return ModalOutcome::Stay;
        }
        match &self.kind {
            ModalKind::Alert => match key.code {
                KeyCode::Enter | KeyCode::Esc => ModalOutcome::Close,
                _ => ModalOutcome::Stay,
            },
            ModalKind::Confirm { action, .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('y' | 'Y') => {
                    self.busy = true;
                    ModalOutcome::Confirm(*action)
                }
                KeyCode::Esc | KeyCode::Char('n' | 'N') => ModalOutcome::Close,
                _ => ModalOutcome::Stay,
            },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (color, hints) = match &self.kind {
            ModalKind::Alert => (Color::Yellow, vec![InputHint::new("Enter", "Close")]),
            ModalKind::Confirm { .. } if self.busy => {
                (Color::Red, vec![InputHint::new("…", "Working")])
            }
            ModalKind::Confirm { confirm_label, .. } => (
                Color::Red,
                vec![
                    InputHint::new("Esc", "Cancel"),
                    InputHint::new("Enter", confirm_label),
                ],
            ),
        };

        let layout = render_overlay(frame, area, &self.title, color, (60, 9), &hints);
        let body = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                self.body.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(body, layout.body);
    }
}
