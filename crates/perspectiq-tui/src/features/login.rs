//! Login form: username, role, optional age.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use perspectiq_core::api::LoginRequest;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::PageAction;
use crate::overlays::render_utils::{InputHint, InputLine, render_hints, render_input_line};
use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Role,
    Age,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Role,
            LoginField::Role => LoginField::Age,
            LoginField::Age => LoginField::Username,
        }
    }

    fn prev(self) -> Self {
        match self {
            LoginField::Username => LoginField::Age,
            LoginField::Role => LoginField::Username,
            LoginField::Age => LoginField::Role,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub username: String,
    pub role: String,
    pub age: String,
    pub focus: LoginField,
    pub error: Option<String>,
}

impl LoginState {
    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Role => &mut self.role,
            LoginField::Age => &mut self.age,
        }
    }

    /// Validates the form and builds the request.
    ///
    /// Fields are trimmed; a blank or non-numeric age is omitted.
    pub fn build_request(&self) -> Result<LoginRequest, &'static str> {
        let username = self.username.trim();
        let role = self.role.trim();
        if username.is_empty() {
            return Err("Username is required.");
        }
        if role.is_empty() {
            return Err("Role is required.");
        }
        Ok(LoginRequest {
            username: username.to_string(),
            role: role.to_string(),
            age: self.age.trim().parse().ok(),
        })
    }
}

/// Handles a key on the login screen. `loading` is true while a login
/// request is in flight; submits are ignored then.
pub fn handle_key(state: &mut LoginState, key: KeyEvent, loading: bool) -> Vec<PageAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => vec![PageAction::Navigate(Route::Landing)],
        KeyCode::Tab | KeyCode::Down => {
            state.focus = state.focus.next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            state.focus = state.focus.prev();
            vec![]
        }
        KeyCode::Enter => {
            if loading {
                return vec![];
            }
            match state.build_request() {
                Ok(request) => {
                    state.error = None;
                    vec![PageAction::SubmitLogin(request)]
                }
                Err(message) => {
                    state.error = Some(message.to_string());
                    vec![]
                }
            }
        }
        KeyCode::Backspace => {
            state.field_mut().pop();
            vec![]
        }
        KeyCode::Char(c) if !ctrl => {
            if state.focus == LoginField::Age && !c.is_ascii_digit() {
                return vec![];
            }
            state.error = None;
            state.field_mut().push(c);
            vec![]
        }
        _ => vec![],
    }
}

pub fn render(state: &LoginState, loading: bool, frame: &mut Frame, area: Rect) {
    let width = area.width.min(64);
    let form_area = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + 1,
        width,
        area.height.saturating_sub(1).min(14),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Access Terminal ",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("Enter your credentials to begin simulation.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        rows[0],
    );

    let fields = [
        ("Username", &state.username, None, LoginField::Username, rows[1]),
        ("Role", &state.role, Some("e.g. Product Manager"), LoginField::Role, rows[3]),
        ("Age", &state.age, Some("optional"), LoginField::Age, rows[5]),
    ];
    for (label, value, placeholder, field, row) in fields {
        render_input_line(
            frame,
            row,
            &InputLine {
                label,
                value,
                placeholder,
                focused: state.focus == field,
            },
        );
    }

    let status = if loading {
        Line::from(Span::styled("Connecting…", Style::default().fg(Color::Yellow)))
    } else if let Some(error) = &state.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
    } else {
        Line::default()
    };
    frame.render_widget(Paragraph::new(status).alignment(Alignment::Center), rows[6]);

    render_hints(
        frame,
        rows[7],
        &[
            InputHint::new("Tab", "Next field"),
            InputHint::new("Enter", "Log in"),
            InputHint::new("Esc", "Back"),
        ],
        Color::Cyan,
    );
}
