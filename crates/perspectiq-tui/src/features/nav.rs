//! Navigation header and global shortcuts.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use perspectiq_core::auth::Credentials;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::PageAction;
use crate::route::Route;

pub const BRAND: &str = "PerspectiQ";
pub const HEADER_HEIGHT: u16 = 2;

/// Shortcuts available on every screen.
///
/// Returns `None` when the key is left to the active screen.
pub fn handle_global_key(key: KeyEvent, authenticated: bool) -> Option<Vec<PageAction>> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('c') => Some(vec![PageAction::Quit]),
        KeyCode::Char('d') => Some(vec![PageAction::Navigate(Route::Dashboard)]),
        KeyCode::Char('n') if authenticated => Some(vec![PageAction::Navigate(Route::Setup)]),
        KeyCode::Char('l') if authenticated => Some(vec![PageAction::Logout]),
        _ => None,
    }
}

pub fn render_header(credentials: &Credentials, route: Route, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BRAND.len() as u16 + 2), Constraint::Min(0)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            BRAND,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    let key_style = Style::default().fg(Color::Cyan);
    let mut spans = Vec::new();
    if credentials.is_authenticated() {
        let active = |r: Route| {
            if route == r {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            }
        };
        spans.push(Span::styled("^D ", key_style));
        spans.push(Span::styled("Dashboard", active(Route::Dashboard)));
        spans.push(Span::raw("  "));
        spans.push(Span::styled("^N ", key_style));
        spans.push(Span::styled("New Simulation", active(Route::Setup)));
        if let Some(name) = credentials.display_name() {
            spans.push(Span::raw("  │  "));
            spans.push(Span::styled(name, Style::default().fg(Color::White)));
        }
        spans.push(Span::raw("  "));
        spans.push(Span::styled("^L ", key_style));
        spans.push(Span::styled("Log out", Style::default().fg(Color::Gray)));
    } else {
        spans.push(Span::styled("^D ", key_style));
        spans.push(Span::styled(
            "Enter Simulation",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn plain_keys_are_left_to_screens() {
        let key = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        assert_eq!(handle_global_key(key, true), None);
    }

    #[test]
    fn ctrl_c_always_quits() {
        assert_eq!(handle_global_key(ctrl('c'), false), Some(vec![PageAction::Quit]));
        assert_eq!(handle_global_key(ctrl('c'), true), Some(vec![PageAction::Quit]));
    }

    #[test]
    fn signed_in_shortcuts() {
        assert_eq!(
            handle_global_key(ctrl('n'), true),
            Some(vec![PageAction::Navigate(Route::Setup)])
        );
        assert_eq!(handle_global_key(ctrl('l'), true), Some(vec![PageAction::Logout]));
        assert_eq!(handle_global_key(ctrl('l'), false), None);
        assert_eq!(
            handle_global_key(ctrl('d'), false),
            Some(vec![PageAction::Navigate(Route::Dashboard)])
        );
    }
}
