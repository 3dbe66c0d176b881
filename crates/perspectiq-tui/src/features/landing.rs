//! Landing screen.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::PageAction;
use crate::route::Route;

const FEATURES: [(&str, &str); 3] = [
    (
        "Risk-Free Zone",
        "Test strategies with angry engineers or demanding executives without risking \
         actual professional relationships.",
    ),
    (
        "Deep Personas",
        "Personas have hidden agendas, specific frustration triggers, and unique goals.",
    ),
    (
        "Instant Analysis",
        "Get a detailed evaluation after every session. Understand exactly what worked \
         and how to improve.",
    ),
];

pub fn handle_key(key: KeyEvent) -> Vec<PageAction> {
    match key.code {
        KeyCode::Enter => vec![PageAction::Navigate(Route::Dashboard)],
        KeyCode::Esc | KeyCode::Char('q') => vec![PageAction::Quit],
        _ => vec![],
    }
}

pub fn render(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(area);

    let hero = vec![
        Line::default(),
        Line::from(Span::styled(
            "The Future of Soft Skills Training",
            Style::default().fg(Color::Cyan),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Master the Art of Stakeholder Influence",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "A high-fidelity simulation environment. Practice difficult conversations \
             with realistic AI personas before the stakes get high.",
            Style::default().fg(Color::Gray),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw("  Enter Simulation →"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(hero)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(chunks[1]);
    for ((title, blurb), column) in FEATURES.iter().zip(columns.iter()) {
        let card = Paragraph::new(*blurb)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Gray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(Span::styled(
                        format!(" {title} "),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
            );
        frame.render_widget(card, *column);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    #[test]
    fn enter_goes_to_dashboard() {
        let actions = handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(actions, vec![PageAction::Navigate(Route::Dashboard)]);
    }
}
