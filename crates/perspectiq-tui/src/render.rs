//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::TaskKind;
use crate::common::text::truncate_with_ellipsis;
use crate::features::{chat, dashboard, landing, login, nav, summary, wizard};
use crate::route::Route;
use crate::state::{AppState, TuiState};

/// Height of the status line at the bottom.
const STATUS_HEIGHT: u16 = 1;

/// Horizontal padding around page content.
const PAGE_MARGIN: u16 = 1;

/// Spinner frames for status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Ticks per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 2;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(nav::HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    nav::render_header(&state.credentials, state.route, frame, chunks[0]);

    let page = Rect {
        x: chunks[1].x + PAGE_MARGIN,
        width: chunks[1].width.saturating_sub(PAGE_MARGIN * 2),
        ..chunks[1]
    };
    render_page(state, frame, page);

    render_status_line(state, frame, chunks[2]);

    if let Some(overlay) = &app.overlay {
        overlay.render(frame, area);
    }
}

fn render_page(state: &TuiState, frame: &mut Frame, area: Rect) {
    let running = |kind| state.tasks.state(kind).is_running();
    match state.route {
        Route::Landing => landing::render(frame, area),
        Route::Login => login::render(&state.login, running(TaskKind::Login), frame, area),
        Route::Dashboard => dashboard::render(
            &state.dashboard,
            state.credentials.username.as_deref(),
            running(TaskKind::History),
            frame,
            area,
        ),
        Route::Setup => wizard::render(
            &state.wizard,
            state.wizard_busy(),
            running(TaskKind::Personas),
            frame,
            area,
        ),
        Route::Chat(_) => chat::render(
            &state.chat,
            running(TaskKind::SendMessage),
            spinner(state),
            frame,
            area,
        ),
        Route::Summary(_) => summary::render(
            &state.summary,
            running(TaskKind::SummaryGenerate),
            frame,
            area,
        ),
    }
}

fn spinner(state: &TuiState) -> &'static str {
    let idx = (state.spinner_frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}

fn render_status_line(state: &TuiState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut left = vec![Span::styled(
        format!(" {} ", state.route.title()),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];
    if state.tasks.is_any_running() {
        left.push(Span::styled(
            format!(" {} working", spinner(state)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(left)), chunks[0]);

    let right = format!("{}  {}", state.route, state.api_base_url);
    let right = truncate_with_ellipsis(&right, chunks[1].width.saturating_sub(1) as usize);
    frame.render_widget(
        Paragraph::new(right)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[1],
    );
}
