use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::common::truncate_with_ellipsis;

/// Calculates a centered area of at most `width` x `height` inside `area`.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));

    let overlay_x = area.x + (area.width.saturating_sub(width)) / 2;
    let overlay_y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(overlay_x, overlay_y, width, height)
}

/// Renders the base container for an overlay (clears background, draws border and title).
pub fn render_overlay_container(frame: &mut Frame, area: Rect, title: &str, border_color: Color) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);
}

/// Layout rectangles for an overlay.
pub struct OverlayLayout {
    pub popup: Rect,
    pub body: Rect,
    pub footer: Rect,
}

/// Render a standard overlay container and return its layout.
pub fn render_overlay(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
    size: (u16, u16),
    hints: &[InputHint<'_>],
) -> OverlayLayout {
    let popup = calculate_overlay_area(area, size.0, size.1);
    render_overlay_container(frame, popup, title, border_color);

    let inner = Rect::new(
        popup.x + 1,
        popup.y + 1,
        popup.width.saturating_sub(2),
        popup.height.saturating_sub(2),
    );

    if !hints.is_empty() {
        render_hints(frame, inner, hints, border_color);
    }

    let footer_height = u16::from(!hints.is_empty());
    let body_height = inner.height.saturating_sub(footer_height);
    let footer = Rect::new(inner.x, inner.y + body_height, inner.width, footer_height);
    let body = Rect::new(inner.x, inner.y, inner.width, body_height);

    OverlayLayout {
        popup,
        body,
        footer,
    }
}

/// Helper struct for keyboard hints.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// A labelled single-line text field.
pub struct InputLine<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub placeholder: Option<&'a str>,
    pub focused: bool,
}

/// Renders `label: value█`, dimming the placeholder when the value is empty.
pub fn render_input_line(frame: &mut Frame, area: Rect, input: &InputLine<'_>) {
    let label_color = if input.focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let prompt = format!("{:<10} ", input.label);
    let max_text_width = (area.width as usize).saturating_sub(prompt.len() + 1);

    let mut spans = vec![Span::styled(prompt, Style::default().fg(label_color))];
    match (input.value.is_empty(), input.placeholder) {
        (true, Some(placeholder)) => {
            if input.focused {
                spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
            }
            spans.push(Span::styled(
                truncate_with_ellipsis(placeholder, max_text_width),
                Style::default().fg(Color::DarkGray),
            ));
        }
        _ => {
            let shown = tail_to_width(input.value, max_text_width);
            spans.push(Span::styled(shown, Style::default().fg(Color::White)));
            if input.focused {
                spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
            }
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Keeps the end of `value` visible while typing past the field width.
fn tail_to_width(value: &str, max_width: usize) -> String {
    let count = value.chars().count();
    if count <= max_width {
        return value.to_string();
    }
    let skip = count - max_width.saturating_sub(1);
    let mut shown = String::from("…");
    shown.extend(value.chars().skip(skip));
    shown
}

/// Renders a line of keyboard hints at the bottom of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    let hints_y = area.y + area.height.saturating_sub(1);
    let hints_area = Rect::new(area.x, hints_y, area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(highlight_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_area_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = calculate_overlay_area(area, 60, 10);
        assert_eq!(popup, Rect::new(20, 15, 60, 10));

        let small = Rect::new(0, 0, 30, 8);
        let popup = calculate_overlay_area(small, 60, 10);
        assert_eq!(popup.width, 26);
        assert_eq!(popup.height, 6);
    }

    #[test]
    fn tail_keeps_end_of_long_input() {
        assert_eq!(tail_to_width("abc", 5), "abc");
        assert_eq!(tail_to_width("abcdefgh", 5), "…efgh");
    }
}
