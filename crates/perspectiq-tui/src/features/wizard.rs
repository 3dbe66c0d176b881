//! Session setup wizard.
//!
//! Step 1 picks the opponent persona, step 2 sets the scenario (typed or
//! generated), step 3 tunes frustration, goals, and hidden motivations.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use perspectiq_core::api::{Persona, PersonaConfig, StartSessionRequest};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap};

use super::PageAction;
use crate::overlays::ModalState;
use crate::overlays::render_utils::{InputHint, InputLine, render_hints, render_input_line};
use crate::route::Route;

pub const STEP_COUNT: u8 = 3;
pub const DEFAULT_FRUSTRATION_TENTHS: u8 = 5;
pub const SCENARIO_DIFFICULTY: &str = "Hard";

const STEP_TITLES: [&str; 3] = ["Select Opponent", "Scenario Setup", "Fine-tuning"];
const STEP_SUBTITLES: [&str; 3] = [
    "Select the persona you want to challenge today.",
    "Define the situation or let AI generate a challenging one.",
    "Tune the difficulty and hidden agendas.",
];

/// Frustration band shown next to the intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityBand {
    Calm,
    Annoyed,
    Furious,
}

impl IntensityBand {
    pub fn for_level(frustration: f64) -> Self {
        if frustration < 0.4 {
            IntensityBand::Calm
        } else if frustration < 0.7 {
            IntensityBand::Annoyed
        } else {
            IntensityBand::Furious
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IntensityBand::Calm => "Calm",
            IntensityBand::Annoyed => "Annoyed",
            IntensityBand::Furious => "Furious",
        }
    }

    pub fn color(self) -> Color {
        match self {
            IntensityBand::Calm => Color::Green,
            IntensityBand::Annoyed => Color::Yellow,
            IntensityBand::Furious => Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TuningField {
    #[default]
    Frustration,
    Goals,
    Motivations,
}

impl TuningField {
    fn next(self) -> Self {
        match self {
            TuningField::Frustration => TuningField::Goals,
            TuningField::Goals => TuningField::Motivations,
            TuningField::Motivations => TuningField::Frustration,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WizardState {
    /// 1-based step.
    pub step: u8,
    pub personas: BTreeMap<String, Persona>,
    pub personas_loaded: bool,
    pub error: Option<String>,
    /// Cursor in the persona list.
    pub cursor: usize,
    /// Key of the chosen persona.
    pub selected: Option<String>,
    pub scenario: String,
    /// Frustration in tenths (0..=10).
    pub frustration_tenths: u8,
    pub goals: String,
    pub motivations: String,
    pub focus: TuningField,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: 1,
            personas: BTreeMap::new(),
            personas_loaded: false,
            error: None,
            cursor: 0,
            selected: None,
            scenario: String::new(),
            frustration_tenths: DEFAULT_FRUSTRATION_TENTHS,
            goals: String::new(),
            motivations: String::new(),
            focus: TuningField::default(),
        }
    }
}

impl WizardState {
    pub fn set_personas(&mut self, personas: BTreeMap<String, Persona>) {
        self.personas = personas;
        self.personas_loaded = true;
        self.error = None;
        self.cursor = self.cursor.min(self.personas.len().saturating_sub(1));
    }

    pub fn selected_persona(&self) -> Option<&Persona> {
        self.selected.as_ref().and_then(|k| self.personas.get(k))
    }

    fn key_at_cursor(&self) -> Option<&String> {
        self.personas.keys().nth(self.cursor)
    }

    pub fn can_proceed(&self) -> bool {
        match self.step {
            1 => self.selected.is_some(),
            2 => !self.scenario.trim().is_empty(),
            _ => true,
        }
    }

    pub fn next_step(&mut self) -> bool {
        if self.step < STEP_COUNT && self.can_proceed() {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) -> bool {
        if self.step > 1 {
            self.step -= 1;
            true
        } else {
            false
        }
    }

    pub fn frustration(&self) -> f64 {
        f64::from(self.frustration_tenths) / 10.0
    }

    pub fn adjust_frustration(&mut self, delta: i8) {
        let level = i16::from(self.frustration_tenths) + i16::from(delta);
        self.frustration_tenths = level.clamp(0, 10) as u8;
    }

    /// `"<pct>% Intensity"`.
    pub fn intensity_label(&self) -> String {
        format!("{}% Intensity", u32::from(self.frustration_tenths) * 10)
    }

    /// Start request for the selected persona, if one is selected.
    pub fn build_request(&self) -> Option<StartSessionRequest> {
        let key = self.selected.as_deref()?;
        Some(StartSessionRequest::single(
            self.scenario.trim(),
            key,
            PersonaConfig {
                frustration: self.frustration(),
                goals: self.goals.trim().to_string(),
                motivations: self.motivations.trim().to_string(),
            },
        ))
    }

    /// Scenario generation request, or the alert shown without a persona.
    pub fn generate_action(&self) -> PageAction {
        match self.selected_persona() {
            Some(persona) => PageAction::GenerateScenario {
                role: persona.role.clone(),
            },
            None => PageAction::OpenModal(ModalState::alert(
                "Attention",
                "Please select a persona first before generating a scenario.",
            )),
        }
    }
}

/// Flags describing in-flight wizard requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WizardBusy {
    pub generating: bool,
    pub starting: bool,
}

pub fn handle_key(state: &mut WizardState, key: KeyEvent, busy: WizardBusy) -> Vec<PageAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if key.code == KeyCode::Esc {
        if !state.back() {
            return vec![PageAction::Navigate(Route::Dashboard)];
        }
        return vec![];
    }

    match state.step {
        1 => handle_select_key(state, key),
        2 => match key.code {
            KeyCode::Char('g') if ctrl => {
                if busy.generating {
                    vec![]
                } else {
                    vec![state.generate_action()]
                }
            }
            KeyCode::Enter => {
                state.next_step();
                vec![]
            }
            KeyCode::Backspace => {
                state.scenario.pop();
                vec![]
            }
            KeyCode::Char(c) if !ctrl && !busy.generating => {
                state.scenario.push(c);
                vec![]
            }
            _ => vec![],
        },
        _ => handle_tuning_key(state, key, ctrl, busy.starting),
    }
}

fn handle_select_key(state: &mut WizardState, key: KeyEvent) -> Vec<PageAction> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.cursor = state.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.cursor + 1 < state.personas.len() {
                state.cursor += 1;
            }
        }
        KeyCode::Char(' ') => {
            state.selected = state.key_at_cursor().cloned();
        }
        KeyCode::Enter => {
            if let Some(key) = state.key_at_cursor().cloned() {
                state.selected = Some(key);
            }
            state.next_step();
        }
        _ => {}
    }
    vec![]
}

fn handle_tuning_key(
    state: &mut WizardState,
    key: KeyEvent,
    ctrl: bool,
    starting: bool,
) -> Vec<PageAction> {
    match key.code {
        KeyCode::Tab | KeyCode::Down => state.focus = state.focus.next(),
        KeyCode::Left if state.focus == TuningField::Frustration => state.adjust_frustration(-1),
        KeyCode::Right if state.focus == TuningField::Frustration => state.adjust_frustration(1),
        KeyCode::Enter => {
            if starting {
                return vec![];
            }
            return state
                .build_request()
                .map(|request| vec![PageAction::StartSession(request)])
                .unwrap_or_default();
        }
        KeyCode::Backspace => match state.focus {
            TuningField::Goals => {
                state.goals.pop();
            }
            TuningField::Motivations => {
                state.motivations.pop();
            }
            TuningField::Frustration => {}
        },
        KeyCode::Char(c) if !ctrl => match state.focus {
            TuningField::Goals => state.goals.push(c),
            TuningField::Motivations => state.motivations.push(c),
            TuningField::Frustration => {}
        },
        _ => {}
    }
    vec![]
}

pub fn render(state: &WizardState, busy: WizardBusy, loading: bool, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let index = usize::from(state.step.clamp(1, STEP_COUNT) - 1);
    let mut steps = Vec::new();
    for (i, title) in STEP_TITLES.iter().enumerate() {
        if i > 0 {
            steps.push(Span::styled("  ›  ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == index {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        steps.push(Span::styled(format!("{}. {title}", i + 1), style));
    }
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(steps),
            Line::from(Span::styled(
                STEP_SUBTITLES[index],
                Style::default().fg(Color::Gray),
            )),
        ]),
        chunks[0],
    );

    match state.step {
        1 => render_select(state, loading, frame, chunks[1]),
        2 => render_scenario(state, busy.generating, frame, chunks[1]),
        _ => render_tuning(state, busy.starting, frame, chunks[1]),
    }

    let hints = match state.step {
        1 => vec![
            InputHint::new("↑↓", "Move"),
            InputHint::new("Space", "Select"),
            InputHint::new("Enter", "Next"),
            InputHint::new("Esc", "Dashboard"),
        ],
        2 => vec![
            InputHint::new("^G", "Generate with AI"),
            InputHint::new("Enter", "Next"),
            InputHint::new("Esc", "Back"),
        ],
        _ => vec![
            InputHint::new("Tab", "Next field"),
            InputHint::new("←→", "Frustration"),
            InputHint::new("Enter", "Start Simulation"),
            InputHint::new("Esc", "Back"),
        ],
    };
    render_hints(frame, chunks[2], &hints, Color::Cyan);
}

fn render_select(state: &WizardState, loading: bool, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Who are you speaking with? ");

    if let Some(error) = &state.error {
        frame.render_widget(
            Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block),
            area,
        );
        return;
    }
    if loading && !state.personas_loaded {
        frame.render_widget(
            Paragraph::new("Loading personas…")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .personas
        .iter()
        .map(|(key, persona)| {
            let chosen = state.selected.as_deref() == Some(key.as_str());
            let marker = if chosen { "● " } else { "○ " };
            let mut lines = vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::styled(
                        persona.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", persona.role),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", persona.description),
                    Style::default().fg(Color::Gray),
                )),
            ];
            if !persona.traits.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", persona.traits.join(" · ")),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));
    let mut list_state = ListState::default().with_selected(Some(state.cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_scenario(state: &WizardState, generating: bool, frame: &mut Frame, area: Rect) {
    let title = match state.selected_persona() {
        Some(persona) => format!(" Set the context · {} ", persona.name),
        None => " Set the context ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let body = if generating {
        vec![Line::from(Span::styled(
            "Generating scenario…",
            Style::default().fg(Color::Yellow),
        ))]
    } else if state.scenario.is_empty() {
        vec![
            Line::from(Span::styled("█", Style::default().fg(Color::Cyan))),
            Line::default(),
            Line::from(Span::styled(
                "Tip: Use the AI generator to create complex, realistic scenarios based \
                 on the selected persona's role.",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        vec![Line::from(vec![
            Span::raw(state.scenario.clone()),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ])]
    };
    frame.render_widget(
        Paragraph::new(body).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_tuning(state: &WizardState, starting: bool, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Behavioral Settings ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let band = IntensityBand::for_level(state.frustration());
    let label_color = if state.focus == TuningField::Frustration {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Frustration Level  ", Style::default().fg(label_color)),
            Span::styled(
                state.intensity_label(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", band.label()),
                Style::default().fg(band.color()),
            ),
        ])),
        rows[0],
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(band.color()))
            .ratio(state.frustration().clamp(0.0, 1.0))
            .label(""),
        rows[1],
    );

    render_input_line(
        frame,
        rows[3],
        &InputLine {
            label: "Goals",
            value: &state.goals,
            placeholder: Some("Specific goals for the counterpart"),
            focused: state.focus == TuningField::Goals,
        },
    );
    render_input_line(
        frame,
        rows[4],
        &InputLine {
            label: "Hidden",
            value: &state.motivations,
            placeholder: Some("Hidden motivations"),
            focused: state.focus == TuningField::Motivations,
        },
    );

    if starting {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Starting simulation…",
                Style::default().fg(Color::Yellow),
            )),
            rows[6],
        );
    }
}
