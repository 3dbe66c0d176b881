//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── route, credentials
//! │   ├── login / dashboard / wizard / chat / summary (per-screen state)
//! │   ├── task_seq: TaskSeq (async task id generator)
//! │   └── tasks: Tasks (task lifecycle state)
//! └── overlay: Option<Overlay>   (modal)
//! ```
//!
//! Keeping the overlay outside `TuiState` lets the reducer hold `&mut` to
//! both at once.

use perspectiq_core::auth::Credentials;

use crate::common::{TaskKind, TaskSeq, Tasks};
use crate::features::chat::ChatState;
use crate::features::dashboard::DashboardState;
use crate::features::login::LoginState;
use crate::features::summary::SummaryState;
use crate::features::wizard::{WizardBusy, WizardState};
use crate::overlays::Overlay;
use crate::route::Route;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(credentials: Credentials, api_base_url: impl Into<String>) -> Self {
        Self {
            tui: TuiState::new(credentials, api_base_url.into()),
            overlay: None,
        }
    }
}

/// Non-overlay UI state.
pub struct TuiState {
    pub should_quit: bool,
    pub route: Route,
    pub credentials: Credentials,
    pub login: LoginState,
    pub dashboard: DashboardState,
    pub wizard: WizardState,
    pub chat: ChatState,
    pub summary: SummaryState,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Backend shown in the status line.
    pub api_base_url: String,
    /// Last known terminal size.
    pub terminal_size: (u16, u16),
}

impl TuiState {
    pub fn new(credentials: Credentials, api_base_url: String) -> Self {
        Self {
            should_quit: false,
            route: Route::Landing,
            credentials,
            login: LoginState::default(),
            dashboard: DashboardState::default(),
            wizard: WizardState::default(),
            chat: ChatState::default(),
            summary: SummaryState::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
            api_base_url,
            terminal_size: (0, 0),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    pub fn wizard_busy(&self) -> WizardBusy {
        WizardBusy {
            generating: self.tasks.state(TaskKind::GenerateScenario).is_running(),
            starting: self.tasks.state(TaskKind::StartSession).is_running(),
        }
    }
}
