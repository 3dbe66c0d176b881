//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! Spawned handlers send their `UiEvent` to `inbox_tx`; the runtime drains
//! `inbox_rx` each loop iteration.

mod handlers;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use perspectiq_core::api::ApiClient;
use perspectiq_core::auth::CredentialStore;
use perspectiq_core::config::Config;
use perspectiq_core::generation::Generator;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::common::{TaskCompleted, TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::route::Route;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Target frame interval while something is happening.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll interval when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal, the state, and the backend clients. The terminal is
/// restored on drop.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    client: ApiClient,
    generator: Generator,
    store: CredentialStore,
    start_route: Route,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Creates the runtime and enters the alternate screen.
    ///
    /// # Errors
    /// Returns an error if the backend URL is invalid or the terminal cannot
    /// be set up.
    pub fn new(config: &Config, api_url_override: Option<&str>, start_route: Route) -> Result<Self> {
        let store = CredentialStore::default();
        let credentials = store.load().unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable credentials: {e:#}");
            Default::default()
        });
        let client = ApiClient::from_config(config, &credentials, api_url_override)?;
        let generator = Generator::new(&config.generation, config.request_timeout());
        let state = AppState::new(credentials, client.base_url());

        // Panic hook first so a failed setup still restores the terminal.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            client,
            generator,
            store,
            start_route,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the main event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal events fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let effects = update::init(&mut self.state, self.start_route);
        self.execute_effects(effects);
        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let mut events = self.collect_events()?;

            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                if !matches!(&event, UiEvent::Frame { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty && !self.state.tui.should_quit {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if self.state.tui.tasks.is_any_running() || recent_terminal_activity {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a fire-and-forget handler whose event goes straight to the inbox.
    fn spawn_effect<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await);
        });
    }

    /// Spawns a handler whose event is wrapped in `TaskCompleted` for `id`.
    fn spawn_task<Fut>(&self, kind: TaskKind, id: TaskId, fut: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let completed = TaskCompleted {
                id,
                result: Box::new(fut.await),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        let client = self.client.clone();
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }

            // Credentials
            UiEffect::PersistCredentials { credentials } => {
                if let Err(e) = self.store.save(&credentials) {
                    tracing::warn!("failed to save credentials: {e:#}");
                }
                self.client = self.client.with_token(credentials.token);
            }
            UiEffect::ClearCredentials => {
                if let Err(e) = self.store.clear() {
                    tracing::warn!("failed to clear credentials: {e:#}");
                }
                self.client = self.client.with_token(None);
            }
            UiEffect::FetchProfile { task } => {
                self.spawn_task(TaskKind::Profile, task, handlers::fetch_profile(client));
            }
            UiEffect::Login { task, request } => {
                self.spawn_task(TaskKind::Login, task, handlers::login(client, request));
            }

            // Dashboard
            UiEffect::LoadHistory { task } => {
                self.spawn_task(TaskKind::History, task, handlers::load_history(client));
            }
            UiEffect::DeleteSession { task, session_id } => {
                self.spawn_task(
                    TaskKind::DeleteSession,
                    task,
                    handlers::delete_session(client, session_id),
                );
            }

            // Wizard
            UiEffect::LoadPersonas { task } => {
                self.spawn_task(TaskKind::Personas, task, handlers::load_personas(client));
            }
            UiEffect::GenerateScenario {
                task,
                role,
                difficulty,
            } => {
                let generator = self.generator.clone();
                self.spawn_task(
                    TaskKind::GenerateScenario,
                    task,
                    handlers::generate_scenario(generator, role, difficulty),
                );
            }
            UiEffect::StartSession { task, request } => {
                self.spawn_task(
                    TaskKind::StartSession,
                    task,
                    handlers::start_session(client, request),
                );
            }

            // Chat
            UiEffect::LoadMessages { task, session_id } => {
                self.spawn_task(
                    TaskKind::Messages,
                    task,
                    handlers::load_messages(client, session_id),
                );
            }
            UiEffect::SendMessage {
                task,
                session_id,
                message,
            } => {
                self.spawn_task(
                    TaskKind::SendMessage,
                    task,
                    handlers::send_message(client, session_id, message),
                );
            }
            UiEffect::EndSession { task, session_id } => {
                self.spawn_task(
                    TaskKind::EndSession,
                    task,
                    handlers::end_session(client, session_id),
                );
            }

            // Summary
            UiEffect::LoadSummary { task, session_id } => {
                self.spawn_task(
                    TaskKind::SummaryLoad,
                    task,
                    handlers::load_summary(client, session_id),
                );
            }
            UiEffect::GenerateSummary {
                task,
                session_id,
                transcript,
            } => {
                let generator = self.generator.clone();
                self.spawn_task(
                    TaskKind::SummaryGenerate,
                    task,
                    handlers::generate_summary(generator, session_id, transcript),
                );
            }
            UiEffect::SaveSummary {
                session_id,
                summary,
                evaluation,
            } => {
                self.spawn_effect(handlers::save_summary(client, session_id, summary, evaluation));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
