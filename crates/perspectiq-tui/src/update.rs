//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use perspectiq_core::auth::Credentials;
use perspectiq_core::transcript::{EVALUATION_PENDING, build_transcript, needs_generated_summary};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::chat::ChatState;
use crate::features::dashboard::DashboardState;
use crate::features::login::LoginState;
use crate::features::summary::SummaryState;
use crate::features::wizard::{SCENARIO_DIFFICULTY, WizardState};
use crate::features::{PageAction, chat, dashboard, landing, login, nav, summary, wizard};
use crate::overlays::{ConfirmAction, ModalOutcome, ModalState, Overlay, OverlayExt};
use crate::route::Route;
use crate::state::AppState;

/// Effects to run once at startup: complete a partial profile, then show
/// `start` (guarded).
pub fn init(app: &mut AppState, start: Route) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    if app.tui.credentials.needs_profile() {
        let task = begin(app, TaskKind::Profile);
        effects.push(UiEffect::FetchProfile { task });
    }
    effects.extend(navigate(app, start));
    effects
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.tui.terminal_size = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskCompleted { kind, completed } => {
            let ok = app.tui.tasks.state_mut(kind).finish_if_active(completed.id);
            if ok {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "dropping stale task result");
                vec![]
            }
        }

        UiEvent::ProfileLoaded(Ok(user)) => {
            app.tui.credentials.apply_profile(&user);
            vec![UiEffect::PersistCredentials {
                credentials: app.tui.credentials.clone(),
            }]
        }
        UiEvent::ProfileLoaded(Err(_)) => {
            let mut effects = logout(app);
            let current = app.tui.route;
            if current.is_protected() {
                effects.extend(navigate(app, current));
            }
            effects
        }
        UiEvent::LoginFinished(Ok(response)) => {
            app.tui.credentials = Credentials::from_login(&response);
            app.tui.login = LoginState::default();
            let mut effects = vec![UiEffect::PersistCredentials {
                credentials: app.tui.credentials.clone(),
            }];
            effects.extend(navigate(app, Route::Dashboard));
            effects
        }
        UiEvent::LoginFinished(Err(message)) => {
            app.tui.login.error = Some(message);
            vec![]
        }

        UiEvent::HistoryLoaded(result) => {
            match result {
                Ok(sessions) => app.tui.dashboard.set_history(sessions),
                Err(message) => {
                    app.tui.dashboard.loaded = true;
                    app.tui.dashboard.error = Some(message);
                }
            }
            vec![]
        }
        UiEvent::SessionDeleted { session_id, result } => {
            match result {
                Ok(()) => {
                    app.tui.dashboard.remove_session(session_id);
                    app.overlay = None;
                }
                Err(message) => open_alert(app, "Error", message),
            }
            vec![]
        }

        UiEvent::PersonasLoaded(result) => {
            match result {
                Ok(personas) => app.tui.wizard.set_personas(personas),
                Err(message) => {
                    app.tui.wizard.personas_loaded = true;
                    app.tui.wizard.error = Some(message);
                }
            }
            vec![]
        }
        UiEvent::ScenarioGenerated(text) => {
            app.tui.wizard.scenario = text;
            vec![]
        }
        UiEvent::SessionStarted(Ok(session_id)) => navigate(app, Route::Chat(session_id)),
        UiEvent::SessionStarted(Err(message)) => {
            open_alert(app, "Error", message);
            vec![]
        }

        UiEvent::MessagesLoaded { session_id, result } => {
            if app.tui.chat.session_id == session_id {
                match result {
                    Ok(messages) => app.tui.chat.set_messages(messages),
                    Err(message) => {
                        app.tui.chat.loaded = true;
                        app.tui.chat.error = Some(message);
                    }
                }
            }
            vec![]
        }
        UiEvent::ReplyReceived { session_id, result } => {
            if app.tui.route != Route::Chat(session_id) {
                return vec![];
            }
            match result {
                Ok(reply) => app.tui.chat.push_message(reply),
                Err(message) => open_alert(app, "Error", message),
            }
            vec![]
        }
        UiEvent::SessionEnded { session_id, result } => match result {
            Ok(()) => {
                app.overlay = None;
                navigate(app, Route::Summary(session_id))
            }
            Err(message) => {
                open_alert(app, "Error", message);
                vec![]
            }
        },

        UiEvent::SummaryLoaded { session_id, result } => {
            if app.tui.summary.session_id != session_id {
                return vec![];
            }
            match result {
                Ok(data) => {
                    let transcript = data
                        .session
                        .as_ref()
                        .filter(|session| needs_generated_summary(session, &data.messages))
                        .map(|_| build_transcript(&data.messages));
                    app.tui.summary.set_data(data);
                    match transcript {
                        Some(transcript) => {
                            let task = begin(app, TaskKind::SummaryGenerate);
                            vec![UiEffect::GenerateSummary {
                                task,
                                session_id,
                                transcript,
                            }]
                        }
                        None => vec![],
                    }
                }
                Err(message) => {
                    app.tui.summary.error = Some(message);
                    vec![]
                }
            }
        }
        UiEvent::SummaryGenerated {
            session_id,
            summary,
        } => {
            if app.tui.summary.session_id != session_id {
                return vec![];
            }
            app.tui.summary.generated = Some(summary.clone());
            vec![UiEffect::SaveSummary {
                session_id,
                summary,
                evaluation: EVALUATION_PENDING.to_string(),
            }]
        }
        UiEvent::SummarySaved { session_id, result } => {
            if let Err(message) = result {
                tracing::warn!(session_id, %message, "summary was not saved");
            }
            vec![]
        }
    }
}

/// Shows `route` (guarded), resetting its screen state and loading its data.
pub fn navigate(app: &mut AppState, route: Route) -> Vec<UiEffect> {
    let route = route.guard(app.tui.is_authenticated());
    tracing::debug!(from = %app.tui.route, to = %route, "navigate");
    app.tui.route = route;

    match route {
        Route::Landing => vec![],
        Route::Login => {
            app.tui.login = LoginState::default();
            vec![]
        }
        Route::Dashboard => {
            app.tui.dashboard = DashboardState::default();
            let task = begin(app, TaskKind::History);
            vec![UiEffect::LoadHistory { task }]
        }
        Route::Setup => {
            app.tui.wizard = WizardState::default();
            app.tui.tasks.generate_scenario.clear();
            app.tui.tasks.start_session.clear();
            let task = begin(app, TaskKind::Personas);
            vec![UiEffect::LoadPersonas { task }]
        }
        Route::Chat(session_id) => {
            app.tui.chat = ChatState::new(session_id);
            app.tui.tasks.send_message.clear();
            let task = begin(app, TaskKind::Messages);
            vec![UiEffect::LoadMessages { task, session_id }]
        }
        Route::Summary(session_id) => {
            app.tui.summary = SummaryState::new(session_id);
            app.tui.tasks.summary_generate.clear();
            let task = begin(app, TaskKind::SummaryLoad);
            vec![UiEffect::LoadSummary { task, session_id }]
        }
    }
}

fn begin(app: &mut AppState, kind: TaskKind) -> crate::common::TaskId {
    app.tui.tasks.begin(&mut app.tui.task_seq, kind)
}

fn open_alert(app: &mut AppState, title: &str, body: String) {
    app.overlay = Some(Overlay::Modal(ModalState::alert(title, body)));
}

fn logout(app: &mut AppState) -> Vec<UiEffect> {
    app.tui.credentials = Credentials::default();
    vec![UiEffect::ClearCredentials]
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => {
            let mut effects = Vec::new();
            for c in text.chars().filter(|c| !c.is_control()) {
                effects.extend(handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
            }
            effects
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return apply_actions(app, vec![PageAction::Quit]);
    }

    if let Some(modal) = app.overlay.modal_mut() {
        return match modal.handle_key(key) {
            ModalOutcome::Stay => vec![],
            ModalOutcome::Close => {
                app.overlay = None;
                vec![]
            }
            ModalOutcome::Confirm(action) => confirm(app, action),
        };
    }

    if let Some(actions) = nav::handle_global_key(key, app.tui.is_authenticated()) {
        return apply_actions(app, actions);
    }

    let tui = &mut app.tui;
    let actions = match tui.route {
        Route::Landing => landing::handle_key(key),
        Route::Login => {
            let loading = tui.tasks.state(TaskKind::Login).is_running();
            login::handle_key(&mut tui.login, key, loading)
        }
        Route::Dashboard => dashboard::handle_key(&mut tui.dashboard, key),
        Route::Setup => {
            let busy = tui.wizard_busy();
            wizard::handle_key(&mut tui.wizard, key, busy)
        }
        Route::Chat(_) => {
            let sending = tui.tasks.state(TaskKind::SendMessage).is_running();
            chat::handle_key(&mut tui.chat, key, sending)
        }
        Route::Summary(_) => summary::handle_key(&mut tui.summary, key),
    };
    apply_actions(app, actions)
}

fn confirm(app: &mut AppState, action: ConfirmAction) -> Vec<UiEffect> {
    match action {
        ConfirmAction::DeleteSession(session_id) => {
            let task = begin(app, TaskKind::DeleteSession);
            vec![UiEffect::DeleteSession { task, session_id }]
        }
        ConfirmAction::EndSession(session_id) => {
            let task = begin(app, TaskKind::EndSession);
            vec![UiEffect::EndSession { task, session_id }]
        }
    }
}

fn apply_actions(app: &mut AppState, actions: Vec<PageAction>) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for action in actions {
        match action {
            PageAction::Navigate(route) => effects.extend(navigate(app, route)),
            PageAction::OpenModal(modal) => app.overlay = Some(Overlay::Modal(modal)),
            PageAction::SubmitLogin(request) => {
                let task = begin(app, TaskKind::Login);
                effects.push(UiEffect::Login { task, request });
            }
            PageAction::ReloadHistory => {
                let task = begin(app, TaskKind::History);
                effects.push(UiEffect::LoadHistory { task });
            }
            PageAction::GenerateScenario { role } => {
                let task = begin(app, TaskKind::GenerateScenario);
                effects.push(UiEffect::GenerateScenario {
                    task,
                    role,
                    difficulty: SCENARIO_DIFFICULTY.to_string(),
                });
            }
            PageAction::StartSession(request) => {
                let task = begin(app, TaskKind::StartSession);
                effects.push(UiEffect::StartSession { task, request });
            }
            PageAction::SendMessage { session_id, text } => {
                let task = begin(app, TaskKind::SendMessage);
                effects.push(UiEffect::SendMessage {
                    task,
                    session_id,
                    message: text,
                });
            }
            PageAction::Logout => {
                effects.extend(logout(app));
                effects.extend(navigate(app, Route::Landing));
            }
            PageAction::Quit => {
                app.tui.should_quit = true;
                effects.push(UiEffect::Quit);
            }
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use perspectiq_core::api::{LoginResponse, Message, Persona, SessionHistoryItem};

    use super::*;
    use crate::common::{TaskCompleted, TaskId};
    use crate::events::SummaryData;
    use crate::overlays::ModalKind;

    fn signed_in() -> AppState {
        AppState::new(
            Credentials {
                token: Some("tok".to_string()),
                user_id: Some(1),
                username: Some("alice".to_string()),
                role: Some("pm".to_string()),
            },
            "http://localhost:8000",
        )
    }

    fn signed_out() -> AppState {
        AppState::new(Credentials::default(), "http://localhost:8000")
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(app, UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))))
    }

    fn ctrl(app: &mut AppState, c: char) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::CONTROL,
            ))),
        )
    }

    fn typing(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn complete(app: &mut AppState, kind: TaskKind, event: UiEvent) -> Vec<UiEffect> {
        let id = app.tui.tasks.state(kind).active.expect("task should be active");
        update(
            app,
            UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id,
                    result: Box::new(event),
                },
            },
        )
    }

    fn history_item(id: i64, summary: Option<&str>) -> SessionHistoryItem {
        SessionHistoryItem {
            id,
            scenario: format!("Scenario {id}"),
            persona: "CFO".to_string(),
            created_at: None,
            summary: summary.map(str::to_string),
            evaluation: None,
            message_count: 1,
        }
    }

    fn persona(role: &str) -> Persona {
        Persona {
            name: "Dana".to_string(),
            description: "Budget owner".to_string(),
            role: role.to_string(),
            traits: vec![],
            default_frustration: None,
        }
    }

    fn modal_body(app: &AppState) -> Option<&str> {
        match &app.overlay {
            Some(Overlay::Modal(modal)) => Some(modal.body.as_str()),
            None => None,
        }
    }

    #[test]
    fn protected_route_redirects_to_login() {
        let mut app = signed_out();
        let effects = init(&mut app, Route::Chat(3));
        assert_eq!(app.tui.route, Route::Login);
        assert!(effects.is_empty());
    }

    #[test]
    fn partial_profile_is_fetched_on_startup() {
        let mut app = AppState::new(
            Credentials {
                token: Some("tok".to_string()),
                ..Credentials::default()
            },
            "http://localhost:8000",
        );
        let effects = init(&mut app, Route::Dashboard);
        assert!(matches!(effects[0], UiEffect::FetchProfile { .. }));
        assert!(matches!(effects[1], UiEffect::LoadHistory { .. }));
        assert_eq!(app.tui.route, Route::Dashboard);
    }

    #[test]
    fn profile_failure_logs_out_and_leaves_protected_route() {
        let mut app = AppState::new(
            Credentials {
                token: Some("tok".to_string()),
                ..Credentials::default()
            },
            "http://localhost:8000",
        );
        init(&mut app, Route::Dashboard);
        let effects = complete(
            &mut app,
            TaskKind::Profile,
            UiEvent::ProfileLoaded(Err("expired".to_string())),
        );
        assert!(matches!(effects[0], UiEffect::ClearCredentials));
        assert!(!app.tui.is_authenticated());
        assert_eq!(app.tui.route, Route::Login);
    }

    #[test]
    fn login_success_persists_and_opens_dashboard() {
        let mut app = signed_out();
        init(&mut app, Route::Login);
        typing(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        typing(&mut app, "pm");
        let effects = press(&mut app, KeyCode::Enter);
        assert!(matches!(effects.as_slice(), [UiEffect::Login { .. }]));

        // A second submit while loading is ignored.
        assert!(press(&mut app, KeyCode::Enter).is_empty());

        let effects = complete(
            &mut app,
            TaskKind::Login,
            UiEvent::LoginFinished(Ok(LoginResponse {
                token: "tok".to_string(),
                user_id: 7,
                username: "alice".to_string(),
                role: "pm".to_string(),
            })),
        );
        assert!(matches!(effects[0], UiEffect::PersistCredentials { .. }));
        assert!(matches!(effects[1], UiEffect::LoadHistory { .. }));
        assert_eq!(app.tui.route, Route::Dashboard);
        assert_eq!(app.tui.credentials.user_id, Some(7));
    }

    #[test]
    fn login_failure_shows_inline_error() {
        let mut app = signed_out();
        init(&mut app, Route::Login);
        typing(&mut app, "alice");
        press(&mut app, KeyCode::Tab);
        typing(&mut app, "pm");
        press(&mut app, KeyCode::Enter);
        complete(
            &mut app,
            TaskKind::Login,
            UiEvent::LoginFinished(Err("Username already taken. Please choose another.".to_string())),
        );
        assert_eq!(app.tui.route, Route::Login);
        assert_eq!(
            app.tui.login.error.as_deref(),
            Some("Username already taken. Please choose another.")
        );
    }

    #[test]
    fn logout_clears_credentials_and_goes_home() {
        let mut app = signed_in();
        init(&mut app, Route::Dashboard);
        let effects = ctrl(&mut app, 'l');
        assert!(matches!(effects.as_slice(), [UiEffect::ClearCredentials]));
        assert_eq!(app.tui.route, Route::Landing);
        assert!(!app.tui.is_authenticated());
    }

    #[test]
    fn confirmed_delete_removes_row_and_closes_modal() {
        let mut app = signed_in();
        init(&mut app, Route::Dashboard);
        complete(
            &mut app,
            TaskKind::History,
            UiEvent::HistoryLoaded(Ok(vec![history_item(1, None), history_item(2, None)])),
        );
        assert_eq!(app.tui.dashboard.sessions[0].id, 2);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.overlay.is_some());
        let effects = press(&mut app, KeyCode::Enter);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::DeleteSession { session_id: 2, .. }]
        ));
        assert!(app.overlay.is_busy_modal());

        complete(
            &mut app,
            TaskKind::DeleteSession,
            UiEvent::SessionDeleted {
                session_id: 2,
                result: Ok(()),
            },
        );
        assert!(app.overlay.is_none());
        let ids: Vec<i64> = app.tui.dashboard.sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn generate_without_persona_alerts() {
        let mut app = signed_in();
        init(&mut app, Route::Setup);
        app.tui.wizard.step = 2;
        let effects = ctrl(&mut app, 'g');
        assert!(effects.is_empty());
        assert_eq!(
            modal_body(&app),
            Some("Please select a persona first before generating a scenario.")
        );
    }

    #[test]
    fn wizard_start_flow_reaches_chat() {
        let mut app = signed_in();
        init(&mut app, Route::Setup);
        complete(
            &mut app,
            TaskKind::Personas,
            UiEvent::PersonasLoaded(Ok(BTreeMap::from([(
                "cfo".to_string(),
                persona("CFO"),
            )]))),
        );
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tui.wizard.step, 2);

        let effects = ctrl(&mut app, 'g');
        match effects.as_slice() {
            [UiEffect::GenerateScenario { role, difficulty, .. }] => {
                assert_eq!(role, "CFO");
                assert_eq!(difficulty, "Hard");
            }
            other => panic!("unexpected effects: {other:?}"),
        }
        complete(
            &mut app,
            TaskKind::GenerateScenario,
            UiEvent::ScenarioGenerated("Cut the budget by 20%.".to_string()),
        );
        assert_eq!(app.tui.wizard.scenario, "Cut the budget by 20%.");

        press(&mut app, KeyCode::Enter);
        let effects = press(&mut app, KeyCode::Enter);
        assert!(matches!(effects.as_slice(), [UiEffect::StartSession { .. }]));

        let effects = complete(&mut app, TaskKind::StartSession, UiEvent::SessionStarted(Ok(12)));
        assert_eq!(app.tui.route, Route::Chat(12));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::LoadMessages { session_id: 12, .. }]
        ));
    }

    #[test]
    fn start_failure_alerts() {
        let mut app = signed_in();
        init(&mut app, Route::Setup);
        app.tui.tasks.begin(&mut app.tui.task_seq, TaskKind::StartSession);
        complete(
            &mut app,
            TaskKind::StartSession,
            UiEvent::SessionStarted(Err("Failed to start session. Please try again.".to_string())),
        );
        assert_eq!(app.tui.route, Route::Setup);
        assert_eq!(modal_body(&app), Some("Failed to start session. Please try again."));
    }

    #[test]
    fn chat_send_appends_reply_and_drops_stale_results() {
        let mut app = signed_in();
        init(&mut app, Route::Chat(5));
        complete(
            &mut app,
            TaskKind::Messages,
            UiEvent::MessagesLoaded {
                session_id: 5,
                result: Ok(vec![]),
            },
        );
        typing(&mut app, "Hello");
        let effects = press(&mut app, KeyCode::Enter);
        let UiEffect::SendMessage { task, message, .. } = &effects[0] else {
            panic!("expected SendMessage, got {effects:?}");
        };
        assert_eq!(message, "Hello");
        let task = *task;
        assert_eq!(app.tui.chat.messages.len(), 1);

        // Results for an id that is not active are ignored.
        update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::SendMessage,
                completed: TaskCompleted {
                    id: TaskId(task.0 + 100),
                    result: Box::new(UiEvent::ReplyReceived {
                        session_id: 5,
                        result: Ok(Message::assistant("stale", None)),
                    }),
                },
            },
        );
        assert_eq!(app.tui.chat.messages.len(), 1);

        complete(
            &mut app,
            TaskKind::SendMessage,
            UiEvent::ReplyReceived {
                session_id: 5,
                result: Ok(Message::assistant("No.", Some("CFO".to_string()))),
            },
        );
        assert_eq!(app.tui.chat.messages.len(), 2);
        assert!(!app.tui.tasks.state(TaskKind::SendMessage).is_running());
    }

    #[test]
    fn end_session_navigates_to_summary() {
        let mut app = signed_in();
        init(&mut app, Route::Chat(5));
        ctrl(&mut app, 'e');
        let effects = press(&mut app, KeyCode::Char('y'));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::EndSession { session_id: 5, .. }]
        ));
        let effects = complete(
            &mut app,
            TaskKind::EndSession,
            UiEvent::SessionEnded {
                session_id: 5,
                result: Ok(()),
            },
        );
        assert!(app.overlay.is_none());
        assert_eq!(app.tui.route, Route::Summary(5));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::LoadSummary { session_id: 5, .. }]
        ));
    }

    #[test]
    fn send_failure_keeps_message_and_alerts() {
        let mut app = signed_in();
        init(&mut app, Route::Chat(5));
        typing(&mut app, "Hello");
        press(&mut app, KeyCode::Enter);

        complete(
            &mut app,
            TaskKind::SendMessage,
            UiEvent::ReplyReceived {
                session_id: 5,
                result: Err("Failed to send message. Please try again.".to_string()),
            },
        );
        assert_eq!(app.tui.chat.messages, vec![Message::user("Hello")]);
        assert_eq!(modal_body(&app), Some("Failed to send message. Please try again."));
        assert!(!app.overlay.is_busy_modal());
        assert!(!app.tui.tasks.state(TaskKind::SendMessage).is_running());
    }

    #[test]
    fn delete_failure_replaces_busy_modal_with_alert() {
        let mut app = signed_in();
        init(&mut app, Route::Dashboard);
        complete(
            &mut app,
            TaskKind::History,
            UiEvent::HistoryLoaded(Ok(vec![history_item(1, None), history_item(2, None)])),
        );
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert!(app.overlay.is_busy_modal());

        complete(
            &mut app,
            TaskKind::DeleteSession,
            UiEvent::SessionDeleted {
                session_id: 2,
                result: Err("Failed to delete session. Please try again.".to_string()),
            },
        );
        assert!(matches!(
            &app.overlay,
            Some(Overlay::Modal(ModalState {
                kind: ModalKind::Alert,
                busy: false,
                ..
            }))
        ));
        assert_eq!(modal_body(&app), Some("Failed to delete session. Please try again."));
        let ids: Vec<i64> = app.tui.dashboard.sessions.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn end_failure_stays_in_chat_with_alert() {
        let mut app = signed_in();
        init(&mut app, Route::Chat(5));
        ctrl(&mut app, 'e');
        press(&mut app, KeyCode::Char('y'));
        assert!(app.overlay.is_busy_modal());

        let effects = complete(
            &mut app,
            TaskKind::EndSession,
            UiEvent::SessionEnded {
                session_id: 5,
                result: Err("Failed to end session. Please try again.".to_string()),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(app.tui.route, Route::Chat(5));
        assert_eq!(modal_body(&app), Some("Failed to end session. Please try again."));
        assert!(!app.overlay.is_busy_modal());
    }

    #[test]
    fn summary_without_stored_text_is_generated_and_saved() {
        let mut app = signed_in();
        init(&mut app, Route::Summary(9));
        let effects = complete(
            &mut app,
            TaskKind::SummaryLoad,
            UiEvent::SummaryLoaded {
                session_id: 9,
                result: Ok(SummaryData {
                    session: Some(history_item(9, None)),
                    messages: vec![Message::user("We need more time.")],
                }),
            },
        );
        match effects.as_slice() {
            [UiEffect::GenerateSummary { transcript, .. }] => {
                assert_eq!(transcript, "user: We need more time.");
            }
            other => panic!("unexpected effects: {other:?}"),
        }

        let effects = complete(
            &mut app,
            TaskKind::SummaryGenerate,
            UiEvent::SummaryGenerated {
                session_id: 9,
                summary: "Extension granted.".to_string(),
            },
        );
        match effects.as_slice() {
            [UiEffect::SaveSummary {
                session_id,
                summary,
                evaluation,
            }] => {
                assert_eq!(*session_id, 9);
                assert_eq!(summary, "Extension granted.");
                assert_eq!(evaluation, "Evaluation pending...");
            }
            other => panic!("unexpected effects: {other:?}"),
        }
        assert_eq!(app.tui.summary.summary_text(), Some("Extension granted."));
    }

    #[test]
    fn stored_summary_is_not_regenerated() {
        let mut app = signed_in();
        init(&mut app, Route::Summary(9));
        let effects = complete(
            &mut app,
            TaskKind::SummaryLoad,
            UiEvent::SummaryLoaded {
                session_id: 9,
                result: Ok(SummaryData {
                    session: Some(history_item(9, Some("Done."))),
                    messages: vec![Message::user("hi")],
                }),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(app.tui.summary.summary_text(), Some("Done."));
    }

    #[test]
    fn alert_closes_on_enter() {
        let mut app = signed_in();
        open_alert(&mut app, "Error", "boom".to_string());
        assert!(matches!(
            &app.overlay,
            Some(Overlay::Modal(ModalState {
                kind: ModalKind::Alert,
                ..
            }))
        ));
        press(&mut app, KeyCode::Enter);
        assert!(app.overlay.is_none());
    }
}
