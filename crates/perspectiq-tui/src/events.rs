//! UI events consumed by the reducer.
//!
//! Terminal input, timer ticks, and results of async work all arrive as
//! `UiEvent`s. Results carry user-facing error strings; details are logged
//! where the error happened.

use std::collections::BTreeMap;

use crossterm::event::Event;
use perspectiq_core::api::{CurrentUser, LoginResponse, Message, Persona, SessionHistoryItem};

use crate::common::{TaskCompleted, TaskKind};

/// Data backing the summary screen.
#[derive(Debug, Clone)]
pub struct SummaryData {
    /// `None` when the session is not in the user's history.
    pub session: Option<SessionHistoryItem>,
    pub messages: Vec<Message>,
}

#[derive(Debug)]
pub enum UiEvent {
    Tick,
    Frame {
        width: u16,
        height: u16,
    },
    Terminal(Event),

    /// A spawned task finished. Unwrapped by the reducer if still active.
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    ProfileLoaded(Result<CurrentUser, String>),
    LoginFinished(Result<LoginResponse, String>),
    HistoryLoaded(Result<Vec<SessionHistoryItem>, String>),
    SessionDeleted {
        session_id: i64,
        result: Result<(), String>,
    },
    PersonasLoaded(Result<BTreeMap<String, Persona>, String>),
    ScenarioGenerated(String),
    SessionStarted(Result<i64, String>),
    MessagesLoaded {
        session_id: i64,
        result: Result<Vec<Message>, String>,
    },
    ReplyReceived {
        session_id: i64,
        result: Result<Message, String>,
    },
    SessionEnded {
        session_id: i64,
        result: Result<(), String>,
    },
    SummaryLoaded {
        session_id: i64,
        result: Result<SummaryData, String>,
    },
    SummaryGenerated {
        session_id: i64,
        summary: String,
    },
    SummarySaved {
        session_id: i64,
        result: Result<(), String>,
    },
}
