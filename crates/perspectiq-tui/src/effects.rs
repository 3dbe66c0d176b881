//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs
//! I/O directly.

use perspectiq_core::api::{LoginRequest, StartSessionRequest};
use perspectiq_core::auth::Credentials;

use crate::common::TaskId;

#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Write credentials to the credential store.
    PersistCredentials { credentials: Credentials },

    /// Remove stored credentials.
    ClearCredentials,

    /// `GET /auth/me` to complete a stored profile.
    FetchProfile { task: TaskId },

    /// `POST /auth/login`.
    Login { task: TaskId, request: LoginRequest },

    /// `GET /chat/history` for the dashboard.
    LoadHistory { task: TaskId },

    /// `DELETE /chat/delete/{id}`.
    DeleteSession { task: TaskId, session_id: i64 },

    /// `GET /chat/personas` for the wizard.
    LoadPersonas { task: TaskId },

    /// Ask the AI endpoint for a scenario for a persona role.
    GenerateScenario {
        task: TaskId,
        role: String,
        difficulty: String,
    },

    /// `POST /chat/start`.
    StartSession {
        task: TaskId,
        request: StartSessionRequest,
    },

    /// `GET /chat/messages/{id}`.
    LoadMessages { task: TaskId, session_id: i64 },

    /// `POST /chat/message`.
    SendMessage {
        task: TaskId,
        session_id: i64,
        message: String,
    },

    /// `POST /chat/end`.
    EndSession { task: TaskId, session_id: i64 },

    /// History + messages for the summary screen.
    LoadSummary { task: TaskId, session_id: i64 },

    /// Summarize a transcript with the AI endpoint.
    GenerateSummary {
        task: TaskId,
        session_id: i64,
        transcript: String,
    },

    /// `POST /chat/summary` (fire and forget).
    SaveSummary {
        session_id: i64,
        summary: String,
        evaluation: String,
    },
}
