//! Effect handlers: async calls that resolve to a `UiEvent`.
//!
//! Handlers log the underlying error and hand the reducer the message the
//! user should see.

use perspectiq_core::api::{
    ApiClient, LoginRequest, Message, SendMessageRequest, StartSessionRequest,
};
use perspectiq_core::auth::login_failure_message;
use perspectiq_core::generation::Generator;

use crate::events::{SummaryData, UiEvent};

pub async fn fetch_profile(client: ApiClient) -> UiEvent {
    let result = client.me().await.map_err(|e| {
        tracing::warn!("profile lookup failed: {e:#}");
        format!("{e:#}")
    });
    UiEvent::ProfileLoaded(result)
}

pub async fn login(client: ApiClient, request: LoginRequest) -> UiEvent {
    let result = client.login(&request).await.map_err(|e| {
        tracing::warn!(username = %request.username, "login failed: {e:#}");
        login_failure_message(&e).to_string()
    });
    if result.is_ok() {
        tracing::info!(username = %request.username, "logged in");
    }
    UiEvent::LoginFinished(result)
}

pub async fn load_history(client: ApiClient) -> UiEvent {
    let result = client
        .history()
        .await
        .map(|res| res.sessions)
        .map_err(|e| {
            tracing::warn!("history load failed: {e:#}");
            "Failed to load history.".to_string()
        });
    UiEvent::HistoryLoaded(result)
}

pub async fn delete_session(client: ApiClient, session_id: i64) -> UiEvent {
    let result = client
        .delete_session(session_id)
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!(session_id, "delete failed: {e:#}");
            "Failed to delete session. Please try again.".to_string()
        });
    UiEvent::SessionDeleted { session_id, result }
}

pub async fn load_personas(client: ApiClient) -> UiEvent {
    let result = client
        .personas()
        .await
        .map(|res| res.personas)
        .map_err(|e| {
            tracing::warn!("persona load failed: {e:#}");
            "Failed to load personas.".to_string()
        });
    UiEvent::PersonasLoaded(result)
}

pub async fn generate_scenario(generator: Generator, role: String, difficulty: String) -> UiEvent {
    UiEvent::ScenarioGenerated(generator.generate_scenario(&role, &difficulty).await)
}

pub async fn start_session(client: ApiClient, request: StartSessionRequest) -> UiEvent {
    let result = client
        .start_session(&request)
        .await
        .map(|res| {
            tracing::info!(session_id = res.session_id, "session started");
            res.session_id
        })
        .map_err(|e| {
            tracing::warn!("session start failed: {e:#}");
            "Failed to start session. Please try again.".to_string()
        });
    UiEvent::SessionStarted(result)
}

pub async fn load_messages(client: ApiClient, session_id: i64) -> UiEvent {
    let result = client
        .messages(session_id)
        .await
        .map(|res| res.messages)
        .map_err(|e| {
            tracing::warn!(session_id, "message load failed: {e:#}");
            "Failed to load conversation.".to_string()
        });
    UiEvent::MessagesLoaded { session_id, result }
}

pub async fn send_message(client: ApiClient, session_id: i64, message: String) -> UiEvent {
    let request = SendMessageRequest {
        session_id,
        message,
    };
    let result = client
        .send_message(&request)
        .await
        .map(Message::from)
        .map_err(|e| {
            tracing::warn!(session_id, "send failed: {e:#}");
            "Failed to send message. Please try again.".to_string()
        });
    UiEvent::ReplyReceived { session_id, result }
}

pub async fn end_session(client: ApiClient, session_id: i64) -> UiEvent {
    let result = client
        .end_session(session_id)
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!(session_id, "end session failed: {e:#}");
            "Failed to end session. Please try again.".to_string()
        });
    UiEvent::SessionEnded { session_id, result }
}

/// History (to find the session) and its messages.
pub async fn load_summary(client: ApiClient, session_id: i64) -> UiEvent {
    let result = async {
        let history = client.history().await?;
        let session = history.sessions.into_iter().find(|s| s.id == session_id);
        let messages = client.messages(session_id).await?.messages;
        anyhow::Ok(SummaryData { session, messages })
    }
    .await
    .map_err(|e| {
        tracing::warn!(session_id, "summary load failed: {e:#}");
        "Failed to load session details.".to_string()
    });
    UiEvent::SummaryLoaded { session_id, result }
}

pub async fn generate_summary(generator: Generator, session_id: i64, transcript: String) -> UiEvent {
    let summary = generator.generate_summary(&transcript).await;
    UiEvent::SummaryGenerated {
        session_id,
        summary,
    }
}

pub async fn save_summary(
    client: ApiClient,
    session_id: i64,
    summary: String,
    evaluation: String,
) -> UiEvent {
    let result = client
        .save_summary(session_id, &summary, &evaluation)
        .await
        .map_err(|e| format!("{e:#}"));
    UiEvent::SummarySaved { session_id, result }
}
