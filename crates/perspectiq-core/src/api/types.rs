//! Request and response records exchanged with the backend.
//!
//! These mirror the backend's JSON exactly; the client passes them through
//! without reshaping beyond presence checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub role: String,
}

/// Result of `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub age: Option<u32>,
}

// ============================================================================
// Personas
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_frustration: Option<f64>,
}

/// Personas keyed by their registry key (e.g. `"CTO"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonasResponse {
    pub personas: BTreeMap<String, Persona>,
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// 0.0 (calm) to 1.0 (furious).
    pub frustration: f64,
    pub goals: String,
    pub motivations: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub scenario: String,
    pub personas: Vec<String>,
    pub persona_configs: BTreeMap<String, PersonaConfig>,
}

impl StartSessionRequest {
    /// Builds a request for a single-persona session.
    pub fn single(scenario: impl Into<String>, persona_key: &str, config: PersonaConfig) -> Self {
        let mut persona_configs = BTreeMap::new();
        persona_configs.insert(persona_key.to_string(), config);
        Self {
            scenario: scenario.into(),
            personas: vec![persona_key.to_string()],
            persona_configs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: i64,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub session_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub persona: String,
    pub message: String,
    /// Coaching feedback on the user's turn, when the backend provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub persona: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            persona: None,
        }
    }

    pub fn assistant(content: impl Into<String>, persona: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            persona,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

impl From<SendMessageResponse> for Message {
    fn from(res: SendMessageResponse) -> Self {
        Message::assistant(res.message, Some(res.persona))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMessagesResponse {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndSessionRequest {
    pub session_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub summary: String,
    pub evaluation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummaryRequest {
    pub session_id: i64,
    pub summary: String,
    pub evaluation: String,
}

// ============================================================================
// History
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHistoryItem {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub scenario: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub persona: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub evaluation: Option<String>,
    #[serde(default)]
    pub message_count: u32,
}

impl SessionHistoryItem {
    /// Date portion of `created_at` (`YYYY-MM-DD`), if present.
    pub fn created_date(&self) -> Option<&str> {
        let created = self.created_at.as_deref()?;
        Some(created.split('T').next().unwrap_or(created))
    }

    /// Scenario text, or a placeholder when the session has none.
    pub fn display_title(&self) -> &str {
        if self.scenario.trim().is_empty() {
            "Untitled Negotiation"
        } else {
            &self.scenario
        }
    }

    /// Stored summary when it is non-empty.
    pub fn stored_summary(&self) -> Option<&str> {
        self.summary.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Reads a nullable string column as empty text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetHistoryResponse {
    pub sessions: Vec<SessionHistoryItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSessionResponse {
    pub message: String,
    pub session_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
