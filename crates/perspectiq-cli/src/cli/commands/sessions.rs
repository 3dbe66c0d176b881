//! Past simulation commands.

use anyhow::{Context, Result};
use perspectiq_core::config::Config;
use perspectiq_core::transcript::{display_summary, speaker_label};

use super::authenticated_client;

pub async fn list(config: &Config, api_url: Option<&str>) -> Result<()> {
    let client = authenticated_client(config, api_url)?;
    let sessions = client.history().await.context("load history")?.sessions;
    if sessions.is_empty() {
        println!("No simulations yet.");
        return Ok(());
    }
    for session in sessions.iter().rev() {
        println!(
            "#{}  {}  {}  {}  ({} messages)",
            session.id,
            session.created_date().unwrap_or("-"),
            session.persona,
            session.display_title(),
            session.message_count
        );
    }
    Ok(())
}

pub async fn show(config: &Config, api_url: Option<&str>, id: i64) -> Result<()> {
    let client = authenticated_client(config, api_url)?;
    let history = client.history().await.context("load history")?;
    let session = history
        .sessions
        .into_iter()
        .find(|s| s.id == id)
        .with_context(|| format!("Session {id} not found"))?;
    let messages = client
        .messages(id)
        .await
        .with_context(|| format!("load messages for session {id}"))?
        .messages;

    println!("#{}  {}", session.id, session.display_title());
    println!("Persona: {}", session.persona);
    if let Some(date) = session.created_date() {
        println!("Date: {date}");
    }
    println!();
    println!("Summary:\n{}", display_summary(&session, None));
    if let Some(evaluation) = session.evaluation.as_deref().filter(|e| !e.trim().is_empty()) {
        println!("\nEvaluation:\n{evaluation}");
    }
    println!();
    for message in &messages {
        println!(
            "{}: {}",
            speaker_label(message, Some(&session.persona)),
            message.content
        );
    }
    Ok(())
}

pub async fn delete(config: &Config, api_url: Option<&str>, id: i64) -> Result<()> {
    let client = authenticated_client(config, api_url)?;
    client
        .delete_session(id)
        .await
        .with_context(|| format!("delete session {id}"))?;
    tracing::info!(session_id = id, "session deleted");
    println!("Deleted session {id}.");
    Ok(())
}
