//! Login, logout, and current-user commands.

use anyhow::{Context, Result};
use perspectiq_core::api::{ApiClient, LoginRequest};
use perspectiq_core::auth::{CredentialStore, Credentials, login_failure_message};
use perspectiq_core::config::Config;

use super::authenticated_client;

pub async fn login(
    config: &Config,
    api_url: Option<&str>,
    username: String,
    role: String,
    age: Option<u32>,
) -> Result<()> {
    let username = username.trim().to_string();
    let role = role.trim().to_string();
    if username.is_empty() || role.is_empty() {
        anyhow::bail!("Username and role are required.");
    }

    let client = ApiClient::from_config(config, &Credentials::default(), api_url)?;
    let response = match client.login(&LoginRequest { username, role, age }).await {
        Ok(response) => response,
        Err(e) => {
            let message = login_failure_message(&e);
            return Err(e.context(message));
        }
    };

    let store = CredentialStore::default();
    store
        .save(&Credentials::from_login(&response))
        .context("store credentials")?;
    tracing::info!(username = %response.username, "logged in");
    println!("Logged in as {} ({})", response.username, response.role);
    Ok(())
}

pub fn logout() -> Result<()> {
    CredentialStore::default()
        .clear()
        .context("clear credentials")?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(config: &Config, api_url: Option<&str>) -> Result<()> {
    let client = authenticated_client(config, api_url)?;
    let user = client.me().await.context("load current user")?;
    match user.age {
        Some(age) => println!("{} ({}), age {age}", user.username, user.role),
        None => println!("{} ({})", user.username, user.role),
    }
    Ok(())
}
