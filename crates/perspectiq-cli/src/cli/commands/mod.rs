//! CLI command handlers.

pub mod auth;
pub mod chat;
pub mod config;
pub mod health;
pub mod personas;
pub mod sessions;

use anyhow::{Result, bail};
use perspectiq_core::api::ApiClient;
use perspectiq_core::auth::CredentialStore;
use perspectiq_core::config::Config;

/// Client carrying the stored token. Fails when nobody is logged in.
fn authenticated_client(config: &Config, api_url: Option<&str>) -> Result<ApiClient> {
    let credentials = CredentialStore::default().load()?;
    if !credentials.is_authenticated() {
        bail!("Not logged in. Run `perspectiq login --username <name> --role <role>` first.");
    }
    ApiClient::from_config(config, &credentials, api_url)
}
