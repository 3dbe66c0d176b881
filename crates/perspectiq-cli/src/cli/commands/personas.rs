//! Persona listing.

use anyhow::{Context, Result};
use perspectiq_core::config::Config;

use super::authenticated_client;

pub async fn list(config: &Config, api_url: Option<&str>) -> Result<()> {
    let client = authenticated_client(config, api_url)?;
    let personas = client.personas().await.context("load personas")?.personas;
    if personas.is_empty() {
        println!("No personas available.");
        return Ok(());
    }
    for (key, persona) in &personas {
        println!("{key}  {}  ({})", persona.name, persona.role);
        if !persona.description.is_empty() {
            println!("    {}", persona.description);
        }
    }
    Ok(())
}
