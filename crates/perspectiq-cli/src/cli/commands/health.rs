//! Backend health check.

use anyhow::{Context, Result};
use perspectiq_core::api::ApiClient;
use perspectiq_core::config::Config;

pub async fn check(config: &Config, api_url: Option<&str>) -> Result<()> {
    let base_url = config.resolve_api_base_url(api_url)?;
    let client = ApiClient::new(&base_url, None, config.request_timeout())?;
    let health = client
        .health()
        .await
        .with_context(|| format!("reach backend at {base_url}"))?;
    println!("{base_url}: {}", health.status);
    Ok(())
}
