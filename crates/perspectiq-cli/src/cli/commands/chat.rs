//! Interactive client launcher.

use anyhow::{Context, Result};
use perspectiq_core::config::Config;

use crate::modes;

pub async fn run(config: &Config, api_url: Option<&str>, route: Option<&str>) -> Result<()> {
    modes::run_interactive(config, api_url, route)
        .await
        .context("interactive client failed")
}
