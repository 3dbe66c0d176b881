//! Runtime execution modes.
//!
//! - `tui`: Full-screen interactive client (optional feature)

use anyhow::Result;
use perspectiq_core::config::Config;

/// Launches the interactive client at `route` (a path such as `/chat/42`).
#[cfg(feature = "tui")]
pub async fn run_interactive(
    config: &Config,
    api_url_override: Option<&str>,
    route: Option<&str>,
) -> Result<()> {
    let start = route.map(perspectiq_tui::Route::parse).unwrap_or_default();
    perspectiq_tui::run_app(config, api_url_override, start).await
}

#[cfg(not(feature = "tui"))]
pub async fn run_interactive(
    _config: &Config,
    _api_url_override: Option<&str>,
    _route: Option<&str>,
) -> Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
