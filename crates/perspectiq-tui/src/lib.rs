//! Full-screen terminal client for PerspectiQ.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod overlays;
pub mod render;
pub mod route;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use perspectiq_core::config::Config;
pub use route::Route;
pub use runtime::TuiRuntime;

/// Runs the interactive client, starting at `start_route`.
///
/// # Errors
/// Returns an error if no terminal is attached or the terminal fails.
pub async fn run_app(
    config: &Config,
    api_url_override: Option<&str>,
    start_route: Route,
) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive client requires a terminal.\n\
             Use `perspectiq sessions list` and friends for non-interactive use."
        );
    }

    let mut runtime = TuiRuntime::new(config, api_url_override, start_route)?;
    tracing::info!(backend = %runtime.state.tui.api_base_url, route = %start_route, "starting TUI");
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
