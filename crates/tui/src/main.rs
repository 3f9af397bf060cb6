mod app;
mod events;
mod logging;
mod strings;
mod terminal;
mod theme;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use providers::openrouter::{OpenRouterClient, OpenRouterConfig};
use terminal::TerminalGuard;
use tracing::info;

fn main() -> Result<()> {
    let _log_guard = logging::init();
    let cfg = OpenRouterConfig::from_env_and_file().context("load OpenRouter configuration")?;
    info!(target: "tui", "starting: model={} base_url={} timeout={:?}", cfg.model, cfg.base_url, cfg.timeout);
    let client = OpenRouterClient::new(cfg).context("build OpenRouter client")?;
    let mut app = app::App::new(Arc::new(client));
    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app)
}
