use std::io::IsTerminal;

mod api;
mod config;
mod console;
mod errors;
mod logging;
mod render;
mod session;

use crate::api::HttpBattleApi;
use crate::config::AppConfig;
use crate::console::Console;
use crate::session::BattleSession;

#[tokio::main]
async fn main() {
    logging::init_logging();

    let cfg = AppConfig::from_env_and_args();
    if let Err(e) = cfg.validate() {
        tracing::warn!(config_error=%e, "invalid config");
    }

    let api = HttpBattleApi::new(cfg.api_url.clone());
    let prompt = !cfg.no_prompt && std::io::stdin().is_terminal();
    tracing::info!(api_url=%api.base_url(), prompt, "battle console starting");

    let stdout = std::io::stdout();
    let mut console = Console::new(BattleSession::new(api), stdout.lock(), prompt);
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    // The console future is not Send because it holds the stdout lock
    tokio::select! {
        res = console.run(input) => {
            if let Err(e) = res { tracing::error!(error=?e, "console terminated with error") }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, exiting");
            // stdin reads park a blocking thread that would delay runtime shutdown
            std::process::exit(0);
        }
    }
}
