use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use veraclaim::api::ApiClient;
use veraclaim::app;
use veraclaim::session::SessionStore;
use veraclaim::util::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "veraclaim", version, about = "Terminal workspace for patent search and AI analysis")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Don't read or write the saved session
    #[arg(long)]
    no_session: bool,

    /// Forget the saved session before starting
    #[arg(long)]
    logout: bool,

    /// Override the API base URL from the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Enable debug logging to file
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.api.base_url = url;
    }

    // Setup logging
    let _guard = setup_logging(&config, cli.debug)?;

    info!(base_url = %config.api.base_url, "veraclaim starting");

    let client = ApiClient::new(&config.api.base_url, config.api.timeout_secs)?;

    let keep = !cli.no_session && config.session.persist;
    let session_store = SessionStore::open(
        config.session_dir(),
        config.session.max_age_secs,
        keep,
        cli.logout,
    )?;
    if cli.logout {
        info!("Stored session cleared");
    }

    let session = session_store.as_ref().and_then(|store| store.load());
    if let Some(ref session) = session {
        info!(username = %session.user.username, "Resuming saved session");
        client.set_tokens(Some(session.tokens.clone()));
    }

    // Run the TUI event loop
    app::event_loop::run(config, client, session, session_store).await
}

fn setup_logging(
    config: &AppConfig,
    debug: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    if !debug {
        return Ok(None);
    }

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "veraclaim.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("veraclaim=debug")
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
