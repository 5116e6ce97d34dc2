use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use homework_watchbot::config;
use homework_watchbot::notifier::{Notifier, TelegramSender};
use homework_watchbot::poller::PollLoop;
use homework_watchbot::practicum::PracticumClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Optional YAML config file; environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(args.config.as_deref())
        .map_err(|err| {
            error!(%err, "cannot start watcher");
            err
        })
        .context("invalid configuration")?;

    let source = PracticumClient::from_config(&cfg)?;
    let notifier = Notifier::new(
        Box::new(TelegramSender::new(cfg.telegram.bot_token.clone())),
        cfg.telegram.chat_id.clone(),
    );

    PollLoop::new(Box::new(source), notifier, cfg.retry_period())
        .run(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(?err, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await;

    info!("watcher stopped");
    Ok(())
}
