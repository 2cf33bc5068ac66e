use std::{fs::File, net::SocketAddr};

use anyhow::{Context, Result};
use overdraft_ledger::{
    bin_utils::{RowError, Service},
    config::Config,
    http::{self, AppState},
    processor::BalanceUpdateError,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: overdraft-ledger <transactions.csv> | overdraft-ledger serve";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Invalid configuration")?;
    let arg = std::env::args().nth(1).context(USAGE)?;

    if arg == "serve" {
        serve(config).await
    } else {
        run_batch(&arg, config)
    }
}

async fn serve(config: Config) -> Result<()> {
    let state = AppState::new(&config);
    let app = http::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, accounts = config.accounts.len(), "ledger listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

fn run_batch(filename: &str, config: Config) -> Result<()> {
    let file = File::open(filename).with_context(|| format!("Failed to open `{filename}`"))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        accounts: config.accounts,
        error_printer: Box::new(|line, err| {
            match err {
                RowError::Malformed(err) => eprintln!("Error at line {line}: {err}"),
                RowError::Rejected(err @ BalanceUpdateError::InvalidRequest(_)) => {
                    eprintln!("Error at line {line}: {err}")
                }
                RowError::Rejected(err) if err.is_retriable() => {
                    warn!(line, "transaction not applied: {err}")
                }
                RowError::Rejected(_) => {
                    // limit and unknown account rejections are not technical errors
                }
            }
        }),
    };
    service.run()
}
