use std::net::SocketAddr;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use customer_api::{CustomerApi, DeleteMode};
use customer_core::CustomerRepository;

mod logging;
mod routes;

use routes::{app, ServiceState};

#[derive(Debug, Parser)]
#[command(name = "customer-service")]
#[command(about = "In-memory HTTP service for customer records")]
struct Args {
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
    #[arg(long, value_enum, default_value_t = DeleteModeArg::Identifier)]
    delete_mode: DeleteModeArg,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeleteModeArg {
    Identifier,
    LegacyPosition,
}

impl From<DeleteModeArg> for DeleteMode {
    fn from(value: DeleteModeArg) -> Self {
        match value {
            DeleteModeArg::Identifier => Self::Identifier,
            DeleteModeArg::LegacyPosition => Self::LegacyPosition,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(&args.log_level, args.json_logs);

    let delete_mode = DeleteMode::from(args.delete_mode);
    let state = ServiceState { api: CustomerApi::new(CustomerRepository::new(), delete_mode) };

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    tracing::info!(
        addr = %args.bind,
        delete_mode = delete_mode.as_str(),
        "customer service listening"
    );

    axum::serve(listener, app(state)).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("customer service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_identifier_deletes_on_port_8080() {
        let args = match Args::try_parse_from(["customer-service"]) {
            Ok(args) => args,
            Err(err) => panic!("default arguments should parse: {err}"),
        };
        assert_eq!(args.bind.port(), 8080);
        assert_eq!(DeleteMode::from(args.delete_mode), DeleteMode::Identifier);
        assert_eq!(args.log_level, "info");
        assert!(!args.json_logs);
    }

    #[test]
    fn args_accept_legacy_delete_mode() {
        let args = match Args::try_parse_from([
            "customer-service",
            "--bind",
            "127.0.0.1:4010",
            "--delete-mode",
            "legacy-position",
            "--json-logs",
        ]) {
            Ok(args) => args,
            Err(err) => panic!("arguments should parse: {err}"),
        };
        assert_eq!(args.bind.port(), 4010);
        assert_eq!(DeleteMode::from(args.delete_mode), DeleteMode::LegacyPosition);
        assert!(args.json_logs);
    }
}
