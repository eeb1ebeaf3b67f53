//! Host entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod companion;
mod config;
mod report;
mod server;

use config::LogConfig;

#[derive(Debug, Parser)]
#[command(
    name = "appgate-server",
    version,
    about = "Multi-tenant HTTP service host"
)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, short, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Assemble, print the startup report as JSON and exit
    #[arg(long)]
    print_report: bool,

    /// Override the listen address, e.g. 0.0.0.0:9000
    #[arg(long, value_name = "ADDR")]
    listen: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    init_tracing(&config.log)?;

    if let Some(companion) = &config.companion {
        companion::wait_until_ready(companion).await;
    }

    let app = server::build_app(&config)?;
    report::log_startup_report(&app.report);

    if cli.print_report {
        println!("{}", serde_json::to_string_pretty(&app.report)?);
        return Ok(());
    }

    let listener = match cli.listen {
        Some(addr) => TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?,
        None => {
            let addr = (config.server.host.as_str(), config.server.port);
            TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {}:{}", addr.0, addr.1))?
        }
    };
    let local_addr = listener.local_addr()?;
    tracing::info!(
        addr = %local_addr,
        routes = app.routes.len(),
        "serving"
    );

    app.ready.set_ready();
    axum::serve(listener, app.router)
        .await
        .context("server terminated")?;
    Ok(())
}

fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.filter))
        .context("invalid log filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
