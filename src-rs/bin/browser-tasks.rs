use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use browser_tasks_rs::api::server::TaskServer;
use browser_tasks_rs::ServerConfig;

/// HTTP front end that hands browser tasks to an automation engine and tracks them.
#[derive(Parser, Debug)]
#[command(name = "browser-tasks", version, about)]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Automation engine: cloud or command (overrides BROWSER_TASKS_ENGINE)
    #[arg(long)]
    engine: Option<String>,

    /// Model the engine should drive the browser with
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the cloud automation API
    #[arg(long)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(engine) = args.engine {
        config.engine.kind = engine;
    }
    if let Some(model) = args.model {
        config.engine.model = model;
    }
    if let Some(base_url) = args.base_url {
        config.engine.base_url = base_url;
    }

    let server = TaskServer::new(config, None);
    server.start().await?;
    Ok(())
}
