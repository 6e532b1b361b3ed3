use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bfhub::api::{build_router, state::AppState};
use bfhub::config::AppConfig;
use bfhub::models::Window;
use bfhub::poll::Poller;
use bfhub::rating::ladder::LADDER;
use bfhub::upstream::{CoreClient, StatsApi};

#[derive(Parser)]
#[command(name = "bfhub")]
#[command(about = "Battlefield 1942 community stats hub")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Check upstream reachability and exit
    Probe {
        /// Fetch one player profile by name
        #[arg(long)]
        name: Option<String>,

        /// Fetch a leaderboard window (all_time, weekly, monthly)
        #[arg(long)]
        window: Option<String>,
    },

    /// Print the rank ladder
    Ranks,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = AppConfig::from_file_or_default(&PathBuf::from(&cli.config))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    config.validate().context("invalid configuration")?;

    tracing::info!("Starting bfhub v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let live_interval = config.live_interval();

            let client = CoreClient::from_config(&config)?;
            let api: Arc<dyn StatsApi> = Arc::new(client);
            let state = AppState::new(Arc::new(config), api.clone());

            let poller = Arc::new(Poller::new(api, state.store.clone(), live_interval));
            tokio::spawn(poller.run());

            let app = build_router(state);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Probe { name, window } => {
            let client = CoreClient::from_config(&config)?;
            let result = if let Some(name) = name {
                client
                    .player_profile(&name)
                    .await
                    .and_then(|profile| Ok(serde_json::to_string_pretty(&profile)?))
            } else if let Some(window) = window {
                let window = match window.as_str() {
                    "all_time" => Window::AllTime,
                    "weekly" => Window::Weekly,
                    "monthly" => Window::Monthly,
                    other => anyhow::bail!("unknown window: {other}"),
                };
                client
                    .leaderboard(window, 0)
                    .await
                    .and_then(|entries| Ok(serde_json::to_string_pretty(&entries)?))
            } else {
                client.servers().await.map(|servers| {
                    format!(
                        "Upstream OK: {} ({} servers)",
                        config.upstream.base_url,
                        servers.len()
                    )
                })
            };

            match result {
                Ok(output) => println!("{output}"),
                Err(e) => {
                    eprintln!("Upstream probe failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Ranks => {
            println!("{:<26} {:>6} {:>10}", "Rank", "Abbr", "Threshold");
            for tier in LADDER.iter() {
                println!("{:<26} {:>6} {:>10}", tier.name, tier.abbrev, tier.threshold);
            }
        }
    }

    Ok(())
}
