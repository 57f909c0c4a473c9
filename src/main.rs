//! Leave engine HTTP server.

use clap::Parser;
use tracing::{info, warn};

use leave_engine::api::{AppState, create_router};
use leave_engine::config::ConfigLoader;

/// Leave entitlement and business-calendar engine server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing leave engine");

    let config = match &args.config {
        Some(path) => ConfigLoader::load(path)?,
        None => {
            info!("No configuration file given, using defaults");
            ConfigLoader::default()
        }
    };

    let state = AppState::from_config(config)?;

    // Warm the holiday cache; requests retry the load if this fails
    match state.holidays().ensure_loaded().await {
        Ok(calendar) => info!(dates = calendar.holiday_set().len(), "Holiday calendar ready"),
        Err(err) => warn!(error = %err, "Holiday calendar not loaded at startup"),
    }

    let app = create_router(state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
