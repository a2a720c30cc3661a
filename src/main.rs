//! User Directory server binary

use clap::Parser;
use userdir::landing::{ApiPathMode, LandingConfig, PREBUILT_VERSION_DEFAULT, TITLE_DEFAULT};
use userdir::{pages, users, APP_NAME, APP_VERSION, HTTP_BIND_ADDRESS_DEFAULT};

// =============================================================================
// CLI
// =============================================================================

/// User directory rendered with FastUI
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "List, add, view and delete users through a server-driven UI")]
#[command(version)]
struct Cli {
    /// HTTP bind address
    #[arg(short, long, default_value = HTTP_BIND_ADDRESS_DEFAULT)]
    bind: String,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Title of the landing page
    #[arg(long, default_value = TITLE_DEFAULT)]
    title: String,

    /// API root the client should fetch pages from
    #[arg(long)]
    api_root_url: Option<String>,

    /// How the client maps its route onto the API root
    #[arg(long, value_enum)]
    api_path_mode: Option<ApiPathMode>,

    /// Prefix the client strips from its route before calling the API
    #[arg(long)]
    api_path_strip: Option<String>,

    /// Version of the prebuilt FastUI client bundle
    #[arg(long, default_value = PREBUILT_VERSION_DEFAULT)]
    prebuilt_version: String,
}

impl Cli {
    fn landing_config(&self) -> LandingConfig {
        LandingConfig {
            title: self.title.clone(),
            prebuilt_version: self.prebuilt_version.clone(),
            api_root_url: self.api_root_url.clone(),
            api_path_mode: self.api_path_mode,
            api_path_strip: self.api_path_strip.clone(),
        }
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional .env, mainly for RUST_LOG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "info,tower_http=debug",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    tracing::info!("User directory v{}", APP_VERSION);

    // Store lives as long as the process; nothing is persisted
    let store = users::new_shared_store();
    tracing::info!(users = store.read().await.len(), "Seeded user store");

    let state = pages::AppState::new(store, &cli.landing_config());
    let app = pages::router(state);

    let addr: std::net::SocketAddr = cli.bind.parse()?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
