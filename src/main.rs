use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use model_comments::{api, config::ServerConfig};

#[derive(Parser)]
#[command(name = "mcomments")]
#[command(about = "Comment storage for the parts of versioned 3D models")]
struct Cli {
    /// SQLite database file (overrides MODEL_COMMENTS_DB)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API (overrides MODEL_COMMENTS_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides MODEL_COMMENTS_HOST)
        #[arg(long)]
        host: Option<IpAddr>,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "model_comments=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db = config.open_database()?;
    let app = api::create_router_with_config(db, &config);

    let addr = config.addr();
    tracing::info!("Starting model comments server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Model comments server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = ServerConfig::from_env();
    if let Some(path) = cli.database {
        config.database_path = Some(path);
    }

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(config).await?;
        }
        Some(Commands::Migrate) => {
            config.open_database()?;
            tracing::info!("Database is up to date");
        }
        None => serve(config).await?,
    }

    Ok(())
}
