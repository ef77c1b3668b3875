use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use roster::config::ServerConfig;
use roster::server::{AppState, create_router};
use roster::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Admin API for esports teams and players", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and database schema
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Start the server
    Serve {
        /// TOML configuration file; flags given here override it
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Host to bind to [default: 127.0.0.1]
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to [default: 8080]
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database [default: ./data]
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory with the static dashboard, served for non-API paths
        #[arg(long)]
        public_dir: Option<PathBuf>,

        /// Allowed CORS origin (repeatable). Any origin is allowed if none are given.
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },
}

fn open_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    fs::create_dir_all(&config.data_dir)?;
    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;
    Ok(store)
}

fn run_init(data_dir: PathBuf) -> anyhow::Result<()> {
    let config = ServerConfig {
        data_dir,
        ..ServerConfig::default()
    };
    open_store(&config)?;

    println!("Database ready at {}", config.db_path().display());
    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config)?;
    info!("Using database at {}", config.db_path().display());

    if let Some(dir) = &config.public_dir {
        if !dir.is_dir() {
            anyhow::bail!("Public directory does not exist: {}", dir.display());
        }
        info!("Serving static files from {}", dir.display());
    }

    let state = Arc::new(AppState {
        store: Arc::new(store),
        public_dir: config.public_dir.clone(),
        allowed_origins: config.allowed_origins.clone(),
    });

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("roster=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { data_dir } => run_init(data_dir)?,
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
            public_dir,
            allowed_origins,
        } => {
            let mut config = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };

            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if public_dir.is_some() {
                config.public_dir = public_dir;
            }
            if !allowed_origins.is_empty() {
                config.allowed_origins = allowed_origins;
            }

            run_serve(config).await?;
        }
    }

    Ok(())
}
