use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use habitlog_core::{Config, JsonFileStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "habitlog-server", version, about = "habitlog HTTP backend")]
struct Args {
    /// Listen port. Defaults to $PORT, then the configured port.
    #[arg(long)]
    port: Option<u16>,

    /// Habit data file. Defaults to the configured file in the data directory.
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "habitlog_server=info,habitlog_core=info,tower_http=info".into()
            }),
        )
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
        .unwrap_or(config.server.port);
    let data_path = match args.data_file {
        Some(path) => path,
        None => config.data_file_path()?,
    };

    let store = JsonFileStore::new(&data_path, config.habit.default_name.clone());
    store.initialize()?;

    let app = habitlog_server::router(habitlog_server::AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(data_file = %data_path.display(), "habit data file");
    info!("habitlog API server listening on http://{addr}/api");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
