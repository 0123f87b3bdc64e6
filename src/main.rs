use clap::Parser;
use widget_rag_api::infrastructure::logging::init_logging;
use widget_rag_api::{api, create_app_state, AppConfig};

#[derive(Parser)]
#[command(name = "widget-rag-api", about = "Retrieval-augmented support assistant API")]
struct Cli {
    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.logging);

    let state = create_app_state(&config).await?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
