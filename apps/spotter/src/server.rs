use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::routes::build_router;
use crate::screening::extract::PdfTextReader;
use crate::state::AppState;

/// Runs the reference scoring service until the process is stopped.
pub async fn run(args: ServeArgs, config: Config) -> Result<()> {
    let port = args.port.unwrap_or(config.port);
    info!(
        "Upload limit: {} MiB",
        config.max_upload_bytes / (1024 * 1024)
    );

    let state = AppState {
        config,
        reader: Arc::new(PdfTextReader),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("{}:{port}", args.host).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
