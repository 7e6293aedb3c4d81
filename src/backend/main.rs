/**
 * Streamchat Server Entry Point
 *
 * This is the main entry point for the stream chat backend server.
 * It loads configuration, builds the Axum app and serves it until Ctrl-C.
 * On shutdown every chat session is closed so open sockets drain.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use streamchat::backend::server::{create_app, ServerConfig};

    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = ServerConfig::from_env();
    let port = config.port;

    let (app, state) = create_app(config).await;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Server] Listening on {}", addr);

    let registry = state.registry().clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Ends every open chat socket
            let closed = registry.shutdown();
            tracing::info!("[Server] Closed {} chat sessions", closed);
        })
        .await?;

    tracing::info!("[Server] Shut down");
    Ok(())
}

#[cfg(feature = "ssr")]
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("[Server] Shutdown signal received"),
        Err(e) => tracing::error!("[Server] Failed to listen for shutdown signal: {}", e),
    }
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin streamchat-server --features ssr");
    std::process::exit(1);
}
