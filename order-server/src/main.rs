use order_server::{Config, Server, ServerState, init_logger};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env is optional)
    dotenv::dotenv().ok();
    init_logger();

    // 2. Load configuration
    let config = Config::from_env();

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Order server starting..."
    );

    // 3. Initialize server state (opens the database)
    let state = ServerState::initialize(&config)?;

    // 4. Run the HTTP server
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
