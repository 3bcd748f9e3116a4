use crm_api::database::manager::DatabaseManager;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = crm_api::config::config();
    tracing::info!("Starting CRM API in {:?} mode", config.environment);

    // Store configuration is a startup requirement, not a per-request concern
    if let Err(e) = DatabaseManager::init().await {
        tracing::error!("Failed to initialize quotation store: {}", e);
        std::process::exit(1);
    }

    let app = crm_api::app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("CRM_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("CRM API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
