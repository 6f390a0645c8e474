use axum::{
    http::{header, Method},
    Router,
};
use log::info;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::web::api::{create_router, AppState};

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    pub enable_cors: bool,
    pub max_sessions: usize,
    pub session_timeout_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3005,
            static_dir: "web".to_string(),
            enable_cors: true,
            max_sessions: 1000,
            session_timeout_minutes: 60,
        }
    }
}

/// Builds the full application: API routes, static files and optional CORS
pub fn build_app(config: ServerConfig) -> Router {
    let static_dir = config.static_dir.clone();
    let enable_cors = config.enable_cors;

    let app = Router::new()
        .merge(create_router())
        .fallback_service(ServeDir::new(static_dir))
        .with_state(AppState::new(config));

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
        app.layer(ServiceBuilder::new().layer(cors).into_inner())
    } else {
        app
    }
}

/// Start the web server on `port` with default settings
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    start_server_with_config(ServerConfig {
        port,
        ..Default::default()
    })
    .await
}

/// Start the web server with custom configuration
pub async fn start_server_with_config(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Serving static files from {}", config.static_dir);
    info!(
        "Sessions: at most {}, expiring after {} minutes",
        config.max_sessions, config.session_timeout_minutes
    );

    let app = build_app(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("SSSP trace server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
