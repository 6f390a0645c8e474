//! HTTP API for stepping through traced runs from a browser

pub mod api;
pub mod models;
pub mod server;

pub use api::{create_router, AppState};
pub use server::{build_app, start_server, start_server_with_config, ServerConfig};
