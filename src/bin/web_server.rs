use sssp_trace::web::server::{start_server_with_config, ServerConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Usage: web_server [port] [static_dir]
    let args: Vec<String> = env::args().collect();
    let defaults = ServerConfig::default();
    let port = args
        .get(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(defaults.port);
    let static_dir = args.get(2).cloned().unwrap_or(defaults.static_dir.clone());

    let config = ServerConfig {
        port,
        static_dir,
        ..defaults
    };

    println!("🔧 Starting SSSP trace server...");
    println!("⚙️  Configuration:");
    println!("   📡 Port: {}", config.port);
    println!("   📁 Static files: {}", config.static_dir);
    println!("   🌐 CORS enabled: {}", config.enable_cors);
    println!("   👥 Max sessions: {}", config.max_sessions);
    println!("   ⏰ Session timeout: {} minutes", config.session_timeout_minutes);
    println!();

    start_server_with_config(config).await?;

    Ok(())
}
