pub mod api;
pub mod auth;
pub mod cleanup;
pub mod cli;
pub mod db;
pub mod jwt;

use std::net::SocketAddr;
use std::sync::Arc;

use api::create_api_router;
use auth::AuthState;
use axum::Router;
use db::Database;
use jwt::{Clock, JwtConfig};
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// JWT secret for signing tokens
    pub jwt_secret: Vec<u8>,
    /// Clock source for issuance and expiry checks
    pub clock: Clock,
    /// Whether to set Secure flag on cookies (should be true in production with HTTPS)
    pub secure_cookies: bool,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::with_clock(&config.jwt_secret, config.clock.clone()));

    let auth_state = AuthState {
        db: config.db.clone(),
        jwt,
        secure_cookies: config.secure_cookies,
    };

    Router::new().nest("/api", create_api_router(auth_state))
}

/// Run cleanup on startup and spawn the background scheduler.
/// Call this before starting the server.
pub async fn init_cleanup(db: &Database, clock: &Clock) {
    cleanup::run_cleanup(db, clock).await;
    cleanup::spawn_cleanup_scheduler(db.clone(), clock.clone());
}

/// Run the server on the given listener. This function blocks until the server exits.
/// Call `init_cleanup` before this to run cleanup on startup.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

/// Start the server on the given port in a background task. Use port 0 to let
/// the OS choose a random port. Returns the actual address the server is
/// listening on.
pub async fn start_server(
    config: ServerConfig,
    port: u16,
) -> (tokio::task::JoinHandle<()>, SocketAddr) {
    init_cleanup(&config.db, &config.clock).await;

    let addr = format!("127.0.0.1:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    let local_addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        run_server(config, listener).await.ok();
    });

    (handle, local_addr)
}
