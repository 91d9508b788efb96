//! HTTP server for browsing a recipe content tree.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - HTML folder and recipe pages under `/cookbook/`
//! - Recipe photos next to their documents
//! - API endpoints returning the same pages as JSON under `/api/cookbook/`
//! - Static files (stylesheet) under `/static/`
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use cookbook_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from("recipes"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (cookbook-server)
//!                        │
//!                        ├─► Page routes ──► ContentTree (resolve, list, read)
//!                        │                        │
//!                        │                        └─► RecipeParser ──► highlight
//!                        │
//!                        ├─► API routes (same page model, JSON)
//!                        │
//!                        └─► Static files (tower-http ServeDir)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod page;
mod state;
mod templates;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Recipe content tree root.
    pub source_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Folder names hidden from listings.
    pub exclude_dirs: Vec<String>,
    /// Character used in URLs in place of a space.
    pub word_separator: char,
    /// Application version (part of the `ETag`).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5000,
            source_dir: PathBuf::from("recipes"),
            static_dir: PathBuf::from("static"),
            exclude_dirs: vec!["config".to_owned()],
            word_separator: '_',
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// # Arguments
///
/// * `config` - Server configuration
///
/// # Errors
///
/// Returns an error if the templates fail to load or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.source_dir.is_dir() {
        tracing::warn!(
            path = %config.source_dir.display(),
            "Recipe directory does not exist, every page will be not found"
        );
    }

    let state = Arc::new(AppState::new(&config)?);
    let app = app::create_router(state);

    // Bind and run server
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, source_dir = %config.source_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from cookbook config.
///
/// # Arguments
///
/// * `config` - Loaded cookbook configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &cookbook_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.recipes_resolved.source_dir.clone(),
        static_dir: config.recipes_resolved.static_dir.clone(),
        exclude_dirs: config.recipes_resolved.exclude_dirs.clone(),
        word_separator: config.recipes_resolved.word_separator,
        version,
    }
}
