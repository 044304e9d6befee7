//! wvm-admin - venue map admin service
//!
//! Serves the admin JSON API over the catalog document, accepts visitor
//! photo requests, and generates the static venue map pages.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wvm_common::api::auth::AdminAuth;
use wvm_common::config::{RootFolderResolver, RootLayout, TomlConfig};

use wvm_admin::{build_router, AppState};

/// Command-line arguments for wvm-admin
#[derive(Parser, Debug)]
#[command(name = "wvm-admin")]
#[command(about = "Venue map admin service")]
#[command(version)]
struct Args {
    /// Root folder holding data.json, uploads/ and templates/
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "WVM_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides the config file)
    #[arg(short, long, env = "WVM_BIND")]
    bind: Option<String>,

    /// Hex SHA-256 of the admin password (overrides the config file)
    #[arg(long, env = "WVM_ADMIN_PASSWORD_HASH", hide_env_values = true)]
    admin_password_hash: Option<String>,

    /// Directory for generated pages (defaults to the root folder)
    #[arg(long, env = "WVM_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    /// Serve the admin API without login (development only)
    #[arg(long, env = "WVM_NO_AUTH")]
    no_auth: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load_or_default();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "wvm_admin={level},wvm_common={level},tower_http={level}",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before any filesystem work
    info!(
        "Starting WVM Admin (wvm-admin) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = RootFolderResolver::new(args.root_folder, &config).resolve();
    let mut layout = RootLayout::new(root_folder);
    if let Some(export_dir) = args.export_dir.or_else(|| config.export_dir.clone()) {
        layout = layout.with_export_dir(export_dir);
    }
    layout
        .ensure_directories()
        .context("Failed to initialize root folder")?;

    info!("Root folder: {}", layout.root().display());
    info!("Catalog: {}", layout.data_file().display());
    info!("Export directory: {}", layout.export_dir().display());
    if !layout.template_file().exists() {
        warn!(
            "Page template {} not found; generate-html will fail until it exists",
            layout.template_file().display()
        );
    }

    let password_hash = args
        .admin_password_hash
        .or_else(|| config.admin_password_hash.clone());
    let auth = if args.no_auth {
        warn!("--no-auth given: admin API is unauthenticated");
        AdminAuth::disabled()
    } else {
        let auth = AdminAuth::new(password_hash, config.session_ttl_hours);
        if !auth.has_password() {
            bail!(
                "No admin password hash configured; set WVM_ADMIN_PASSWORD_HASH, \
                 admin_password_hash in the config file, or pass --no-auth"
            );
        }
        info!("Admin authentication enabled");
        auth
    };

    let app = build_router(AppState::new(layout, auth));

    let bind = args.bind.unwrap_or(config.bind);
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("wvm-admin listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
