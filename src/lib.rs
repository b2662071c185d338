//! In-N-Out Books application library
//!
//! Wires the book catalogue, login, and landing page modules into the HTTP
//! server.

pub mod modules;
pub mod utils;

use anyhow::Context;
use axum::Router;
use inout_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books::{
    models::{Book, BookPatch},
    store::{memory_store, BookStore, SharedBookStore},
};

/// Registry holding every application module, backed by `store`.
pub fn build_registry(settings: &Settings, store: SharedBookStore) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings, store)?;
    Ok(registry)
}

/// The complete HTTP application for `registry`.
pub fn build_app(registry: &ModuleRegistry, settings: &Settings) -> Router {
    inout_http::build_router(registry, settings)
}

/// Run the service until Ctrl-C or SIGTERM.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = memory_store(settings.storage.seed);
    let registry = build_registry(&settings, store)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let app = build_app(&registry, &settings);
    let served = inout_http::start_server(app, &settings, shutdown_signal()).await;

    registry
        .stop_all()
        .await
        .context("failed to stop modules cleanly")?;
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
