//! SimpleAI - one borderless window per AI chat service
//!
//! Without arguments this process shows the service picker. With a service
//! id (`simpleai gemini`) it opens that service directly in its own window.

#![windows_subsystem = "windows"]

use anyhow::{Context, Result};
use simple_ai::config::LOG_ENV;
use simple_ai::geometry::{GeometryStore, JsonGeometryStore, MemoryGeometryStore};
use simple_ai::launch::LaunchContext;
use simple_ai::router::Route;
use simple_ai::{gui, webview};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let route = Route::resolve(LaunchContext::from_env());
    tracing::info!("SimpleAI starting (PID {}): {}", std::process::id(), route.window_title());

    let store = open_store();

    match route {
        Route::Picker => gui::run(route, store).context("Picker window failed")?,
        Route::Service(_) => webview::run(route, store)?,
    }

    Ok(())
}

/// Geometry store at the per-user location; without one, geometry lives
/// only as long as this process
fn open_store() -> Arc<dyn GeometryStore> {
    match JsonGeometryStore::open_default() {
        Ok(store) => {
            tracing::debug!("Window geometry stored in {:?}", store.path());
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Window geometry will not be persisted: {}", e);
            Arc::new(MemoryGeometryStore::new())
        }
    }
}
