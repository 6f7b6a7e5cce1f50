//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server only hosts the console: Leptos SSR pages, the compiled WASM
//! bundle under `/pkg`, and a health check. Fleet data is fetched by the
//! browser straight from the fleet backend.

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Directory holding the built site: the config override or Leptos' own.
fn site_root(config: &ServerConfig, leptos_site_root: &str) -> PathBuf {
    config
        .site_root
        .clone()
        .unwrap_or_else(|| PathBuf::from(leptos_site_root))
}

/// Leptos SSR console plus static assets and `/healthz`.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing
/// `[[workspace.metadata.leptos]]` or `LEPTOS_*` environment).
pub fn leptos_app(config: &ServerConfig) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(fleet_client::app::App);
    let pkg_dir = site_root(config, &leptos_options.site_root).join(&*leptos_options.site_pkg_dir);
    tracing::info!(pkg = %pkg_dir.display(), "serving console assets");

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || fleet_client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    Ok(Router::new()
        .route("/healthz", get(healthz))
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(pkg_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
