//! # fleet-client
//!
//! Leptos + WASM console for monitoring printer fleets across tenants.
//!
//! This crate contains pages, components, reactive application state and the
//! REST helpers for the fleet backend. Console logic that does not touch the
//! DOM or the network lives in the `fleet` crate.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
