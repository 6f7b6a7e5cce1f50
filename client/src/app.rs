//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` owns the three shared state signals. The session signal is the single
//! provider of the scope: it is filled from `localStorage` once hydrated and
//! re-synced when another tab changes the stored scope or the window regains
//! focus. Consumers read it from context instead of touching storage.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::route_gate::{RootRedirect, RouteGate};
use crate::pages::{login::LoginPage, monitor::MonitorPage, register::RegisterPage};
use crate::state::{console::ConsoleState, folders::FolderState, session::SessionState};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let console = RwSignal::new(ConsoleState::default());
    let folders = RwSignal::new(FolderState::default());

    provide_context(session);
    provide_context(console);
    provide_context(folders);

    // Effects only run in the browser, so SSR and the first hydrated render
    // agree on an unloaded session.
    Effect::new(move || {
        if !session.with_untracked(|s| s.loaded) {
            crate::util::storage::sync_session(session, console, folders);
        }
    });

    #[cfg(feature = "hydrate")]
    {
        let on_storage = window_event_listener(leptos::ev::storage, move |ev| {
            if crate::util::storage::is_scope_key(ev.key().as_deref()) {
                crate::util::storage::sync_session(session, console, folders);
            }
        });
        let on_focus = window_event_listener(leptos::ev::focus, move |_| {
            crate::util::storage::sync_session(session, console, folders);
        });
        on_cleanup(move || {
            on_storage.remove();
            on_focus.remove();
        });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/fleet-console.css"/>
        <Title text="Fleet Console"/>

        <Router>
            <Routes fallback=|| view! { <Redirect path="/login"/> }>
                <Route path=StaticSegment("") view=RootRedirect/>
                <Route
                    path=StaticSegment("login")
                    view=|| view! { <RouteGate route=fleet::scope::Route::Login><LoginPage/></RouteGate> }
                />
                <Route
                    path=StaticSegment("registro")
                    view=|| view! { <RouteGate route=fleet::scope::Route::Register><RegisterPage/></RouteGate> }
                />
                <Route
                    path=StaticSegment("monitor")
                    view=|| view! { <RouteGate route=fleet::scope::Route::Monitor><MonitorPage/></RouteGate> }
                />
            </Routes>
        </Router>
    }
}
