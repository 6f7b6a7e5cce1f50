//! Route guard driven by the session provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every routed page is wrapped in [`RouteGate`]. The gate waits for the
//! session to load from storage, then either renders the page or redirects:
//! `/monitor` needs a scope, `/login` and `/registro` bounce signed-in users
//! to the console.

use fleet::scope::{GateDecision, Route, gate};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionState;

fn decide(session: &SessionState, route: Option<Route>) -> Option<GateDecision> {
    session.loaded.then(|| gate(route, session.scope()))
}

fn install_redirect(session: RwSignal<SessionState>, route: Option<Route>) {
    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(GateDecision::Redirect(target)) = session.with(|s| decide(s, route)) {
            navigate(
                target.path(),
                NavigateOptions {
                    replace: true,
                    ..NavigateOptions::default()
                },
            );
        }
    });
}

/// Render `children` only when the session allows `route`.
#[component]
pub fn RouteGate(route: Route, children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    install_redirect(session, Some(route));

    let allowed = move || session.with(|s| decide(s, Some(route))) == Some(GateDecision::Allow);

    view! {
        <Show when=allowed fallback=|| view! { <div class="gate-placeholder">"Loading…"</div> }>
            {children()}
        </Show>
    }
}

/// `/` sends the user to the console or to login.
#[component]
pub fn RootRedirect() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    install_redirect(session, None);
    view! { <div class="gate-placeholder">"Loading…"</div> }
}
