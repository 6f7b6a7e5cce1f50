//! Login page: email, password, region and tenant id.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use fleet::auth::{LoginForm, REGIONS};
use fleet::error::FleetError;
use leptos::prelude::*;

use crate::state::session::SessionState;

/// Message shown for a failed login.
fn login_error_text(error: &FleetError) -> String {
    match error {
        FleetError::Unauthorized => "Invalid email or password.".to_owned(),
        FleetError::Network(_) => "Could not reach the server. Try again.".to_owned(),
        other => other.to_string(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let form = RwSignal::new(LoginForm::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let show_password = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let submitted = form.get_untracked();
        if let Err(e) = submitted.validate() {
            info.set(e.to_string());
            return;
        }
        busy.set(true);
        info.set("Signing in…".to_owned());

        leptos::task::spawn_local(async move {
            match crate::net::api::login(&submitted).await {
                Ok(reply) => match submitted.scope(&reply.tenant_id) {
                    Some(scope) => {
                        let email = submitted.email.trim().to_owned();
                        crate::util::storage::save_login(&scope, &email);
                        info.set("Signed in. Redirecting…".to_owned());
                        // The route gate moves a signed-in session to /monitor.
                        session.update(|s| {
                            s.context.sign_in(scope, Some(email));
                        });
                    }
                    None => info.set("The server returned an empty tenant id.".to_owned()),
                },
                Err(e) => {
                    leptos::logging::warn!("login failed: {e}");
                    info.set(login_error_text(&e));
                }
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Fleet Console"</h1>
                <p class="login-card__subtitle">"Sign in to monitor your printers"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        autocomplete="username"
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    />
                    <div class="login-input-row">
                        <input
                            class="login-input"
                            type=move || if show_password.get() { "text" } else { "password" }
                            placeholder="Password"
                            autocomplete="current-password"
                            prop:value=move || form.with(|f| f.password.clone())
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        />
                        <button class="btn btn--small" type="button" on:click=move |_| show_password.update(|v| *v = !*v)>
                            {move || if show_password.get() { "Hide" } else { "Show" }}
                        </button>
                    </div>
                    <select
                        class="login-input"
                        prop:value=move || form.with(|f| f.region.clone())
                        on:change=move |ev| form.update(|f| f.region = event_target_value(&ev))
                    >
                        <option value="">"Select region"</option>
                        {REGIONS.iter().map(|r| view! { <option value=*r>{*r}</option> }).collect_view()}
                    </select>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Company ID"
                        prop:value=move || form.with(|f| f.tenant_id.clone())
                        on:input=move |ev| form.update(|f| f.tenant_id = event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in…" } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "No account yet? "
                    <a href="/registro">"Register"</a>
                </p>
            </div>
        </div>
    }
}
