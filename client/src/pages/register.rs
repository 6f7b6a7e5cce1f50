//! Registration wizard: account, company, confirm.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use fleet::auth::{REGIONS, RegistrationWizard, WizardStep};
use leptos::prelude::*;

const STEPS: [WizardStep; 3] = [WizardStep::Credentials, WizardStep::Company, WizardStep::Confirm];

fn step_class(step: WizardStep, current: WizardStep) -> &'static str {
    if step.index() < current.index() {
        "wizard-step wizard-step--done"
    } else if step == current {
        "wizard-step wizard-step--active"
    } else {
        "wizard-step"
    }
}

/// Password masked for the confirm step.
fn masked(password: &str) -> String {
    "•".repeat(password.chars().count())
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let wizard = RwSignal::new(RegistrationWizard::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let step = move || wizard.with(RegistrationWizard::step);

    let on_next = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        match wizard.try_update(RegistrationWizard::next) {
            Some(Err(e)) => info.set(e.to_string()),
            _ => info.set(String::new()),
        }
    };

    let on_back = move |_| {
        info.set(String::new());
        wizard.update(|w| {
            w.back();
        });
    };

    let on_register = move |_| {
        if busy.get_untracked() {
            return;
        }
        let payload = match wizard.with_untracked(RegistrationWizard::payload) {
            Ok(payload) => payload,
            Err(e) => {
                info.set(e.to_string());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account…".to_owned());
        leptos::task::spawn_local(async move {
            match crate::net::api::register(&payload).await {
                Ok(()) => {
                    wizard.update(RegistrationWizard::complete);
                    info.set(String::new());
                }
                Err(e) => {
                    leptos::logging::warn!("registration failed: {e}");
                    info.set(e.to_string());
                }
            }
            busy.set(false);
        });
    };

    let field = move |label: &'static str, kind: &'static str, get: fn(&RegistrationWizard) -> String, set: fn(&mut RegistrationWizard, String)| {
        view! {
            <label class="wizard-field">
                <span>{label}</span>
                <input
                    class="login-input"
                    type=kind
                    prop:value=move || wizard.with(get)
                    on:input=move |ev| wizard.update(|w| set(w, event_target_value(&ev)))
                />
            </label>
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card login-card--wide">
                <h1>"Create account"</h1>
                <ol class="wizard-steps">
                    {STEPS
                        .into_iter()
                        .map(|s| view! { <li class=move || step_class(s, step())>{s.title()}</li> })
                        .collect_view()}
                </ol>

                <Show when=move || step() == WizardStep::Credentials>
                    <form class="login-form" on:submit=on_next>
                        {field("Email", "email", |w| w.email.clone(), |w, v| w.email = v)}
                        {field("Password", "password", |w| w.password.clone(), |w, v| w.password = v)}
                        {field("Confirm password", "password", |w| w.confirm_password.clone(), |w, v| w.confirm_password = v)}
                        <button class="login-button" type="submit">"Next"</button>
                    </form>
                </Show>

                <Show when=move || step() == WizardStep::Company>
                    <form class="login-form" on:submit=on_next>
                        {field("Company ID", "text", |w| w.tenant_id.clone(), |w, v| w.tenant_id = v)}
                        <label class="wizard-field">
                            <span>"Region"</span>
                            <select
                                class="login-input"
                                prop:value=move || wizard.with(|w| w.region.clone())
                                on:change=move |ev| wizard.update(|w| w.region = event_target_value(&ev))
                            >
                                <option value="">"Select region"</option>
                                {REGIONS.iter().map(|r| view! { <option value=*r>{*r}</option> }).collect_view()}
                            </select>
                        </label>
                        <div class="wizard-actions">
                            <button class="btn" type="button" on:click=on_back>"Back"</button>
                            <button class="login-button" type="submit">"Next"</button>
                        </div>
                    </form>
                </Show>

                <Show when=move || step() == WizardStep::Confirm>
                    <dl class="wizard-summary">
                        <dt>"Email"</dt>
                        <dd>{move || wizard.with(|w| w.email.clone())}</dd>
                        <dt>"Password"</dt>
                        <dd>{move || wizard.with(|w| masked(&w.password))}</dd>
                        <dt>"Company ID"</dt>
                        <dd>{move || wizard.with(|w| w.tenant_id.clone())}</dd>
                        <dt>"Region"</dt>
                        <dd>{move || wizard.with(|w| w.region.clone())}</dd>
                    </dl>
                    <div class="wizard-actions">
                        <button class="btn" type="button" disabled=move || busy.get() on:click=on_back>"Back"</button>
                        <button class="login-button" type="button" disabled=move || busy.get() on:click=on_register>
                            {move || if busy.get() { "Creating…" } else { "Create account" }}
                        </button>
                    </div>
                </Show>

                <Show when=move || step() == WizardStep::Done>
                    <div class="wizard-done">
                        <p>"Your account is ready."</p>
                        <a class="login-button" href="/login">"Go to sign in"</a>
                    </div>
                </Show>

                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__footer">
                    "Already registered? "
                    <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
