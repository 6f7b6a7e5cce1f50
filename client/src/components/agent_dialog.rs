//! Dialog showing a tenant's agent API key and setup files.
//!
//! Opened after creating a tenant and from "API key" on an existing one. The
//! key can be copied, or downloaded as a `.env` file or a JSON config for the
//! site agent.

use leptos::prelude::*;

use crate::state::console::ConsoleState;

#[component]
pub fn AgentDialog() -> impl IntoView {
    let console = expect_context::<RwSignal<ConsoleState>>();
    let copied = RwSignal::new(false);

    let close = move || {
        copied.set(false);
        console.update(|c| c.agent_dialog = None);
    };

    let on_copy = move |_| {
        let Some(key) = console.with_untracked(|c| c.agent_dialog.as_ref().map(|a| a.site_api_key.clone())) else {
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::util::download::copy_text(&key).await {
                Ok(()) => copied.set(true),
                Err(e) => console.update(|c| c.error(e)),
            }
        });
    };

    let on_env = move |_| {
        let Some(config) = console.with_untracked(|c| c.agent_dialog.clone()) else {
            return;
        };
        if let Err(e) = crate::util::download::save_text(&config.env_file_name(), &config.render_env()) {
            console.update(|c| c.error(e));
        }
    };

    let on_json = move |_| {
        let Some(config) = console.with_untracked(|c| c.agent_dialog.clone()) else {
            return;
        };
        let saved = config
            .render_json()
            .map_err(|e| e.to_string())
            .and_then(|json| crate::util::download::save_text(&config.json_file_name(), &json));
        if let Err(e) = saved {
            console.update(|c| c.error(e));
        }
    };

    move || {
        console.with(|c| c.agent_dialog.clone()).map(|config| {
            view! {
                <div class="dialog-backdrop" on:click=move |_| close()>
                    <div class="dialog dialog--agent" on:click=move |ev| ev.stop_propagation()>
                        <h2>"Agent setup"</h2>
                        <div class="dialog__row">
                            <span class="dialog__label">"Tenant"</span>
                            <span class="dialog__value">{config.tenant_name.clone()}</span>
                        </div>
                        <div class="dialog__row">
                            <span class="dialog__label">"Tenant ID"</span>
                            <span class="dialog__value dialog__value--mono">{config.tenant_id.clone()}</span>
                        </div>
                        <div class="dialog__key-box">
                            <code class="dialog__key">{config.site_api_key.clone()}</code>
                            <button class="btn" on:click=on_copy title="Copy API key">
                                {move || if copied.get() { "Copied" } else { "Copy" }}
                            </button>
                        </div>
                        <p class="dialog__hint">
                            "Install the site agent with one of these files to start reporting printers."
                        </p>
                        <div class="dialog__actions">
                            <button class="btn" on:click=on_env>"Download .env"</button>
                            <button class="btn" on:click=on_json>"Download JSON"</button>
                            <button class="btn btn--primary" on:click=move |_| close()>"Close"</button>
                        </div>
                    </div>
                </div>
            }
        })
    }
}
