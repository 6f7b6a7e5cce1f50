//! Tenant sidebar: folder navigation, tenant list and tenant creation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Folders are a console-side grouping of tenants. The sidebar browses one
//! folder at a time; tenants with no folder show at the root. Every change is
//! emitted as a [`FolderOp`] through `on_folder_op`, so the page decides how
//! it reaches the backend.

#[cfg(test)]
#[path = "tenant_sidebar_test.rs"]
mod tenant_sidebar_test;

use fleet::folders::{FolderOp, FolderTree};
use leptos::prelude::*;

use crate::state::console::ConsoleState;
use crate::state::folders::FolderState;
use crate::state::session::SessionState;

/// Select value meaning "no folder".
const ROOT_VALUE: &str = "";

/// Every folder as `(id, "Parent / Child")`, sorted by path.
fn folder_choices(tree: &FolderTree) -> Vec<(String, String)> {
    let mut choices: Vec<(String, String)> = tree
        .folders()
        .iter()
        .map(|folder| {
            let label = tree.folder_path(&folder.id).map_or_else(
                |_| folder.name.clone(),
                |path| path.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(" / "),
            );
            (folder.id.clone(), label)
        })
        .collect();
    choices.sort_by(|a, b| a.1.cmp(&b.1));
    choices
}

/// Move targets for `folder_id`: the root plus every folder outside its
/// own subtree.
fn move_targets(tree: &FolderTree, folder_id: &str) -> Vec<(String, String)> {
    let excluded: Vec<&str> = tree
        .descendants(folder_id)
        .into_iter()
        .map(|f| f.id.as_str())
        .chain(std::iter::once(folder_id))
        .collect();
    folder_choices(tree)
        .into_iter()
        .filter(|(id, _)| !excluded.contains(&id.as_str()))
        .collect()
}

fn parse_target(value: &str) -> Option<String> {
    (value != ROOT_VALUE).then(|| value.to_owned())
}

#[component]
pub fn TenantSidebar(
    on_select: Callback<String>,
    on_create_tenant: Callback<String>,
    on_folder_op: Callback<FolderOp>,
    on_sign_out: Callback<()>,
) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let console = expect_context::<RwSignal<ConsoleState>>();
    let folders = expect_context::<RwSignal<FolderState>>();

    let tenant_name = RwSignal::new(String::new());
    let folder_name = RwSignal::new(String::new());

    let on_new_tenant = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = tenant_name.get_untracked();
        if !name.trim().is_empty() {
            tenant_name.set(String::new());
            on_create_tenant.run(name);
        }
    };

    let on_new_folder = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = folder_name.get_untracked();
        folder_name.set(String::new());
        let parent_id = folders.with_untracked(|f| f.current.clone());
        on_folder_op.run(FolderOp::Create { name, parent_id });
    };

    let email = move || {
        session.with(|s| s.context.user_email().map(str::to_owned)).unwrap_or_default()
    };
    let scope_text = move || {
        session.with(|s| {
            s.scope()
                .map(|scope| format!("{} · {}", scope.tenant_id, scope.region))
                .unwrap_or_default()
        })
    };

    // A looping parent chain is corrupt backend data; report it once per change.
    Effect::new(move || {
        if let Err(e) = folders.with(FolderState::breadcrumb) {
            leptos::logging::error!("folder tree is inconsistent: {e}");
            console.update(|c| c.error(format!("Folder tree is inconsistent: {e}")));
        }
    });

    let breadcrumb = move || {
        folders
            .with(FolderState::breadcrumb)
            .unwrap_or_default()
            .into_iter()
            .map(|folder| {
                let id = folder.id.clone();
                view! {
                    <span class="crumb-sep">"/"</span>
                    <button class="crumb" on:click=move |_| folders.update(|f| f.open(Some(id.clone())))>
                        {folder.name}
                    </button>
                }
            })
            .collect_view()
    };

    let subfolders = move || {
        let (list, targets) = folders.with(|f| {
            let list = f.subfolders();
            let targets: Vec<_> = list
                .iter()
                .map(|folder| move_targets(f.ledger.tree(), &folder.id))
                .collect();
            (list, targets)
        });
        list.into_iter()
            .zip(targets)
            .map(|(folder, targets)| {
                let open_id = folder.id.clone();
                let rename_id = folder.id.clone();
                let delete_id = folder.id.clone();
                let move_id = folder.id.clone();
                let current_name = folder.name.clone();
                let rename = move |_| {
                    if let Some(name) = crate::util::prompt::ask("Folder name", &current_name) {
                        on_folder_op.run(FolderOp::Rename { id: rename_id.clone(), name });
                    }
                };
                view! {
                    <li class="folder-row">
                        <button class="folder-row__open" on:click=move |_| folders.update(|f| f.open(Some(open_id.clone())))>
                            "📁 " {folder.name.clone()}
                        </button>
                        <select
                            class="folder-row__move"
                            title="Move folder"
                            on:change=move |ev| {
                                let parent_id = parse_target(&event_target_value(&ev));
                                on_folder_op.run(FolderOp::Move { id: move_id.clone(), parent_id });
                            }
                        >
                            <option value="" selected=folder.parent_id.is_none()>"(top level)"</option>
                            {targets
                                .into_iter()
                                .map(|(id, label)| {
                                    let selected = folder.parent_id.as_deref() == Some(id.as_str());
                                    view! { <option value=id selected=selected>{label}</option> }
                                })
                                .collect_view()}
                        </select>
                        <button class="btn btn--small" on:click=rename>"Rename"</button>
                        <button
                            class="btn btn--small btn--danger"
                            on:click=move |_| on_folder_op.run(FolderOp::Delete { id: delete_id.clone() })
                        >
                            "Delete"
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    let tenants = move || {
        let all = console.with(|c| c.tenants.clone());
        let (visible, choices) = folders.with(|f| (f.visible_tenants(&all), folder_choices(f.ledger.tree())));
        let filed_in = folders.with(|f| f.current.clone());
        visible
            .into_iter()
            .map(|tenant| {
                let select_id = tenant.id.clone();
                let assign_id = tenant.id.clone();
                let is_selected = {
                    let id = tenant.id.clone();
                    move || console.with(|c| c.selected.as_deref() == Some(id.as_str()))
                };
                let choices = choices.clone();
                let filed_in = filed_in.clone();
                view! {
                    <li class="tenant-row" class:tenant-row--selected=is_selected>
                        <button class="tenant-row__name" on:click=move |_| on_select.run(select_id.clone())>
                            {tenant.name.clone()}
                        </button>
                        <select
                            class="tenant-row__folder"
                            title="File in folder"
                            on:change=move |ev| {
                                let folder_id = parse_target(&event_target_value(&ev));
                                on_folder_op.run(FolderOp::Assign { tenant_id: assign_id.clone(), folder_id });
                            }
                        >
                            <option value="" selected=filed_in.is_none()>"(no folder)"</option>
                            {choices
                                .into_iter()
                                .map(|(id, label)| {
                                    let selected = filed_in.as_deref() == Some(id.as_str());
                                    view! { <option value=id selected=selected>{label}</option> }
                                })
                                .collect_view()}
                        </select>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <aside class="sidebar">
            <div class="sidebar__account">
                <span class="sidebar__email">{email}</span>
                <span class="sidebar__scope">{scope_text}</span>
                <button class="btn btn--small" on:click=move |_| on_sign_out.run(())>"Sign out"</button>
            </div>

            <form class="sidebar__form" on:submit=on_new_tenant>
                <input
                    class="input"
                    placeholder="New tenant name"
                    prop:value=move || tenant_name.get()
                    on:input=move |ev| tenant_name.set(event_target_value(&ev))
                />
                <button class="btn btn--primary" type="submit" disabled=move || console.with(|c| c.tenant_busy)>
                    "Create"
                </button>
            </form>

            <nav class="sidebar__crumbs">
                <button class="crumb" on:click=move |_| folders.update(|f| f.open(None))>"All"</button>
                {breadcrumb}
                <Show when=move || folders.with(|f| f.current.is_some())>
                    <button class="btn btn--small" on:click=move |_| folders.update(FolderState::up)>"Up"</button>
                </Show>
            </nav>

            <ul class="sidebar__folders">{subfolders}</ul>

            <form class="sidebar__form" on:submit=on_new_folder>
                <input
                    class="input"
                    placeholder="New folder"
                    prop:value=move || folder_name.get()
                    on:input=move |ev| folder_name.set(event_target_value(&ev))
                />
                <button class="btn" type="submit" disabled=move || folders.with(FolderState::busy)>
                    "Add folder"
                </button>
            </form>

            <Show when=move || console.with(|c| c.tenants_loading)>
                <p class="sidebar__loading">"Loading tenants…"</p>
            </Show>
            <ul class="sidebar__tenants">{tenants}</ul>
        </aside>
    }
}
