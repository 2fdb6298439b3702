use yew::prelude::*;

use crate::components::admin_password_dialog::AdminPasswordDialog;
use crate::components::edit_toolbar::EditToolbar;
use crate::components::providers::{use_auth, use_edit_mode, use_language};
use crate::components::toast::use_toast;
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};

/// What pressing the edit-mode toggle should do right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleAction {
    AskPassword,
    Start,
    Exit,
}

pub fn toggle_action(is_edit_mode: bool, is_password_verified: bool) -> ToggleAction {
    if is_edit_mode {
        ToggleAction::Exit
    } else if is_password_verified {
        ToggleAction::Start
    } else {
        ToggleAction::AskPassword
    }
}

#[derive(Properties, PartialEq)]
pub struct EditModeToggleProps {
    pub page_slug: AttrValue,
}

#[function_component]
pub fn EditModeToggle(props: &EditModeToggleProps) -> Html {
    let edit = use_edit_mode();
    let auth = use_auth();
    let lang = use_language();
    let toast = use_toast();
    let token = use_cancel_token();
    let dialog_open = use_state(|| false);

    if !auth.state().is_staff() {
        return html! {};
    }

    let is_edit_mode = edit.state.is_edit_mode;
    let is_saving = edit.state.is_saving;

    let onclick = {
        let store = edit.store.clone();
        let dialog_open = dialog_open.clone();
        let toast = toast.clone();
        let token = token.clone();
        let slug = props.page_slug.clone();
        let has_unsaved = edit.state.has_unsaved_changes();
        let confirm_exit = lang.t("edit.confirm_exit").to_string();
        let action = toggle_action(is_edit_mode, edit.state.is_password_verified);
        Callback::from(move |_: MouseEvent| match action {
            ToggleAction::AskPassword => dialog_open.set(true),
            ToggleAction::Start => {
                let store = store.clone();
                let slug = slug.clone();
                let toast = toast.clone();
                spawn_cancellable(
                    &token,
                    async move { store.start_edit_mode(&slug).await },
                    move |result| match result {
                        Ok(()) => toast.success("Edit mode enabled"),
                        Err(e) => toast.error(e.to_string()),
                    },
                );
            }
            ToggleAction::Exit => {
                let confirmed = !has_unsaved
                    || web_sys::window()
                        .and_then(|w| w.confirm_with_message(&confirm_exit).ok())
                        .unwrap_or(false);
                if confirmed {
                    store.end_edit_mode();
                }
            }
        })
    };

    let close_dialog = {
        let dialog_open = dialog_open.clone();
        Callback::from(move |_| dialog_open.set(false))
    };

    let mut class = classes!("edit-mode-toggle");
    if is_edit_mode {
        class.push("active");
    }

    html! {
        <>
            <button {class} {onclick} disabled={is_saving}>
                { if is_edit_mode { lang.t("edit.exit") } else { lang.t("edit.enter") } }
            </button>
            if *dialog_open {
                <AdminPasswordDialog page_slug={props.page_slug.clone()} on_close={close_dialog} />
            }
        </>
    }
}

#[derive(Properties, PartialEq)]
pub struct EditableLayoutProps {
    pub page_slug: AttrValue,
    #[prop_or_default]
    pub children: Children,
}

/// Wraps a CMS page with the staff edit toggle and the floating toolbar.
/// Leaving the page ends any edit session that was started on it.
#[function_component]
pub fn EditableLayout(props: &EditableLayoutProps) -> Html {
    let edit = use_edit_mode();

    {
        let store = edit.store.clone();
        use_effect_with_deps(
            move |slug: &AttrValue| {
                let slug = slug.to_string();
                move || {
                    let active_here = store.snapshot().page_slug.as_deref() == Some(slug.as_str());
                    if active_here {
                        store.end_edit_mode();
                    }
                }
            },
            props.page_slug.clone(),
        );
    }

    let mut class = classes!("editable-layout");
    if edit.state.is_edit_mode {
        class.push("edit-mode-active");
    }

    html! {
        <div {class}>
            <EditModeToggle page_slug={props.page_slug.clone()} />
            {props.children.clone()}
            <EditToolbar />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_skips_the_dialog_once_verified() {
        assert_eq!(toggle_action(false, false), ToggleAction::AskPassword);
        assert_eq!(toggle_action(false, true), ToggleAction::Start);
        assert_eq!(toggle_action(true, true), ToggleAction::Exit);
    }
}
