use yew::prelude::*;

use crate::api::models::PreviewPayload;
use crate::components::providers::{use_edit_mode, use_language};
use crate::components::toast::use_toast;
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};

const PREVIEW_CHARS: usize = 40;

fn truncate(value: &str) -> String {
    if value.chars().count() <= PREVIEW_CHARS {
        return value.to_string();
    }
    let cut: String = value.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", cut)
}

/// Short human label for a value; data URLs are summarised.
pub fn describe_value(value: &str) -> String {
    if value.starts_with("data:") {
        return "[uploaded image]".to_string();
    }
    if value.is_empty() {
        return "(empty)".to_string();
    }
    truncate(value)
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Floating save / preview / discard / exit panel, shown while editing.
#[function_component]
pub fn EditToolbar() -> Html {
    let edit = use_edit_mode();
    let lang = use_language();
    let toast = use_toast();
    let token = use_cancel_token();
    let expanded = use_state(|| false);
    let preview = use_state(|| None::<PreviewPayload>);

    if !edit.state.is_edit_mode {
        return html! {};
    }

    let pending = edit.state.pending_changes.len();
    let is_saving = edit.state.is_saving;

    let on_save = {
        let store = edit.store.clone();
        let toast = toast.clone();
        let token = token.clone();
        let saved_text = lang.t("edit.saved").to_string();
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            let toast = toast.clone();
            let saved_text = saved_text.clone();
            spawn_cancellable(
                &token,
                async move { store.save_changes().await },
                move |result| match result {
                    Ok(0) => toast.info("Nothing to save"),
                    Ok(n) => toast.success(format!("{} ({})", saved_text, n)),
                    Err(e) => toast.error(format!("Save failed: {}", e)),
                },
            );
        })
    };

    let on_preview = {
        let store = edit.store.clone();
        let toast = toast.clone();
        let token = token.clone();
        let preview = preview.clone();
        Callback::from(move |_: MouseEvent| {
            let store = store.clone();
            let toast = toast.clone();
            let preview = preview.clone();
            spawn_cancellable(
                &token,
                async move { store.preview_changes().await },
                move |result| match result {
                    Ok(Some(payload)) => preview.set(Some(payload)),
                    Ok(None) => toast.info("No pending changes to preview"),
                    Err(e) => toast.error(format!("Preview failed: {}", e)),
                },
            );
        })
    };

    let on_discard = {
        let store = edit.store.clone();
        let message = lang.t("edit.confirm_discard").to_string();
        Callback::from(move |_: MouseEvent| {
            if confirm(&message) {
                store.clear_changes();
            }
        })
    };

    let on_exit = {
        let store = edit.store.clone();
        let has_unsaved = edit.state.has_unsaved_changes();
        let message = lang.t("edit.confirm_exit").to_string();
        Callback::from(move |_: MouseEvent| {
            if !has_unsaved || confirm(&message) {
                store.end_edit_mode();
            }
        })
    };

    let toggle_list = {
        let expanded = expanded.clone();
        Callback::from(move |_: MouseEvent| expanded.set(!*expanded))
    };

    let close_preview = {
        let preview = preview.clone();
        Callback::from(move |_: MouseEvent| preview.set(None))
    };

    let change_list = if *expanded && pending > 0 {
        html! {
            <ul class="edit-toolbar-changes">
                { for edit.state.pending_changes.iter().enumerate().map(|(i, change)| html! {
                    <li key={i}>
                        <span class="change-field">{format!("#{} {}", change.section_id, change.field_name)}</span>
                        <span class="change-old">{describe_value(&change.old_value)}</span>
                        {" → "}
                        <span class="change-new">{describe_value(&change.new_value)}</span>
                    </li>
                }) }
            </ul>
        }
    } else {
        html! {}
    };

    let preview_panel = match &*preview {
        Some(payload) => html! {
            <div class="modal-backdrop" onclick={close_preview.clone()}>
                <div class="modal preview-panel" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                    <div class="modal-header">
                        <h3>{lang.t("edit.preview")}</h3>
                        <button class="modal-close" onclick={close_preview}>{"×"}</button>
                    </div>
                    {
                        match (&payload.preview_url, &payload.html) {
                            (Some(url), _) => html! { <iframe class="preview-frame" src={url.clone()} /> },
                            (None, Some(markup)) => html! { <iframe class="preview-frame" srcdoc={markup.clone()} /> },
                            (None, None) => html! { <p class="muted">{"The server returned an empty preview."}</p> },
                        }
                    }
                </div>
            </div>
        },
        None => html! {},
    };

    html! {
        <>
            <div class="edit-toolbar">
                <button class="edit-toolbar-count" onclick={toggle_list} disabled={pending == 0}>
                    {format!("{} {}", pending, lang.t("edit.pending"))}
                </button>
                <button class="edit-toolbar-btn save" disabled={is_saving || pending == 0} onclick={on_save}>
                    { if is_saving { lang.t("edit.saving") } else { lang.t("edit.save") } }
                </button>
                <button class="edit-toolbar-btn" disabled={is_saving || pending == 0} onclick={on_preview}>
                    {lang.t("edit.preview")}
                </button>
                <button class="edit-toolbar-btn" disabled={is_saving || pending == 0} onclick={on_discard}>
                    {lang.t("edit.discard")}
                </button>
                <button class="edit-toolbar-btn exit" disabled={is_saving} onclick={on_exit}>
                    {lang.t("edit.exit")}
                </button>
                {change_list}
            </div>
            {preview_panel}
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_values_for_the_change_list() {
        assert_eq!(describe_value(""), "(empty)");
        assert_eq!(describe_value("data:image/png;base64,AAAA"), "[uploaded image]");
        assert_eq!(describe_value("Short"), "Short");
        let long = "é".repeat(50);
        let described = describe_value(&long);
        assert_eq!(described.chars().count(), PREVIEW_CHARS + 1);
        assert!(described.ends_with('…'));
    }
}
