use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::providers::{use_edit_mode, use_language};
use crate::components::toast::use_toast;
use crate::state::edit_mode::EditModeError;
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};

#[derive(Properties, PartialEq)]
pub struct AdminPasswordDialogProps {
    pub page_slug: AttrValue,
    pub on_close: Callback<()>,
}

/// Asked once per tab: verifies the admin password, then starts edit mode
/// for the current page.
#[function_component]
pub fn AdminPasswordDialog(props: &AdminPasswordDialogProps) -> Html {
    let edit = use_edit_mode();
    let lang = use_language();
    let toast = use_toast();
    let token = use_cancel_token();
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let is_loading = use_state(|| false);
    let input_ref = use_node_ref();

    {
        let input_ref = input_ref.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                    let _ = input.focus();
                }
                || ()
            },
            (),
        );
    }

    let submit = {
        let store = edit.store.clone();
        let password = password.clone();
        let error = error.clone();
        let is_loading = is_loading.clone();
        let toast = toast.clone();
        let token = token.clone();
        let on_close = props.on_close.clone();
        let page_slug = props.page_slug.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *is_loading {
                return;
            }
            is_loading.set(true);
            error.set(None);

            let store = store.clone();
            let pw = (*password).clone();
            let slug = page_slug.clone();
            let error = error.clone();
            let is_loading = is_loading.clone();
            let toast = toast.clone();
            let on_close = on_close.clone();
            spawn_cancellable(
                &token,
                async move {
                    if !store.snapshot().is_password_verified {
                        store.verify_password(&pw).await?;
                    }
                    store.start_edit_mode(&slug).await
                },
                move |result: Result<(), EditModeError>| {
                    is_loading.set(false);
                    match result {
                        Ok(()) => {
                            toast.success("Edit mode enabled");
                            on_close.emit(());
                        }
                        Err(e) => {
                            error.set(Some(e.to_string()));
                            toast.error(e.to_string());
                        }
                    }
                },
            );
        })
    };

    let oninput = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            password.set(e.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    let onkeydown = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                on_close.emit(());
            }
        })
    };

    let cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal password-dialog">
                <h3>{lang.t("password.title")}</h3>
                <form onsubmit={submit}>
                    <input
                        ref={input_ref}
                        type="password"
                        class="editable-input"
                        autocomplete="current-password"
                        value={(*password).clone()}
                        disabled={*is_loading}
                        {oninput}
                        {onkeydown}
                    />
                    {
                        match (*error).as_ref() {
                            Some(err) => html! { <div class="form-error">{err.clone()}</div> },
                            None => html! {},
                        }
                    }
                    <div class="modal-actions">
                        <button type="button" class="editable-btn editable-btn-cancel" onclick={cancel}>
                            {lang.t("common.cancel")}
                        </button>
                        <button type="submit" class="editable-btn editable-btn-save" disabled={*is_loading}>
                            { if *is_loading { lang.t("common.loading") } else { lang.t("password.submit") } }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
