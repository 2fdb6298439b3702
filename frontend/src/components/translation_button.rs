use yew::prelude::*;

use crate::components::providers::{use_language, use_translations};
use crate::components::toast::use_toast;
use crate::components::translation_manager::TranslationManager;
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};

#[derive(Properties, PartialEq)]
pub struct TranslationButtonProps {
    pub section_id: i64,
    pub field_name: AttrValue,
}

/// Per-field controls: machine-translate now, or open the manager.
#[function_component]
pub fn TranslationButton(props: &TranslationButtonProps) -> Html {
    let translations = use_translations();
    let lang = use_language();
    let toast = use_toast();
    let token = use_cancel_token();
    let manager_open = use_state(|| false);

    let loading = translations.state.is_loading(props.section_id);

    let generate = {
        let store = translations.store.clone();
        let toast = toast.clone();
        let token = token.clone();
        let section_id = props.section_id;
        let field_name = props.field_name.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            let store = store.clone();
            let toast = toast.clone();
            let field_name = field_name.clone();
            spawn_cancellable(
                &token,
                async move { store.generate_all(section_id, &field_name).await },
                move |result| match result {
                    Ok(list) => toast.success(format!("Generated {} translation(s)", list.len())),
                    Err(e) => toast.error(format!("Translation failed: {}", e)),
                },
            );
        })
    };

    let open_manager = {
        let manager_open = manager_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            manager_open.set(true);
        })
    };

    let close_manager = {
        let manager_open = manager_open.clone();
        Callback::from(move |_| manager_open.set(false))
    };

    html! {
        <span class="translation-controls">
            <button
                class="translation-btn"
                title={lang.t("translate.button")}
                disabled={loading}
                onclick={generate}
            >
                { if loading { "…" } else { "🌐" } }
            </button>
            <button class="translation-btn" title={lang.t("translate.manage")} onclick={open_manager}>
                {"⋯"}
            </button>
            if *manager_open {
                <TranslationManager
                    section_id={props.section_id}
                    field_name={props.field_name.clone()}
                    on_close={close_manager}
                />
            }
        </span>
    }
}
