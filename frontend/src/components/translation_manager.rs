use std::collections::HashMap;

use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::api::models::Translation;
use crate::components::providers::{use_language, use_translations};
use crate::components::toast::use_toast;
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};

#[derive(Properties, PartialEq)]
pub struct TranslationManagerProps {
    pub section_id: i64,
    pub field_name: AttrValue,
    pub on_close: Callback<()>,
}

/// Translations of one field, newest first within each language.
pub fn translations_for_field<'a>(all: &'a [Translation], field_name: &str) -> Vec<&'a Translation> {
    let mut rows: Vec<&Translation> = all
        .iter()
        .filter(|t| t.field_name.is_empty() || t.field_name == field_name)
        .collect();
    rows.sort_by(|a, b| a.language.cmp(&b.language).then(b.updated_at.cmp(&a.updated_at)));
    rows
}

#[function_component]
pub fn TranslationManager(props: &TranslationManagerProps) -> Html {
    let translations = use_translations();
    let lang = use_language();
    let toast = use_toast();
    let token = use_cancel_token();
    // translation id -> draft text while a row is being edited
    let drafts = use_state(HashMap::<i64, String>::new);

    // Fetch on open, drop the cache on close
    {
        let store = translations.store.clone();
        let toast = toast.clone();
        let token = token.clone();
        use_effect_with_deps(
            move |section_id| {
                let section_id = *section_id;
                let fetch_store = store.clone();
                spawn_cancellable(
                    &token,
                    async move { fetch_store.fetch_for_section(section_id).await },
                    move |result| {
                        if let Err(e) = result {
                            toast.error(format!("Could not load translations: {}", e));
                        }
                    },
                );
                move || store.invalidate(section_id)
            },
            props.section_id,
        );
    }

    let section_id = props.section_id;
    let loading = translations.state.is_loading(section_id);
    let all = translations
        .state
        .by_section
        .get(&section_id)
        .cloned()
        .unwrap_or_default();
    let rows = translations_for_field(&all, &props.field_name);

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let render_row = |t: &Translation| {
        let id = t.id;
        let editing = drafts.get(&id).cloned();

        let start_edit = {
            let drafts = drafts.clone();
            let content = t.translated_content.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*drafts).clone();
                next.insert(id, content.clone());
                drafts.set(next);
            })
        };

        let on_draft = {
            let drafts = drafts.clone();
            Callback::from(move |e: InputEvent| {
                let value = e.target_unchecked_into::<HtmlTextAreaElement>().value();
                let mut next = (*drafts).clone();
                next.insert(id, value);
                drafts.set(next);
            })
        };

        let save = {
            let drafts = drafts.clone();
            let store = translations.store.clone();
            let toast = toast.clone();
            let token = token.clone();
            Callback::from(move |_: MouseEvent| {
                let Some(content) = drafts.get(&id).cloned() else {
                    return;
                };
                let store = store.clone();
                let toast = toast.clone();
                let drafts = drafts.clone();
                spawn_cancellable(
                    &token,
                    async move { store.update_translation(section_id, id, &content).await },
                    move |result| match result {
                        Ok(_) => {
                            let mut next = (*drafts).clone();
                            next.remove(&id);
                            drafts.set(next);
                            toast.success("Translation saved");
                        }
                        Err(e) => toast.error(format!("Failed to save translation: {}", e)),
                    },
                );
            })
        };

        let regenerate = {
            let store = translations.store.clone();
            let toast = toast.clone();
            let token = token.clone();
            Callback::from(move |_: MouseEvent| {
                let store = store.clone();
                let toast = toast.clone();
                spawn_cancellable(
                    &token,
                    async move { store.regenerate(section_id, id).await },
                    move |result| match result {
                        Ok(_) => toast.success("Translation regenerated"),
                        Err(e) => toast.error(format!("Failed to regenerate: {}", e)),
                    },
                );
            })
        };

        let cancel_edit = {
            let drafts = drafts.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = (*drafts).clone();
                next.remove(&id);
                drafts.set(next);
            })
        };

        html! {
            <div class="translation-row" key={id}>
                <div class="translation-row-header">
                    <span class="translation-lang">{t.language.to_uppercase()}</span>
                    if t.is_manual_override {
                        <span class="badge badge-manual">{"manual"}</span>
                    } else if t.is_auto_generated {
                        <span class="badge badge-auto">{"auto"}</span>
                    }
                    <span class="translation-updated">{t.updated_label()}</span>
                </div>
                {
                    match editing {
                        Some(draft) => html! {
                            <>
                                <textarea class="editable-input editable-textarea" value={draft} oninput={on_draft} />
                                <div class="translation-actions">
                                    <button class="editable-btn editable-btn-save" disabled={loading} onclick={save}>{lang.t("edit.save")}</button>
                                    <button class="editable-btn editable-btn-cancel" onclick={cancel_edit}>{lang.t("common.cancel")}</button>
                                </div>
                            </>
                        },
                        None => html! {
                            <>
                                <p class="translation-content">{t.translated_content.clone()}</p>
                                <div class="translation-actions">
                                    <button class="editable-btn" onclick={start_edit}>{"Edit"}</button>
                                    <button class="editable-btn" disabled={loading} onclick={regenerate}>{"Regenerate"}</button>
                                </div>
                            </>
                        },
                    }
                }
            </div>
        }
    };

    html! {
        <div class="modal-backdrop" onclick={close.clone()}>
            <div class="modal translation-manager" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <div class="modal-header">
                    <h3>{format!("{} · {}", lang.t("translate.manage"), props.field_name)}</h3>
                    <button class="modal-close" onclick={close}>{"×"}</button>
                </div>
                if loading && rows.is_empty() {
                    <p class="muted">{lang.t("common.loading")}</p>
                } else if rows.is_empty() {
                    <p class="muted">{"No translations yet. Use 🌐 to generate them."}</p>
                } else {
                    { for rows.into_iter().map(render_row) }
                }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t(id: i64, language: &str, field_name: &str, day: u32) -> Translation {
        Translation {
            id,
            language: language.into(),
            translated_content: String::new(),
            is_auto_generated: true,
            is_manual_override: false,
            updated_at: Some(Utc.with_ymd_and_hms(2026, 5, day, 0, 0, 0).unwrap()),
            field_name: field_name.into(),
        }
    }

    #[test]
    fn filters_by_field_and_orders_by_language() {
        let all = vec![t(1, "fr", "content", 1), t(2, "de", "content", 1), t(3, "fr", "title", 1), t(4, "fr", "content", 3)];
        let ids: Vec<i64> = translations_for_field(&all, "content").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4, 1]);
    }
}
