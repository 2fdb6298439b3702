use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::editable_text::staged_value;
use crate::components::providers::{use_edit_mode, use_language};
use crate::components::toast::use_toast;
use crate::state::edit_mode::PendingChange;
use crate::state::field_editor::{FieldEditor, UploadError};
use crate::utils::file::read_image_as_data_url;

#[derive(Properties, PartialEq)]
pub struct EditableImageProps {
    pub section_id: i64,
    #[prop_or(AttrValue::from("imageUrl"))]
    pub field_name: AttrValue,
    pub src: AttrValue,
    /// Shown while the field has no image.
    #[prop_or_default]
    pub fallback_src: AttrValue,
    #[prop_or_default]
    pub alt: AttrValue,
    #[prop_or_default]
    pub class: Classes,
}

#[function_component]
pub fn EditableImage(props: &EditableImageProps) -> Html {
    let edit = use_edit_mode();
    let lang = use_language();
    let toast = use_toast();
    let editor = use_mut_ref(|| FieldEditor::new(false));
    let rerender = use_force_update();

    let can_edit = edit.state.can_edit();
    let displayed = staged_value(&edit.state, props.section_id, &props.field_name)
        .unwrap_or_else(|| props.src.to_string());

    {
        let editor = editor.clone();
        use_effect_with_deps(
            move |can_edit| {
                if !*can_edit {
                    editor.borrow_mut().cancel();
                }
                || ()
            },
            can_edit,
        );
    }

    let is_editing = editor.borrow().is_editing();

    if !is_editing {
        let onclick = {
            let editor = editor.clone();
            let rerender = rerender.clone();
            let displayed = displayed.clone();
            Callback::from(move |e: MouseEvent| {
                let started = editor.borrow_mut().begin(&displayed, can_edit);
                if started {
                    e.prevent_default();
                    rerender.force_update();
                }
            })
        };
        let mut class = props.class.clone();
        if can_edit {
            class.push("editable-hover");
        }
        let src = if displayed.is_empty() { props.fallback_src.to_string() } else { displayed };
        return html! {
            <img
                {class}
                {src}
                alt={props.alt.clone()}
                title={if can_edit { "Click to change image" } else { "" }}
                {onclick}
            />
        };
    }

    let draft = editor.borrow().draft().to_string();

    let on_url = {
        let editor = editor.clone();
        let rerender = rerender.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            editor.borrow_mut().set_draft(value);
            rerender.force_update();
        })
    };

    let on_file = {
        let editor = editor.clone();
        let rerender = rerender.clone();
        let toast = toast.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let editor = editor.clone();
            let rerender = rerender.clone();
            let toast = toast.clone();
            read_image_as_data_url(
                file,
                Callback::from(move |result: Result<String, UploadError>| match result {
                    Ok(data_url) => {
                        editor.borrow_mut().set_draft(data_url);
                        rerender.force_update();
                    }
                    Err(e) => toast.error(e.to_string()),
                }),
            );
            input.set_value("");
        })
    };

    let confirm = {
        let editor = editor.clone();
        let rerender = rerender.clone();
        let store = edit.store.clone();
        let toast = toast.clone();
        let section_id = props.section_id;
        let field_name = props.field_name.clone();
        Callback::from(move |_: MouseEvent| {
            let committed = editor.borrow_mut().commit_image();
            match committed {
                Ok(Some(edited)) => {
                    store.add_change(PendingChange::update(
                        section_id,
                        field_name.to_string(),
                        edited.old_value,
                        edited.new_value,
                    ));
                }
                Ok(None) => {}
                Err(e) => {
                    toast.error(e.to_string());
                    return;
                }
            }
            rerender.force_update();
        })
    };

    let cancel = {
        let editor = editor.clone();
        let rerender = rerender.clone();
        Callback::from(move |_: MouseEvent| {
            editor.borrow_mut().cancel();
            rerender.force_update();
        })
    };

    // Don't echo multi-megabyte data URLs into the text box
    let url_value = if draft.starts_with("data:") { String::new() } else { draft.clone() };

    html! {
        <div class="editable-image-editor">
            <img class="editable-image-preview" src={draft} alt={props.alt.clone()} />
            <label class="editable-label">{"Image URL"}</label>
            <input
                type="url"
                class="editable-input"
                placeholder="https://..."
                value={url_value}
                oninput={on_url}
            />
            <label class="editable-label">{"…or upload (max 5 MB)"}</label>
            <input type="file" accept="image/*" onchange={on_file} />
            <div class="editable-actions">
                <button class="editable-btn editable-btn-save" onclick={confirm}>{lang.t("common.confirm")}</button>
                <button class="editable-btn editable-btn-cancel" onclick={cancel}>{lang.t("common.cancel")}</button>
            </div>
        </div>
    }
}
