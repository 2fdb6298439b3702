use web_sys::{HtmlElement, HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::providers::{use_edit_mode, use_language};
use crate::components::translation_button::TranslationButton;
use crate::state::edit_mode::{EditModeState, PendingChange};
use crate::state::field_editor::{BlurAction, FieldEditor, KeyAction};

#[derive(Properties, PartialEq)]
pub struct EditableTextProps {
    pub section_id: i64,
    pub field_name: AttrValue,
    pub value: AttrValue,
    #[prop_or_default]
    pub multiline: bool,
    #[prop_or(AttrValue::from("span"))]
    pub tag: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub placeholder: AttrValue,
}

/// Latest staged value for a field, if it has unsaved edits.
pub fn staged_value(state: &EditModeState, section_id: i64, field_name: &str) -> Option<String> {
    state
        .pending_changes
        .iter()
        .rev()
        .find(|c| c.section_id == section_id && c.field_name == field_name)
        .map(|c| c.new_value.clone())
}

/// Text to render for a field: its value, or the placeholder while it is empty.
/// The flag is set when the placeholder is what gets shown.
pub fn display_text<'a>(value: &'a str, placeholder: &'a str) -> (&'a str, bool) {
    if value.is_empty() {
        (placeholder, true)
    } else {
        (value, false)
    }
}

#[function_component]
pub fn EditableText(props: &EditableTextProps) -> Html {
    let edit = use_edit_mode();
    let lang = use_language();
    let editor = use_mut_ref(|| FieldEditor::new(props.multiline));
    let rerender = use_force_update();
    let input_ref = use_node_ref();

    let can_edit = edit.state.can_edit();
    let displayed = staged_value(&edit.state, props.section_id, &props.field_name)
        .unwrap_or_else(|| props.value.to_string());

    // Leaving edit mode abandons any open editor
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
    {
        let input_ref = input_ref.clone();
        use_effect_with_deps(
            move |editing| {
                if *editing {
                    if let Some(input) = input_ref.cast::<HtmlElement>() {
                        let _ = input.focus();
                    }
                }
                || ()
            },
            is_editing,
        );
    }

    let commit = {
        let editor = editor.clone();
        let store = edit.store.clone();
        let rerender = rerender.clone();
        let section_id = props.section_id;
        let field_name = props.field_name.clone();
        Callback::from(move |_: ()| {
            let edited = editor.borrow_mut().commit();
            if let Some(edited) = edited {
                store.add_change(PendingChange::update(
                    section_id,
                    field_name.to_string(),
                    edited.old_value,
                    edited.new_value,
                ));
            }
            rerender.force_update();
        })
    };

    let cancel = {
        let editor = editor.clone();
        let rerender = rerender.clone();
        Callback::from(move |_: ()| {
            editor.borrow_mut().cancel();
            rerender.force_update();
        })
    };

    if is_editing {
        let oninput = {
            let editor = editor.clone();
            let rerender = rerender.clone();
            let multiline = props.multiline;
            Callback::from(move |e: InputEvent| {
                let value = if multiline {
                    e.target_unchecked_into::<HtmlTextAreaElement>().value()
                } else {
                    e.target_unchecked_into::<HtmlInputElement>().value()
                };
                editor.borrow_mut().set_draft(value);
                rerender.force_update();
            })
        };

        let onkeydown = {
            let editor = editor.clone();
            let commit = commit.clone();
            let cancel = cancel.clone();
            Callback::from(move |e: KeyboardEvent| {
                let action = editor.borrow().on_key(&e.key(), e.ctrl_key() || e.meta_key());
                match action {
                    KeyAction::Commit => {
                        e.prevent_default();
                        commit.emit(());
                    }
                    KeyAction::Cancel => {
                        e.prevent_default();
                        cancel.emit(());
                    }
                    KeyAction::None => {}
                }
            })
        };

        let onblur = {
            let editor = editor.clone();
            let commit = commit.clone();
            Callback::from(move |_: FocusEvent| {
                let action = editor.borrow().on_blur();
                if action == BlurAction::Commit {
                    commit.emit(());
                }
            })
        };

        // mousedown lands before the input's blur
        let arm = {
            let editor = editor.clone();
            Callback::from(move |_: MouseEvent| editor.borrow_mut().arm_button())
        };

        let draft = editor.borrow().draft().to_string();
        let field = if props.multiline {
            html! {
                <textarea
                    ref={input_ref}
                    class="editable-input editable-textarea"
                    value={draft}
                    placeholder={props.placeholder.clone()}
                    {oninput}
                    {onkeydown}
                    {onblur}
                />
            }
        } else {
            html! {
                <input
                    ref={input_ref}
                    type="text"
                    class="editable-input"
                    value={draft}
                    placeholder={props.placeholder.clone()}
                    {oninput}
                    {onkeydown}
                    {onblur}
                />
            }
        };

        return html! {
            <span class="editable-editing">
                {field}
                <span class="editable-actions">
                    <button
                        class="editable-btn editable-btn-save"
                        onmousedown={arm.clone()}
                        onclick={commit.reform(|_: MouseEvent| ())}
                    >
                        {lang.t("edit.save")}
                    </button>
                    <button
                        class="editable-btn editable-btn-cancel"
                        onmousedown={arm}
                        onclick={cancel.reform(|_: MouseEvent| ())}
                    >
                        {lang.t("common.cancel")}
                    </button>
                </span>
                if props.multiline {
                    <span class="editable-hint">{"Ctrl+Enter to save, Esc to cancel"}</span>
                }
            </span>
        };
    }

    let ondblclick = {
        let editor = editor.clone();
        let rerender = rerender.clone();
        let displayed = displayed.clone();
        Callback::from(move |e: MouseEvent| {
            let started = editor.borrow_mut().begin(&displayed, can_edit);
            if started {
                e.prevent_default();
                e.stop_propagation();
                rerender.force_update();
            }
        })
    };

    let mut class = props.class.clone();
    if can_edit {
        class.push("editable-hover");
    }
    if props.multiline {
        class.push("editable-multiline");
    }
    let (text, show_placeholder) = display_text(&displayed, &props.placeholder);
    let text = text.to_string();
    let title = if can_edit { "Double-click to edit" } else { "" };

    html! {
        <>
            <@{props.tag.to_string()} {class} {ondblclick} title={title}>
                if show_placeholder {
                    <span class={classes!(can_edit.then(|| "editable-placeholder"))}>{text}</span>
                } else {
                    {text}
                }
            </@>
            if can_edit {
                <TranslationButton section_id={props.section_id} field_name={props.field_name.clone()} />
            }
        </>
    }
}
