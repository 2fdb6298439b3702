use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::config::TOAST_DURATION_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, PartialEq)]
pub struct Toaster {
    push: Callback<(ToastKind, String)>,
}

impl Toaster {
    pub fn success(&self, message: impl Into<String>) {
        self.push.emit((ToastKind::Success, message.into()));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push.emit((ToastKind::Error, message.into()));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push.emit((ToastKind::Info, message.into()));
    }
}

/// Toaster from the nearest `ToastProvider`; falls back to logging.
#[hook]
pub fn use_toast() -> Toaster {
    use_context::<Toaster>().unwrap_or_else(|| Toaster {
        push: Callback::from(|(kind, message): (ToastKind, String)| {
            log::warn!("Toast without provider ({:?}): {}", kind, message);
        }),
    })
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component]
pub fn ToastProvider(props: &ToastProviderProps) -> Html {
    let toasts = use_reducer(ToastList::default);
    let next_id = use_mut_ref(|| 0u32);

    // Built once so consumers of the context don't re-render on every toast
    let toaster = {
        let dispatcher = toasts.dispatcher();
        use_memo(
            move |_| {
                let push = Callback::from(move |(kind, message): (ToastKind, String)| {
                    let id = {
                        let mut next = next_id.borrow_mut();
                        *next += 1;
                        *next
                    };
                    dispatcher.dispatch(ToastAction::Push(Toast { id, kind, message }));
                    let dispatcher = dispatcher.clone();
                    Timeout::new(TOAST_DURATION_MS, move || {
                        dispatcher.dispatch(ToastAction::Dismiss(id));
                    })
                    .forget();
                });
                Toaster { push }
            },
            (),
        )
    };

    let dismiss = |id: u32| {
        let toasts = toasts.clone();
        Callback::from(move |_: MouseEvent| toasts.dispatch(ToastAction::Dismiss(id)))
    };

    html! {
        <ContextProvider<Toaster> context={(*toaster).clone()}>
            {props.children.clone()}
            <div class="toast-stack">
                { for toasts.items.iter().map(|toast| {
                    let class = match toast.kind {
                        ToastKind::Success => "toast toast-success",
                        ToastKind::Error => "toast toast-error",
                        ToastKind::Info => "toast toast-info",
                    };
                    html! {
                        <div key={toast.id} class={class} onclick={dismiss(toast.id)}>
                            {toast.message.clone()}
                        </div>
                    }
                }) }
            </div>
        </ContextProvider<Toaster>>
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct ToastList {
    pub items: Vec<Toast>,
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(u32),
}

impl Reducible for ToastList {
    type Action = ToastAction;

    fn reduce(self: std::rc::Rc<Self>, action: Self::Action) -> std::rc::Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(toast) => next.items.push(toast),
            ToastAction::Dismiss(id) => next.items.retain(|t| t.id != id),
        }
        std::rc::Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn push_and_dismiss() {
        let list = Rc::new(ToastList::default());
        let list = list.reduce(ToastAction::Push(Toast { id: 0, kind: ToastKind::Error, message: "Save failed".into() }));
        let list = list.reduce(ToastAction::Push(Toast { id: 1, kind: ToastKind::Success, message: "Saved".into() }));
        assert_eq!(list.items.len(), 2);

        let list = list.reduce(ToastAction::Dismiss(0));
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].message, "Saved");
        // Dismissing twice is harmless
        let list = list.reduce(ToastAction::Dismiss(0));
        assert_eq!(list.items.len(), 1);
    }
}
