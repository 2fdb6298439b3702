use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Flipped when the owning component unmounts. Async handlers check it
/// before touching component state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

impl PartialEq for CancelToken {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Token cancelled when the calling component unmounts.
#[hook]
pub fn use_cancel_token() -> CancelToken {
    let token = use_memo(|_| CancelToken::new(), ());
    {
        let token = (*token).clone();
        use_effect_with_deps(move |_| move || token.cancel(), ());
    }
    (*token).clone()
}

/// Run `task` and hand its output to `then`, unless the token was cancelled
/// in the meantime.
pub fn spawn_cancellable<F, T, C>(token: &CancelToken, task: F, then: C)
where
    F: Future<Output = T> + 'static,
    C: FnOnce(T) + 'static,
{
    let token = token.clone();
    spawn_local(async move {
        let output = task.await;
        if token.is_cancelled() {
            log::debug!("Dropping result of a request whose component unmounted");
            return;
        }
        then(output);
    });
}
