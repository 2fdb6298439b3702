use std::rc::Rc;

use yew::prelude::*;

use crate::api::client::HttpClient;
use crate::api::models::{AuthUser, LoginResponse};
use crate::config;
use crate::state::auth::{AuthAction, AuthState};
use crate::state::edit_mode::{EditModeState, EditModeStore};
use crate::state::language::Language;
use crate::state::theme::Theme;
use crate::state::translation::{TranslationState, TranslationStore};
use crate::utils::storage;

#[derive(Properties, PartialEq)]
pub struct ProviderProps {
    pub children: Children,
}

// ---- Auth ----

#[derive(Clone, PartialEq)]
pub struct AuthContext {
    state: UseReducerHandle<AuthState>,
}

impl AuthContext {
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn log_in(&self, response: LoginResponse) {
        if let Err(e) = storage::set_item(config::TOKEN_KEY, &response.token) {
            log::error!("{}", e);
        }
        if let Err(e) = storage::save_json(config::AUTH_USER_KEY, &response.user) {
            log::error!("{}", e);
        }
        log::info!("Logged in as {}", response.user.email);
        self.state.dispatch(AuthAction::LoggedIn {
            token: response.token,
            user: response.user,
        });
    }

    pub fn log_out(&self) {
        storage::remove_item(config::TOKEN_KEY);
        storage::remove_item(config::AUTH_USER_KEY);
        log::info!("Logged out");
        self.state.dispatch(AuthAction::LoggedOut);
    }
}

fn stored_auth() -> AuthState {
    let token = storage::get_item(config::TOKEN_KEY);
    let user = token
        .as_ref()
        .and_then(|_| storage::load_json::<AuthUser>(config::AUTH_USER_KEY));
    AuthState { token, user }
}

#[function_component]
pub fn AuthProvider(props: &ProviderProps) -> Html {
    let state = use_reducer(stored_auth);
    html! {
        <ContextProvider<AuthContext> context={AuthContext { state }}>
            {props.children.clone()}
        </ContextProvider<AuthContext>>
    }
}

#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthProvider missing")
}

// ---- Language ----

#[derive(Clone, PartialEq)]
pub struct LanguageContext {
    pub language: Language,
    pub set_language: Callback<Language>,
}

impl LanguageContext {
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        self.language.t(key)
    }
}

#[function_component]
pub fn LanguageProvider(props: &ProviderProps) -> Html {
    let language = use_state(|| {
        storage::get_item(config::LANGUAGE_KEY)
            .map(|code| Language::parse(&code))
            .unwrap_or_default()
    });
    let set_language = {
        let language = language.clone();
        Callback::from(move |next: Language| {
            let _ = storage::set_item(config::LANGUAGE_KEY, next.code());
            language.set(next);
        })
    };
    let context = LanguageContext {
        language: *language,
        set_language,
    };
    html! {
        <ContextProvider<LanguageContext> context={context}>
            {props.children.clone()}
        </ContextProvider<LanguageContext>>
    }
}

#[hook]
pub fn use_language() -> LanguageContext {
    use_context::<LanguageContext>().unwrap_or_else(|| LanguageContext {
        language: Language::default(),
        set_language: Callback::noop(),
    })
}

// ---- Theme ----

#[derive(Clone, PartialEq)]
pub struct ThemeContext {
    pub theme: Theme,
    pub toggle: Callback<()>,
}

fn apply_theme(theme: Theme) {
    if let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
}

#[function_component]
pub fn ThemeProvider(props: &ProviderProps) -> Html {
    let theme = use_state(|| {
        storage::get_item(config::THEME_KEY)
            .map(|t| Theme::parse(&t))
            .unwrap_or_default()
    });

    use_effect_with_deps(
        |theme| {
            apply_theme(*theme);
            || ()
        },
        *theme,
    );

    let toggle = {
        let theme = theme.clone();
        Callback::from(move |_| {
            let next = theme.toggled();
            let _ = storage::set_item(config::THEME_KEY, next.as_str());
            theme.set(next);
        })
    };
    html! {
        <ContextProvider<ThemeContext> context={ThemeContext { theme: *theme, toggle }}>
            {props.children.clone()}
        </ContextProvider<ThemeContext>>
    }
}

#[hook]
pub fn use_theme() -> ThemeContext {
    use_context::<ThemeContext>().expect("ThemeProvider missing")
}

// ---- Edit mode ----

/// Store handle plus the snapshot consumers render from. The snapshot is
/// what makes the context compare unequal after a mutation.
#[derive(Clone, PartialEq)]
pub struct EditModeContext {
    pub store: EditModeStore,
    pub state: EditModeState,
}

#[function_component]
pub fn EditModeProvider(props: &ProviderProps) -> Html {
    let store = use_memo(|_| EditModeStore::new(Rc::new(HttpClient::stored())), ());
    let snapshot = use_state(|| store.snapshot());

    {
        let store = (*store).clone();
        let snapshot = snapshot.clone();
        use_effect_with_deps(
            move |_| {
                let observed = store.clone();
                let id = store.subscribe(move || snapshot.set(observed.snapshot()));
                move || store.unsubscribe(id)
            },
            (),
        );
    }

    let context = EditModeContext {
        store: (*store).clone(),
        state: (*snapshot).clone(),
    };
    html! {
        <ContextProvider<EditModeContext> context={context}>
            {props.children.clone()}
        </ContextProvider<EditModeContext>>
    }
}

#[hook]
pub fn use_edit_mode() -> EditModeContext {
    use_context::<EditModeContext>().expect("EditModeProvider missing")
}

// ---- Translations ----

#[derive(Clone, PartialEq)]
pub struct TranslationContext {
    pub store: TranslationStore,
    pub state: TranslationState,
}

#[function_component]
pub fn TranslationProvider(props: &ProviderProps) -> Html {
    let store = use_memo(|_| TranslationStore::new(Rc::new(HttpClient::stored())), ());
    let snapshot = use_state(|| store.snapshot());

    {
        let store = (*store).clone();
        let snapshot = snapshot.clone();
        use_effect_with_deps(
            move |_| {
                let observed = store.clone();
                store.set_on_change(move || snapshot.set(observed.snapshot()));
                move || store.clear_on_change()
            },
            (),
        );
    }

    let context = TranslationContext {
        store: (*store).clone(),
        state: (*snapshot).clone(),
    };
    html! {
        <ContextProvider<TranslationContext> context={context}>
            {props.children.clone()}
        </ContextProvider<TranslationContext>>
    }
}

#[hook]
pub fn use_translations() -> TranslationContext {
    use_context::<TranslationContext>().expect("TranslationProvider missing")
}
