use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use web_sys::MouseEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod config;
mod api {
    pub mod error;
    pub mod models;
    pub mod traits;
    pub mod client;
}
mod state {
    pub mod edit_mode;
    pub mod field_editor;
    pub mod translation;
    pub mod checkout;
    pub mod quiz;
    pub mod auth;
    pub mod language;
    pub mod theme;
}
mod utils {
    pub mod storage;
    pub mod cancel;
    pub mod file;
}
mod components {
    pub mod toast;
    pub mod providers;
    pub mod editable_text;
    pub mod editable_image;
    pub mod translation_button;
    pub mod translation_manager;
    pub mod admin_password_dialog;
    pub mod edit_toolbar;
    pub mod editable_layout;
}
mod pages {
    pub mod cms;
    pub mod home;
    pub mod course;
    pub mod dashboard;
    pub mod login;
    pub mod checkout;
}

use components::providers::{
    use_auth, use_language, use_theme, AuthProvider, EditModeProvider, LanguageProvider,
    ThemeProvider, TranslationProvider,
};
use components::toast::ToastProvider;
use pages::{
    checkout::CheckoutNew,
    course::CoursePage,
    dashboard::Dashboard,
    home::Home,
    login::Login,
};
use state::theme::Theme;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/courses/:slug")]
    Courses { slug: String },
    #[at("/dashboard")]
    Dashboard,
    #[at("/login")]
    Login,
    #[at("/checkout")]
    Checkout,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::Courses { slug } => {
            info!("Rendering Course page {}", slug);
            html! { <CoursePage {slug} /> }
        },
        Route::Dashboard => {
            info!("Rendering Dashboard page");
            html! { <Dashboard /> }
        },
        Route::Login => {
            info!("Rendering Login page");
            html! { <Login /> }
        },
        Route::Checkout => {
            info!("Rendering Checkout page");
            html! { <CheckoutNew /> }
        },
        Route::NotFound => html! {
            <div class="not-found">
                <h1>{"404"}</h1>
                <Link<Route> to={Route::Home} classes="primary-button">{"Back to home"}</Link<Route>>
            </div>
        },
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let auth = use_auth();
    let lang = use_language();
    let theme = use_theme();
    let navigator = use_navigator();
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let window = web_sys::window();
            let scroll_callback = {
                let window = window.clone();
                Closure::wrap(Box::new(move || {
                    let scroll_top = window
                        .as_ref()
                        .and_then(|w| w.document())
                        .and_then(|d| d.document_element())
                        .map(|e| e.scroll_top())
                        .unwrap_or(0);
                    is_scrolled.set(scroll_top > 80);
                }) as Box<dyn FnMut()>)
            };

            if let Some(window) = window.as_ref() {
                let _ = window.add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
            }

            move || {
                if let Some(window) = window.as_ref() {
                    let _ = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref());
                }
            }
        }, ());
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(false))
    };

    let handle_logout = {
        let auth = auth.clone();
        let close = close_menu.clone();
        Callback::from(move |e: MouseEvent| {
            close.emit(e);
            auth.log_out();
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(&Route::Home);
            }
        })
    };

    let switch_language = {
        let set_language = lang.set_language.clone();
        let next = lang.language.next();
        Callback::from(move |_: MouseEvent| set_language.emit(next))
    };

    let toggle_theme = {
        let toggle = theme.toggle.clone();
        Callback::from(move |_: MouseEvent| toggle.emit(()))
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"Trading Academy"}
                </Link<Route>>

                <button class="burger-menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    <div onclick={close_menu.clone()}>
                        <Link<Route> to={Route::Courses { slug: "foundations".to_string() }} classes="nav-link">
                            {lang.t("nav.courses")}
                        </Link<Route>>
                    </div>
                    <button class="nav-icon-button" onclick={switch_language}>
                        {lang.language.next().label()}
                    </button>
                    <button class="nav-icon-button" onclick={toggle_theme}>
                        { if theme.theme == Theme::Dark { "☀" } else { "☾" } }
                    </button>
                    {
                        if auth.state().is_logged_in() {
                            html! {
                                <>
                                    <div onclick={close_menu.clone()}>
                                        <Link<Route> to={Route::Dashboard} classes="nav-link">
                                            {lang.t("nav.dashboard")}
                                        </Link<Route>>
                                    </div>
                                    <button onclick={handle_logout} class="nav-logout-button">
                                        {lang.t("nav.logout")}
                                    </button>
                                </>
                            }
                        } else {
                            html! {
                                <div onclick={close_menu.clone()}>
                                    <Link<Route> to={Route::Login} classes="nav-login-button">
                                        {lang.t("nav.login")}
                                    </Link<Route>>
                                </div>
                            }
                        }
                    }
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <AuthProvider>
            <LanguageProvider>
                <ThemeProvider>
                    <ToastProvider>
                        <EditModeProvider>
                            <TranslationProvider>
                                <BrowserRouter>
                                    <Nav />
                                    <Switch<Route> render={switch} />
                                </BrowserRouter>
                            </TranslationProvider>
                        </EditModeProvider>
                    </ToastProvider>
                </ThemeProvider>
            </LanguageProvider>
        </AuthProvider>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(Level::Info).expect("error initializing log");

    info!("Starting application against {}", config::api_url("/api/"));
    yew::Renderer::<App>::new().render();
}
