use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::client::HttpClient;
use crate::api::traits::AuthApi;
use crate::components::providers::{use_auth, use_language};
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};
use crate::Route;

#[function_component]
pub fn Login() -> Html {
    let auth = use_auth();
    let lang = use_language();
    let navigator = use_navigator();
    let token = use_cancel_token();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let is_loading = use_state(|| false);

    let onsubmit = {
        let auth = auth.clone();
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let is_loading = is_loading.clone();
        let navigator = navigator.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if email.trim().is_empty() || password.is_empty() {
                error.set(Some("Please enter your email and password".to_string()));
                return;
            }
            is_loading.set(true);
            error.set(None);

            let auth = auth.clone();
            let email = email.trim().to_string();
            let password = (*password).clone();
            let error = error.clone();
            let is_loading = is_loading.clone();
            let navigator = navigator.clone();
            spawn_cancellable(
                &token,
                async move { HttpClient::new(None).login(&email, &password).await },
                move |result| {
                    is_loading.set(false);
                    match result {
                        Ok(response) => {
                            auth.log_in(response);
                            if let Some(navigator) = navigator {
                                navigator.push(&Route::Dashboard);
                            }
                        }
                        Err(e) => {
                            log::warn!("Login failed: {}", e);
                            error.set(Some(e.to_string()));
                        }
                    }
                },
            );
        })
    };

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| email.set(e.target_unchecked_into::<HtmlInputElement>().value()))
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| password.set(e.target_unchecked_into::<HtmlInputElement>().value()))
    };

    html! {
        <div class="login-page">
            <style>
            {r#".login-page {
                min-height: 100vh;
                display: flex;
                align-items: center;
                justify-content: center;
                padding: 2rem;
            }
            .login-container {
                background: var(--surface);
                border: 1px solid var(--border);
                border-radius: 16px;
                padding: 3rem;
                width: 100%;
                max-width: 420px;
                box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
            }
            .login-container h1 {
                text-align: center;
                margin-bottom: 1.5rem;
            }
            .login-container input {
                width: 100%;
                margin-bottom: 1rem;
            }
            @media (max-width: 768px) {
                .login-container {
                    padding: 2rem;
                }
            }"#}
            </style>
            <div class="login-container">
                <h1>{lang.t("nav.login")}</h1>
                if auth.state().is_logged_in() {
                    <p class="muted">{"You are already signed in."}</p>
                }
                <form {onsubmit}>
                    <input type="email" placeholder="Email" autocomplete="username"
                        value={(*email).clone()} oninput={on_email} />
                    <input type="password" placeholder="Password" autocomplete="current-password"
                        value={(*password).clone()} oninput={on_password} />
                    {
                        match (*error).as_ref() {
                            Some(message) => html! { <div class="form-error">{message.clone()}</div> },
                            None => html! {},
                        }
                    }
                    <button type="submit" class="primary-button" disabled={*is_loading}>
                        { if *is_loading { lang.t("common.loading") } else { lang.t("nav.login") } }
                    </button>
                </form>
            </div>
        </div>
    }
}
