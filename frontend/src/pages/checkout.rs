use std::rc::Rc;

use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_hooks::prelude::*;
use yew_router::prelude::*;

use crate::api::client::HttpClient;
use crate::api::models::ContactInfo;
use crate::components::providers::{use_auth, use_language};
use crate::components::toast::use_toast;
use crate::state::checkout::{resume_key, CheckoutState, CheckoutStep, CheckoutStore, ResumeRecord};
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};
use crate::utils::storage;
use crate::Route;

/// Mirror the resumable part of the flow into local storage.
fn persist_progress(state: &CheckoutState) {
    let key = resume_key(state.offer_id);
    match state.resume_record() {
        Some(record) => {
            if let Err(e) = storage::save_json(&key, &record) {
                log::warn!("Could not persist checkout progress: {}", e);
            }
        }
        None => storage::remove_item(&key),
    }
}

pub fn parse_offer_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|id| *id > 0)
}

#[function_component]
pub fn CheckoutNew() -> Html {
    let offer = use_search_param("offer".to_string());

    match parse_offer_id(offer.as_deref()) {
        Some(offer_id) => html! { <CheckoutFlow key={offer_id} {offer_id} /> },
        None => html! {
            <div class="checkout-page">
                <div class="checkout-card">
                    <h1>{"Checkout"}</h1>
                    <p class="form-error">{"No offer selected."}</p>
                    <Link<Route> to={Route::Home} classes="primary-button">{"Back to home"}</Link<Route>>
                </div>
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct CheckoutFlowProps {
    pub offer_id: i64,
}

#[function_component]
pub fn CheckoutFlow(props: &CheckoutFlowProps) -> Html {
    let auth = use_auth();
    let lang = use_language();
    let toast = use_toast();
    let token = use_cancel_token();
    let store = use_memo(|offer_id| CheckoutStore::new(Rc::new(HttpClient::stored()), *offer_id), props.offer_id);
    let snapshot = use_state(|| store.snapshot());

    // Resume, prefill, load the offer; then mirror every change
    {
        let store = (*store).clone();
        let snapshot = snapshot.clone();
        let toast = toast.clone();
        let token = token.clone();
        let user = auth.state().user.clone();
        use_effect_with_deps(
            move |offer_id: &i64| {
                if let Some(record) = storage::load_json::<ResumeRecord>(&resume_key(*offer_id)) {
                    store.resume(record);
                }
                if let Some(user) = user {
                    store.prefill(&user.full_name, &user.email);
                }
                let observed = store.clone();
                let on_change_snapshot = snapshot.clone();
                store.set_on_change(move || {
                    let state = observed.snapshot();
                    persist_progress(&state);
                    on_change_snapshot.set(state);
                });
                snapshot.set(store.snapshot());

                let loader = store.clone();
                spawn_cancellable(
                    &token,
                    async move { loader.load_offer().await },
                    move |result| {
                        if let Err(e) = result {
                            toast.error(format!("Could not load this offer: {}", e));
                        }
                    },
                );
                move || store.clear_on_change()
            },
            props.offer_id,
        );
    }

    let state = (*snapshot).clone();

    let steps = html! {
        <ol class="checkout-steps">
            { for CheckoutStep::ALL.iter().map(|step| {
                let class = classes!(
                    "checkout-step",
                    (step.index() < state.step.index()).then(|| "done"),
                    (*step == state.step).then(|| "current"),
                );
                html! { <li {class} key={step.index()}>{step.label()}</li> }
            }) }
        </ol>
    };

    let offer_summary = match &state.offer {
        Some(offer) => html! {
            <div class="checkout-offer">
                <span class="checkout-offer-name">{offer.name.clone()}</span>
                <span class="checkout-offer-price">
                    {format!("{} {}", offer.price, offer.currency.clone().unwrap_or_default())}
                </span>
            </div>
        },
        None => html! { <div class="checkout-offer muted">{lang.t("common.loading")}</div> },
    };

    let body = match state.step {
        CheckoutStep::VerifyInfo => {
            let field = |label: &'static str, input_type: &'static str, value: String, apply: fn(&mut ContactInfo, String)| {
                let store = (*store).clone();
                let oninput = Callback::from(move |e: InputEvent| {
                    let mut info = store.snapshot().user_info;
                    apply(&mut info, e.target_unchecked_into::<HtmlInputElement>().value());
                    store.set_user_info(info);
                });
                html! {
                    <label class="checkout-field">
                        <span>{label}</span>
                        <input type={input_type} {value} {oninput} />
                    </label>
                }
            };

            let onsubmit = {
                let store = (*store).clone();
                let toast = toast.clone();
                let token = token.clone();
                Callback::from(move |e: SubmitEvent| {
                    e.prevent_default();
                    let store = store.clone();
                    let toast = toast.clone();
                    spawn_cancellable(
                        &token,
                        async move { store.submit_contact().await },
                        move |result| {
                            if let Err(e) = result {
                                toast.error(e.to_string());
                            }
                        },
                    );
                })
            };

            let info = &state.user_info;
            html! {
                <form class="checkout-form" {onsubmit}>
                    <h2>{"Confirm your details"}</h2>
                    {field("Full name", "text", info.full_name.clone(), |i, v| i.full_name = v)}
                    {field("Email", "email", info.email.clone(), |i, v| i.email = v)}
                    {field("Phone (optional)", "tel", info.phone.clone(), |i, v| i.phone = v)}
                    <p class="muted">{"How should we reach you? At least one is required."}</p>
                    {field("Telegram", "text", info.telegram_username.clone(), |i, v| i.telegram_username = v)}
                    {field("WhatsApp", "tel", info.whatsapp_number.clone(), |i, v| i.whatsapp_number = v)}
                    {field("Discord", "text", info.discord_username.clone(), |i, v| i.discord_username = v)}
                    <button type="submit" class="primary-button" disabled={state.is_submitting}>
                        { if state.is_submitting { lang.t("common.loading") } else { lang.t("checkout.continue") } }
                    </button>
                </form>
            }
        }
        CheckoutStep::PaymentPending => {
            let onclick = {
                let store = (*store).clone();
                let toast = toast.clone();
                Callback::from(move |_: MouseEvent| {
                    if let Err(e) = store.confirm_paid() {
                        toast.error(e.to_string());
                    }
                })
            };
            let reference = state.payment_id.map(|id| format!("ACADEMY-{}", id)).unwrap_or_default();
            html! {
                <div class="checkout-form">
                    <h2>{"Make the bank transfer"}</h2>
                    <p>{"Send the amount above by bank transfer and include this reference so we can match it:"}</p>
                    <p class="checkout-reference">{reference}</p>
                    <p class="muted">{"Your payment stays pending until our team confirms the transfer."}</p>
                    <button class="primary-button" {onclick}>{lang.t("checkout.paid")}</button>
                </div>
            }
        }
        CheckoutStep::EnterTransaction => {
            let oninput = {
                let store = (*store).clone();
                Callback::from(move |e: InputEvent| {
                    store.set_transaction_id(e.target_unchecked_into::<HtmlInputElement>().value());
                })
            };
            let onsubmit = {
                let store = (*store).clone();
                let toast = toast.clone();
                let token = token.clone();
                Callback::from(move |e: SubmitEvent| {
                    e.prevent_default();
                    let store = store.clone();
                    let toast = toast.clone();
                    spawn_cancellable(
                        &token,
                        async move { store.submit_transaction().await },
                        move |result| match result {
                            Ok(()) => toast.success("Transaction submitted"),
                            Err(e) => toast.error(e.to_string()),
                        },
                    );
                })
            };
            html! {
                <form class="checkout-form" {onsubmit}>
                    <h2>{"Enter your transaction ID"}</h2>
                    <label class="checkout-field">
                        <span>{"Transaction ID"}</span>
                        <input type="text" value={state.transaction_id.clone()} {oninput} />
                    </label>
                    <button type="submit" class="primary-button" disabled={state.is_submitting}>
                        { if state.is_submitting { lang.t("common.loading") } else { lang.t("checkout.submit_tx") } }
                    </button>
                </form>
            }
        }
        CheckoutStep::Success => html! {
            <div class="checkout-form checkout-success">
                <h2>{lang.t("checkout.success")}</h2>
                <p>{"We received your transaction ID:"}</p>
                <p class="checkout-reference">{state.transaction_id.clone()}</p>
                <p class="muted">{"You will get access as soon as the payment is confirmed."}</p>
                <Link<Route> to={Route::Dashboard} classes="primary-button">{lang.t("nav.dashboard")}</Link<Route>>
            </div>
        },
    };

    html! {
        <div class="checkout-page">
            <style>
            {r#".checkout-page {
                min-height: 100vh;
                display: flex;
                justify-content: center;
                padding: 6rem 1rem 2rem;
            }
            .checkout-card {
                width: 100%;
                max-width: 560px;
                background: var(--surface);
                border: 1px solid var(--border);
                border-radius: 16px;
                padding: 2rem;
            }
            .checkout-steps {
                display: flex;
                gap: 0.5rem;
                list-style: none;
                padding: 0;
                margin-bottom: 1.5rem;
            }
            .checkout-step {
                flex: 1;
                text-align: center;
                font-size: 0.8rem;
                padding: 0.5rem 0;
                border-bottom: 3px solid var(--border);
                color: var(--text-muted);
            }
            .checkout-step.done { border-color: var(--accent); }
            .checkout-step.current { border-color: var(--accent); color: var(--text); font-weight: 600; }
            .checkout-offer {
                display: flex;
                justify-content: space-between;
                margin-bottom: 1.5rem;
                font-weight: 600;
            }
            .checkout-field {
                display: flex;
                flex-direction: column;
                gap: 0.3rem;
                margin-bottom: 1rem;
            }
            .checkout-reference {
                font-family: monospace;
                font-size: 1.2rem;
                padding: 0.75rem;
                background: var(--surface-strong);
                border-radius: 8px;
                word-break: break-all;
            }"#}
            </style>
            <div class="checkout-card">
                <h1>{lang.t("checkout.title")}</h1>
                {steps}
                {offer_summary}
                {body}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_id_comes_from_a_positive_query_value() {
        assert_eq!(parse_offer_id(Some("12")), Some(12));
        assert_eq!(parse_offer_id(Some(" 7 ")), Some(7));
        assert_eq!(parse_offer_id(Some("0")), None);
        assert_eq!(parse_offer_id(Some("abc")), None);
        assert_eq!(parse_offer_id(None), None);
    }
}
