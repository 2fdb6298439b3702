use yew::prelude::*;
use yew_router::prelude::*;

use crate::api::client::HttpClient;
use crate::api::models::{PaymentRecord, PaymentStatus};
use crate::api::traits::CheckoutApi;
use crate::components::providers::{use_auth, use_language};
use crate::utils::cancel::{spawn_cancellable, use_cancel_token};
use crate::utils::storage;
use crate::Route;

fn status_badge(status: &PaymentStatus) -> (&'static str, &'static str) {
    match status {
        PaymentStatus::Pending => ("badge badge-pending", "Pending"),
        PaymentStatus::Confirmed => ("badge badge-confirmed", "Confirmed"),
        PaymentStatus::Rejected => ("badge badge-rejected", "Rejected"),
    }
}

/// Most recent first.
pub fn sort_payments(payments: &mut [PaymentRecord]) {
    payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[function_component]
pub fn Dashboard() -> Html {
    let auth = use_auth();
    let lang = use_language();
    let token = use_cancel_token();
    let payments = use_state(|| None::<Result<Vec<PaymentRecord>, String>>);
    let history_enabled = use_state(storage::trading_history_enabled);
    let logged_in = auth.state().is_logged_in();

    {
        let payments = payments.clone();
        let auth = auth.clone();
        use_effect_with_deps(
            move |logged_in: &bool| {
                if *logged_in {
                    spawn_cancellable(
                        &token,
                        async move { HttpClient::stored().my_payments().await },
                        move |result| match result {
                            Ok(mut list) => {
                                sort_payments(&mut list);
                                payments.set(Some(Ok(list)));
                            }
                            Err(e) if e.is_auth() => {
                                log::warn!("Session rejected while loading payments: {}", e);
                                auth.log_out();
                            }
                            Err(e) => {
                                log::error!("Failed to load payments: {}", e);
                                payments.set(Some(Err(e.to_string())));
                            }
                        },
                    );
                }
                || ()
            },
            logged_in,
        );
    }

    if !logged_in {
        return html! {
            <div class="dashboard-page">
                <p>{"Please log in to see your dashboard."}</p>
                <Link<Route> to={Route::Login} classes="primary-button">{lang.t("nav.login")}</Link<Route>>
            </div>
        };
    }

    let toggle_history = {
        let history_enabled = history_enabled.clone();
        Callback::from(move |_: Event| {
            let next = !*history_enabled;
            storage::set_trading_history_enabled(next);
            history_enabled.set(next);
        })
    };

    let name = auth
        .state()
        .user
        .as_ref()
        .map(|u| if u.full_name.is_empty() { u.email.clone() } else { u.full_name.clone() })
        .unwrap_or_default();

    let history = match (*payments).as_ref() {
        None => html! { <p class="muted">{lang.t("common.loading")}</p> },
        Some(Err(message)) => html! { <p class="form-error">{message.clone()}</p> },
        Some(Ok(list)) if list.is_empty() => html! { <p class="muted">{"No payments yet."}</p> },
        Some(Ok(list)) => html! {
            <table class="payments-table">
                <thead>
                    <tr>
                        <th>{"Date"}</th>
                        <th>{"Offer"}</th>
                        <th>{"Amount"}</th>
                        <th>{"Status"}</th>
                        <th>{"Transaction"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for list.iter().map(|p| {
                        let (class, label) = status_badge(&p.status);
                        html! {
                            <tr key={p.id}>
                                <td>{p.created_at.format("%Y-%m-%d").to_string()}</td>
                                <td>{p.offer_name.clone()}</td>
                                <td>{p.amount.clone()}</td>
                                <td><span {class}>{label}</span></td>
                                <td class="mono">{p.transaction_id.clone().unwrap_or_else(|| "-".to_string())}</td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        },
    };

    html! {
        <div class="dashboard-page">
            <style>
            {r#".dashboard-page {
                max-width: 1000px;
                margin: 0 auto;
                padding: 6rem 2rem 2rem;
            }
            .payments-table {
                width: 100%;
                border-collapse: collapse;
            }
            .payments-table th, .payments-table td {
                text-align: left;
                padding: 0.6rem;
                border-bottom: 1px solid var(--border);
            }
            .badge-pending { background: #b8860b; }
            .badge-confirmed { background: #2e8b57; }
            .badge-rejected { background: #b22222; }"#}
            </style>
            <h1>{format!("Welcome, {}", name)}</h1>
            <label class="toggle-row">
                <input type="checkbox" checked={*history_enabled} onchange={toggle_history} />
                {lang.t("dashboard.history")}
            </label>
            if *history_enabled {
                <section>
                    <h2>{lang.t("dashboard.payments")}</h2>
                    {history}
                </section>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn payment(id: i64, day: u32) -> PaymentRecord {
        PaymentRecord {
            id,
            offer_name: "Mentorship".into(),
            amount: "499.00".into(),
            status: PaymentStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
            transaction_id: None,
        }
    }

    #[test]
    fn newest_payment_first() {
        let mut list = vec![payment(1, 2), payment(2, 9), payment(3, 5)];
        sort_payments(&mut list);
        let ids: Vec<i64> = list.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
