//! Manual bank-transfer checkout:
//! verify-info -> payment-pending -> enter-transaction -> success.
//!
//! Steps only move forward, and only after the backend confirmed the step's
//! call. The backend payment stays "pending" whatever the local step is.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::error::ApiError;
use crate::api::models::{ContactInfo, Offer};
use crate::api::traits::CheckoutApi;
use crate::config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutStep {
    VerifyInfo,
    PaymentPending,
    EnterTransaction,
    Success,
}

impl CheckoutStep {
    pub fn index(&self) -> usize {
        match self {
            CheckoutStep::VerifyInfo => 0,
            CheckoutStep::PaymentPending => 1,
            CheckoutStep::EnterTransaction => 2,
            CheckoutStep::Success => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckoutStep::VerifyInfo => "Your details",
            CheckoutStep::PaymentPending => "Payment",
            CheckoutStep::EnterTransaction => "Transaction",
            CheckoutStep::Success => "Done",
        }
    }

    pub const ALL: [CheckoutStep; 4] = [
        CheckoutStep::VerifyInfo,
        CheckoutStep::PaymentPending,
        CheckoutStep::EnterTransaction,
        CheckoutStep::Success,
    ];
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your full name")]
    MissingName,

    #[error("Please enter your email address")]
    MissingEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please provide at least one of Telegram, WhatsApp or Discord so we can reach you")]
    MissingContactChannel,

    #[error("Please enter your transaction ID")]
    MissingTransactionId,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("This action is not available at the current step")]
    WrongStep,

    #[error("Please wait for the current request to finish")]
    Busy,
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .rsplit_once('.')
            .map_or(false, |(host, tld)| !host.is_empty() && tld.len() >= 2)
}

pub fn validate_contact(info: &ContactInfo) -> Result<(), ValidationError> {
    if info.full_name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    let email = info.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    let channels = [&info.telegram_username, &info.whatsapp_number, &info.discord_username];
    if channels.iter().all(|c| c.trim().is_empty()) {
        return Err(ValidationError::MissingContactChannel);
    }
    Ok(())
}

fn trimmed(info: &ContactInfo) -> ContactInfo {
    ContactInfo {
        full_name: info.full_name.trim().to_string(),
        email: info.email.trim().to_string(),
        phone: info.phone.trim().to_string(),
        telegram_username: info.telegram_username.trim().to_string(),
        whatsapp_number: info.whatsapp_number.trim().to_string(),
        discord_username: info.discord_username.trim().to_string(),
    }
}

/// What gets persisted so a reload resumes the flow instead of restarting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub step: CheckoutStep,
    pub payment_id: i64,
    pub user_info: ContactInfo,
}

pub fn resume_key(offer_id: i64) -> String {
    format!("{}{}", config::CHECKOUT_SESSION_PREFIX, offer_id)
}

#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutState {
    pub offer_id: i64,
    pub offer: Option<Offer>,
    pub user_info: ContactInfo,
    pub payment_id: Option<i64>,
    pub transaction_id: String,
    pub step: CheckoutStep,
    pub is_submitting: bool,
}

impl CheckoutState {
    /// `None` once there is nothing worth resuming: before a payment exists
    /// and after success.
    pub fn resume_record(&self) -> Option<ResumeRecord> {
        match (self.step, self.payment_id) {
            (CheckoutStep::PaymentPending | CheckoutStep::EnterTransaction, Some(payment_id)) => Some(ResumeRecord {
                step: self.step,
                payment_id,
                user_info: self.user_info.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct CheckoutStore {
    state: Rc<RefCell<CheckoutState>>,
    api: Rc<dyn CheckoutApi>,
    on_change: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
}

impl PartialEq for CheckoutStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl CheckoutStore {
    pub fn new(api: Rc<dyn CheckoutApi>, offer_id: i64) -> Self {
        Self {
            state: Rc::new(RefCell::new(CheckoutState {
                offer_id,
                offer: None,
                user_info: ContactInfo::default(),
                payment_id: None,
                transaction_id: String::new(),
                step: CheckoutStep::VerifyInfo,
                is_submitting: false,
            })),
            api,
            on_change: Rc::new(RefCell::new(None)),
        }
    }

    pub fn snapshot(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn set_on_change<F: Fn() + 'static>(&self, callback: F) {
        *self.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn clear_on_change(&self) {
        *self.on_change.borrow_mut() = None;
    }

    fn update<R>(&self, f: impl FnOnce(&mut CheckoutState) -> R) -> R {
        let result = f(&mut self.state.borrow_mut());
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
        result
    }

    /// Continue a flow persisted before a reload.
    pub fn resume(&self, record: ResumeRecord) {
        if record.step == CheckoutStep::VerifyInfo || record.step == CheckoutStep::Success {
            return;
        }
        log::info!("Resuming checkout for payment {} at {:?}", record.payment_id, record.step);
        self.update(|s| {
            s.step = record.step;
            s.payment_id = Some(record.payment_id);
            s.user_info = record.user_info;
        });
    }

    /// Pre-fill contact fields that are still empty.
    pub fn prefill(&self, full_name: &str, email: &str) {
        self.update(|s| {
            if s.user_info.full_name.is_empty() {
                s.user_info.full_name = full_name.to_string();
            }
            if s.user_info.email.is_empty() {
                s.user_info.email = email.to_string();
            }
        });
    }

    pub fn set_user_info(&self, info: ContactInfo) {
        self.update(|s| s.user_info = info);
    }

    pub fn set_transaction_id(&self, transaction_id: String) {
        self.update(|s| s.transaction_id = transaction_id);
    }

    pub async fn load_offer(&self) -> Result<Offer, CheckoutError> {
        let offer_id = self.state.borrow().offer_id;
        let offer = self.api.fetch_offer(offer_id).await.map_err(|e| {
            log::error!("Failed to load offer {}: {}", offer_id, e);
            e
        })?;
        let loaded = offer.clone();
        self.update(|s| s.offer = Some(loaded));
        Ok(offer)
    }

    fn begin(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        let state = self.state.borrow();
        if state.step != expected {
            return Err(CheckoutError::WrongStep);
        }
        if state.is_submitting {
            return Err(CheckoutError::Busy);
        }
        Ok(())
    }

    /// verify-info: validate locally, then create the pending payment.
    pub async fn submit_contact(&self) -> Result<i64, CheckoutError> {
        self.begin(CheckoutStep::VerifyInfo)?;
        let (offer_id, info) = {
            let state = self.state.borrow();
            (state.offer_id, trimmed(&state.user_info))
        };
        validate_contact(&info)?;

        self.update(|s| s.is_submitting = true);
        match self.api.create_payment(offer_id, &info).await {
            Ok(payment_id) => {
                log::info!("Created pending payment {} for offer {}", payment_id, offer_id);
                self.update(|s| {
                    s.user_info = info;
                    s.payment_id = Some(payment_id);
                    s.step = CheckoutStep::PaymentPending;
                    s.is_submitting = false;
                });
                Ok(payment_id)
            }
            Err(e) => {
                log::error!("Failed to create payment: {}", e);
                self.update(|s| s.is_submitting = false);
                Err(e.into())
            }
        }
    }

    /// payment-pending: the user says they have paid. No backend signal.
    pub fn confirm_paid(&self) -> Result<(), CheckoutError> {
        self.begin(CheckoutStep::PaymentPending)?;
        self.update(|s| s.step = CheckoutStep::EnterTransaction);
        Ok(())
    }

    /// enter-transaction: attach the bank transaction id to the payment.
    pub async fn submit_transaction(&self) -> Result<(), CheckoutError> {
        self.begin(CheckoutStep::EnterTransaction)?;
        let (payment_id, transaction_id) = {
            let state = self.state.borrow();
            (state.payment_id, state.transaction_id.trim().to_string())
        };
        if transaction_id.is_empty() {
            return Err(ValidationError::MissingTransactionId.into());
        }
        let payment_id = payment_id.ok_or(CheckoutError::WrongStep)?;

        self.update(|s| s.is_submitting = true);
        match self.api.submit_transaction(payment_id, &transaction_id).await {
            Ok(()) => {
                log::info!("Submitted transaction for payment {}", payment_id);
                self.update(|s| {
                    s.transaction_id = transaction_id;
                    s.step = CheckoutStep::Success;
                    s.is_submitting = false;
                });
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to submit transaction for payment {}: {}", payment_id, e);
                self.update(|s| s.is_submitting = false);
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::PaymentRecord;
    use async_trait::async_trait;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeCheckout {
        create_calls: RefCell<Vec<(i64, ContactInfo)>>,
        submit_calls: RefCell<Vec<(i64, String)>>,
        fail: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl CheckoutApi for FakeCheckout {
        async fn fetch_offer(&self, offer_id: i64) -> Result<Offer, ApiError> {
            Ok(Offer {
                id: offer_id,
                name: "Premium Signals".into(),
                price: "199.00".into(),
                currency: Some("EUR".into()),
            })
        }

        async fn create_payment(&self, offer_id: i64, user_info: &ContactInfo) -> Result<i64, ApiError> {
            if self.fail.get() {
                return Err(ApiError::Network("offline".into()));
            }
            self.create_calls.borrow_mut().push((offer_id, user_info.clone()));
            Ok(42)
        }

        async fn submit_transaction(&self, payment_id: i64, transaction_id: &str) -> Result<(), ApiError> {
            if self.fail.get() {
                return Err(ApiError::Http { status: 500, message: "boom".into() });
            }
            self.submit_calls.borrow_mut().push((payment_id, transaction_id.to_string()));
            Ok(())
        }

        async fn my_payments(&self) -> Result<Vec<PaymentRecord>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn jean() -> ContactInfo {
        ContactInfo {
            full_name: "Jean Dupont".into(),
            email: "jean@example.com".into(),
            telegram_username: "@jean".into(),
            ..Default::default()
        }
    }

    async fn at_enter_transaction(api: &Rc<FakeCheckout>) -> CheckoutStore {
        let store = CheckoutStore::new(api.clone(), 7);
        store.set_user_info(jean());
        store.submit_contact().await.unwrap();
        store.confirm_paid().unwrap();
        store
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("jean@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.fr"));
        for bad in ["", "jean", "jean@", "@example.com", "jean@example", "jean@example.c", "je an@example.com", "a@b@c.com"] {
            assert!(!is_valid_email(bad), "{} should be invalid", bad);
        }
    }

    #[test]
    fn contact_needs_a_reachable_channel() {
        let mut info = jean();
        info.telegram_username.clear();
        assert_eq!(validate_contact(&info), Err(ValidationError::MissingContactChannel));
        info.discord_username = "jean#1234".into();
        assert_eq!(validate_contact(&info), Ok(()));
        info.full_name = "  ".into();
        assert_eq!(validate_contact(&info), Err(ValidationError::MissingName));
    }

    #[tokio::test]
    async fn valid_contact_moves_to_payment_pending() {
        let api = Rc::new(FakeCheckout::default());
        let store = CheckoutStore::new(api.clone(), 7);
        store.set_user_info(jean());

        assert_eq!(store.submit_contact().await, Ok(42));
        let state = store.snapshot();
        assert_eq!(state.step, CheckoutStep::PaymentPending);
        assert_eq!(state.payment_id, Some(42));
        let calls = api.create_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 7);
        assert_eq!(calls[0].1.telegram_username, "@jean");
    }

    #[tokio::test]
    async fn empty_email_never_calls_backend() {
        let api = Rc::new(FakeCheckout::default());
        let store = CheckoutStore::new(api.clone(), 7);
        let mut info = jean();
        info.email.clear();
        store.set_user_info(info);

        assert_eq!(
            store.submit_contact().await,
            Err(CheckoutError::Validation(ValidationError::MissingEmail))
        );
        assert_eq!(store.snapshot().step, CheckoutStep::VerifyInfo);
        assert!(api.create_calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_keeps_current_step() {
        let api = Rc::new(FakeCheckout::default());
        api.fail.set(true);
        let store = CheckoutStore::new(api.clone(), 7);
        store.set_user_info(jean());

        assert!(matches!(store.submit_contact().await, Err(CheckoutError::Api(_))));
        let state = store.snapshot();
        assert_eq!(state.step, CheckoutStep::VerifyInfo);
        assert!(!state.is_submitting);
        assert_eq!(state.payment_id, None);
    }

    #[tokio::test]
    async fn paid_confirmation_only_from_payment_pending() {
        let api = Rc::new(FakeCheckout::default());
        let store = CheckoutStore::new(api.clone(), 7);
        assert_eq!(store.confirm_paid(), Err(CheckoutError::WrongStep));

        store.set_user_info(jean());
        store.submit_contact().await.unwrap();
        assert_eq!(store.confirm_paid(), Ok(()));
        assert_eq!(store.snapshot().step, CheckoutStep::EnterTransaction);
        // No way back
        assert_eq!(store.submit_contact().await, Err(CheckoutError::WrongStep));
    }

    #[tokio::test]
    async fn empty_transaction_id_is_rejected_locally() {
        let api = Rc::new(FakeCheckout::default());
        let store = at_enter_transaction(&api).await;

        store.set_transaction_id("   ".into());
        assert_eq!(
            store.submit_transaction().await,
            Err(CheckoutError::Validation(ValidationError::MissingTransactionId))
        );
        assert_eq!(store.snapshot().step, CheckoutStep::EnterTransaction);
        assert!(api.submit_calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn transaction_id_reaches_success_verbatim() {
        let api = Rc::new(FakeCheckout::default());
        let store = at_enter_transaction(&api).await;

        store.set_transaction_id("TXN123456789".into());
        store.submit_transaction().await.unwrap();
        let state = store.snapshot();
        assert_eq!(state.step, CheckoutStep::Success);
        assert_eq!(state.transaction_id, "TXN123456789");
        assert_eq!(api.submit_calls.borrow()[0], (42, "TXN123456789".to_string()));
        assert_eq!(state.resume_record(), None);
    }

    #[tokio::test]
    async fn failed_transaction_submit_stays_put() {
        let api = Rc::new(FakeCheckout::default());
        let store = at_enter_transaction(&api).await;
        store.set_transaction_id("TXN1".into());
        api.fail.set(true);

        assert!(matches!(store.submit_transaction().await, Err(CheckoutError::Api(_))));
        assert_eq!(store.snapshot().step, CheckoutStep::EnterTransaction);
    }

    #[tokio::test]
    async fn resume_record_round_trips_mid_flow() {
        let api = Rc::new(FakeCheckout::default());
        let store = at_enter_transaction(&api).await;
        let record = store.snapshot().resume_record().unwrap();
        assert_eq!(record.step, CheckoutStep::EnterTransaction);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"enter-transaction\""));

        let reloaded = CheckoutStore::new(api.clone(), 7);
        reloaded.resume(serde_json::from_str(&json).unwrap());
        let state = reloaded.snapshot();
        assert_eq!(state.step, CheckoutStep::EnterTransaction);
        assert_eq!(state.payment_id, Some(42));
        assert_eq!(state.user_info.full_name, "Jean Dupont");
    }

    #[tokio::test]
    async fn offer_loads_into_state() {
        let store = CheckoutStore::new(Rc::new(FakeCheckout::default()), 3);
        assert!(store.snapshot().resume_record().is_none());
        let offer = store.load_offer().await.unwrap();
        assert_eq!(offer.id, 3);
        assert_eq!(store.snapshot().offer.map(|o| o.name), Some("Premium Signals".to_string()));
    }

    #[test]
    fn resume_key_is_per_offer() {
        assert_eq!(resume_key(12), "checkout_session_12");
    }
}
