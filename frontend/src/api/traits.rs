use async_trait::async_trait;

use crate::api::error::ApiError;
use crate::api::models::{
    ChangeRecord, ContactInfo, Course, CmsPage, LoginResponse, Offer, PaymentRecord,
    PreviewPayload, Translation,
};

/// CMS content and edit-mode endpoints.
#[async_trait(?Send)]
pub trait CmsApi {
    async fn fetch_page(&self, slug: &str) -> Result<CmsPage, ApiError>;
    /// `Ok(false)` means the backend answered but rejected the password.
    async fn verify_password(&self, password: &str) -> Result<bool, ApiError>;
    async fn start_edit_session(&self, page_slug: &str) -> Result<(), ApiError>;
    async fn save_changes(&self, changes: &[ChangeRecord]) -> Result<(), ApiError>;
    async fn preview_changes(&self, changes: &[ChangeRecord]) -> Result<PreviewPayload, ApiError>;
}

#[async_trait(?Send)]
pub trait TranslationApi {
    async fn generate_all(&self, section_id: i64, field_name: &str) -> Result<Vec<Translation>, ApiError>;
    async fn fetch_for_section(&self, section_id: i64) -> Result<Vec<Translation>, ApiError>;
    async fn update(&self, translation_id: i64, content: &str) -> Result<Translation, ApiError>;
    async fn regenerate(&self, translation_id: i64) -> Result<Translation, ApiError>;
}

#[async_trait(?Send)]
pub trait CheckoutApi {
    async fn fetch_offer(&self, offer_id: i64) -> Result<Offer, ApiError>;
    /// Returns the id of the pending payment record.
    async fn create_payment(&self, offer_id: i64, user_info: &ContactInfo) -> Result<i64, ApiError>;
    async fn submit_transaction(&self, payment_id: i64, transaction_id: &str) -> Result<(), ApiError>;
    async fn my_payments(&self) -> Result<Vec<PaymentRecord>, ApiError>;
}

#[async_trait(?Send)]
pub trait AuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;
}

#[async_trait(?Send)]
pub trait CourseApi {
    async fn fetch_course(&self, slug: &str) -> Result<Course, ApiError>;
}
