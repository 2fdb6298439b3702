use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::{extract_error_message, ApiError};
use crate::api::models::*;
use crate::api::traits::{AuthApi, CheckoutApi, CmsApi, CourseApi, TranslationApi};
use crate::config;
use crate::utils::storage;

#[derive(Clone, Debug, PartialEq, Default)]
enum Credentials {
    #[default]
    Anonymous,
    Bearer(String),
    /// Read the token from local storage on every request
    Stored,
}

/// gloo-net backed client for the REST backend. Stateless apart from the
/// credentials it was built with.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HttpClient {
    credentials: Credentials,
}

impl HttpClient {
    pub fn new(token: Option<String>) -> Self {
        let credentials = match token {
            Some(token) => Credentials::Bearer(token),
            None => Credentials::Anonymous,
        };
        Self { credentials }
    }

    /// Client for long-lived stores: picks up logins and logouts that happen
    /// after it was created.
    pub fn stored() -> Self {
        Self { credentials: Credentials::Stored }
    }

    fn token(&self) -> Option<String> {
        match &self.credentials {
            Credentials::Anonymous => None,
            Credentials::Bearer(token) => Some(token.clone()),
            Credentials::Stored => storage::get_item(config::TOKEN_KEY),
        }
    }

    fn authorize(&self, request: Request) -> Request {
        match self.token() {
            Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }

    fn get(&self, path: &str) -> Request {
        self.authorize(Request::get(&config::api_url(path)))
    }

    fn post(&self, path: &str) -> Request {
        self.authorize(Request::post(&config::api_url(path)))
    }

    fn patch(&self, path: &str) -> Request {
        self.authorize(Request::patch(&config::api_url(path)))
    }

    async fn send_json<B: Serialize>(request: Request, body: &B) -> Result<Response, ApiError> {
        let response = request
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?
            .send()
            .await?;
        check(response).await
    }

    async fn send(request: Request) -> Result<Response, ApiError> {
        let response = request.send().await?;
        check(response).await
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let fallback = format!("{} {}", status, response.status_text());
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body, &fallback);
    log::warn!("Backend returned {}: {}", status, message);
    Err(ApiError::from_status(status, message))
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait(?Send)]
impl CmsApi for HttpClient {
    async fn fetch_page(&self, slug: &str) -> Result<CmsPage, ApiError> {
        let path = format!("/api/content/cms/pages/public/{}/", segment(slug));
        read(Self::send(self.get(&path)).await?).await
    }

    async fn verify_password(&self, password: &str) -> Result<bool, ApiError> {
        let request = self.post("/api/content/cms/verify-password/");
        match Self::send_json(request, &VerifyPasswordRequest { password }).await {
            Ok(response) => Ok(read::<VerifyPasswordResponse>(response).await?.valid),
            // A wrong password comes back as 400/401 depending on the deployment
            Err(ApiError::Unauthorized(_)) | Err(ApiError::Http { status: 400, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn start_edit_session(&self, page_slug: &str) -> Result<(), ApiError> {
        let request = self.post("/api/content/cms/edit-mode/start/");
        Self::send_json(request, &StartEditRequest { page_slug }).await?;
        Ok(())
    }

    async fn save_changes(&self, changes: &[ChangeRecord]) -> Result<(), ApiError> {
        let request = self.post("/api/content/cms/sections/batch-update/");
        Self::send_json(request, &BatchChangesRequest { changes }).await?;
        Ok(())
    }

    async fn preview_changes(&self, changes: &[ChangeRecord]) -> Result<PreviewPayload, ApiError> {
        let request = self.post("/api/content/cms/sections/preview/");
        read(Self::send_json(request, &BatchChangesRequest { changes }).await?).await
    }
}

#[async_trait(?Send)]
impl TranslationApi for HttpClient {
    async fn generate_all(&self, section_id: i64, field_name: &str) -> Result<Vec<Translation>, ApiError> {
        let request = self.post("/api/content/translations/generate/");
        read(Self::send_json(request, &GenerateTranslationsRequest { section_id, field_name }).await?).await
    }

    async fn fetch_for_section(&self, section_id: i64) -> Result<Vec<Translation>, ApiError> {
        let path = format!("/api/content/translations/section/{}/", section_id);
        read(Self::send(self.get(&path)).await?).await
    }

    async fn update(&self, translation_id: i64, content: &str) -> Result<Translation, ApiError> {
        let request = self.patch(&format!("/api/content/translations/{}/", translation_id));
        let body = UpdateTranslationRequest {
            translated_content: content,
            is_manual_override: true,
        };
        read(Self::send_json(request, &body).await?).await
    }

    async fn regenerate(&self, translation_id: i64) -> Result<Translation, ApiError> {
        let path = format!("/api/content/translations/{}/regenerate/", translation_id);
        read(Self::send(self.post(&path)).await?).await
    }
}

#[async_trait(?Send)]
impl CheckoutApi for HttpClient {
    async fn fetch_offer(&self, offer_id: i64) -> Result<Offer, ApiError> {
        read(Self::send(self.get(&format!("/api/offers/{}/", offer_id))).await?).await
    }

    async fn create_payment(&self, offer_id: i64, user_info: &ContactInfo) -> Result<i64, ApiError> {
        let body = CreatePaymentRequest {
            offer: offer_id,
            user_info,
            status: "pending",
        };
        let created: CreatePaymentResponse =
            read(Self::send_json(self.post("/api/payments/create/"), &body).await?).await?;
        Ok(created.id)
    }

    async fn submit_transaction(&self, payment_id: i64, transaction_id: &str) -> Result<(), ApiError> {
        let request = self.post(&format!("/api/payments/{}/submit-transaction/", payment_id));
        Self::send_json(request, &SubmitTransactionRequest { transaction_id }).await?;
        Ok(())
    }

    async fn my_payments(&self) -> Result<Vec<PaymentRecord>, ApiError> {
        read(Self::send(self.get("/api/payments/my/")).await?).await
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let request = self.post("/api/auth/login/");
        read(Self::send_json(request, &LoginRequest { email, password }).await?).await
    }
}

#[async_trait(?Send)]
impl CourseApi for HttpClient {
    async fn fetch_course(&self, slug: &str) -> Result<Course, ApiError> {
        let path = format!("/api/courses/{}/", segment(slug));
        read(Self::send(self.get(&path)).await?).await
    }
}
