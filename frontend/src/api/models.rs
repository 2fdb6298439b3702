use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---- CMS ----

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct CmsSection {
    pub id: i64,
    pub section_key: String,
    #[serde(default)]
    pub content: HashMap<String, serde_json::Value>,
}

impl CmsSection {
    /// String value of one field of the section, empty when missing.
    pub fn field(&self, field_name: &str) -> String {
        match self.content.get(field_name) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Deserialize, Clone, PartialEq, Debug, Default)]
pub struct CmsPage {
    #[serde(default)]
    pub sections: Vec<CmsSection>,
}

impl CmsPage {
    pub fn section(&self, key: &str) -> Option<&CmsSection> {
        self.sections.iter().find(|s| s.section_key == key)
    }
}

#[derive(Serialize)]
pub struct VerifyPasswordRequest<'a> {
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct VerifyPasswordResponse {
    #[serde(default)]
    pub valid: bool,
}

#[derive(Serialize)]
pub struct StartEditRequest<'a> {
    pub page_slug: &'a str,
}

#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct ChangeRecord {
    pub section_id: i64,
    pub field_name: String,
    pub old_value: String,
    pub new_value: String,
    pub change_type: String,
}

#[derive(Serialize)]
pub struct BatchChangesRequest<'a> {
    pub changes: &'a [ChangeRecord],
}

#[derive(Deserialize, Clone, PartialEq, Debug, Default)]
pub struct PreviewPayload {
    pub preview_url: Option<String>,
    pub html: Option<String>,
}

// ---- Translations ----

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct Translation {
    pub id: i64,
    pub language: String,
    pub translated_content: String,
    #[serde(default)]
    pub is_auto_generated: bool,
    #[serde(default)]
    pub is_manual_override: bool,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub field_name: String,
}

impl Translation {
    pub fn updated_label(&self) -> String {
        match self.updated_at {
            Some(ts) => ts.format("%B %d, %Y %H:%M").to_string(),
            None => "Never".to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct GenerateTranslationsRequest<'a> {
    pub section_id: i64,
    pub field_name: &'a str,
}

#[derive(Serialize)]
pub struct UpdateTranslationRequest<'a> {
    pub translated_content: &'a str,
    pub is_manual_override: bool,
}

// ---- Checkout ----

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct Offer {
    pub id: i64,
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct ContactInfo {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub telegram_username: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub discord_username: String,
}

#[derive(Serialize)]
pub struct CreatePaymentRequest<'a> {
    pub offer: i64,
    pub user_info: &'a ContactInfo,
    pub status: &'static str,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct CreatePaymentResponse {
    pub id: i64,
}

#[derive(Serialize)]
pub struct SubmitTransactionRequest<'a> {
    pub transaction_id: &'a str,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Rejected,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct PaymentRecord {
    pub id: i64,
    pub offer_name: String,
    pub amount: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub transaction_id: Option<String>,
}

// ---- Auth ----

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

// ---- Courses ----

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct QuizQuestion {
    pub id: i64,
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct Lesson {
    pub id: i64,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
pub struct Course {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cms_page_parses_public_shape() {
        let page: CmsPage = serde_json::from_str(
            r#"{"sections":[{"id":7,"section_key":"hero","content":{"title":"Trade smarter","order":2,"imageUrl":null}}]}"#,
        )
        .unwrap();
        let hero = page.section("hero").unwrap();
        assert_eq!(hero.id, 7);
        assert_eq!(hero.field("title"), "Trade smarter");
        assert_eq!(hero.field("order"), "2");
        assert_eq!(hero.field("imageUrl"), "");
        assert_eq!(hero.field("missing"), "");
        assert!(page.section("footer").is_none());
    }

    #[test]
    fn translation_tolerates_missing_flags() {
        let t: Translation = serde_json::from_str(
            r#"{"id":1,"language":"fr","translated_content":"Bonjour","updated_at":"2026-03-01T10:30:00Z"}"#,
        )
        .unwrap();
        assert!(!t.is_auto_generated);
        assert!(!t.is_manual_override);
        assert_eq!(t.updated_label(), "March 01, 2026 10:30");
    }

    #[test]
    fn payment_status_is_lowercase_on_the_wire() {
        let p: PaymentRecord = serde_json::from_str(
            r#"{"id":3,"offer_name":"Signals","amount":"49.00","status":"confirmed","created_at":"2026-01-02T00:00:00Z","transaction_id":null}"#,
        )
        .unwrap();
        assert_eq!(p.status, PaymentStatus::Confirmed);
    }
}
