
#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:8000"  // Backend dev server when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Same origin in production
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", get_backend_url(), path)
}

// Local storage keys
pub const TOKEN_KEY: &str = "token";
pub const AUTH_USER_KEY: &str = "auth_user";
pub const LANGUAGE_KEY: &str = "language";
pub const THEME_KEY: &str = "theme";
pub const TRADING_HISTORY_KEY: &str = "trading_history_enabled";
pub const CHECKOUT_SESSION_PREFIX: &str = "checkout_session_";

pub const MAX_IMAGE_BYTES: f64 = 5.0 * 1024.0 * 1024.0;
pub const TOAST_DURATION_MS: u32 = 4_000;
pub const QUIZ_PASS_PERCENT: u32 = 70;
