use serde::{de::DeserializeOwned, Serialize};
use web_sys::{window, Storage};

use crate::config;

pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

pub fn get_item(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

pub fn set_item(key: &str, value: &str) -> Result<(), String> {
    let storage = local_storage().ok_or("Local storage unavailable")?;
    storage
        .set_item(key, value)
        .map_err(|_| format!("Failed to write {} to local storage", key))
}

pub fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

pub fn save_json<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value).map_err(|e| format!("Failed to serialize {}: {}", key, e))?;
    set_item(key, &json)
}

pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    serde_json::from_str(&get_item(key)?).ok()
}

/// Whether the dashboard should show the trading history section.
pub fn trading_history_enabled() -> bool {
    get_item(config::TRADING_HISTORY_KEY)
        .map(|v| v == "true")
        .unwrap_or(false)
}

pub fn set_trading_history_enabled(enabled: bool) {
    if let Err(e) = set_item(config::TRADING_HISTORY_KEY, if enabled { "true" } else { "false" }) {
        log::warn!("{}", e);
    }
}
