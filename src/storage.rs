/// The single `lastCheck` slot in chrome.storage.local

use wasm_bindgen::prelude::*;

use crate::check::CheckResult;

/// Namespaced key holding the most recent CheckResult.
pub const LAST_CHECK_KEY: &str = "lastCheck";

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// Read the stored record as-is. `getStatus` callers receive this value
/// untouched, so no deserialization happens here; undefined means no
/// classification has completed yet.
pub async fn read_last_check_raw() -> Result<JsValue, String> {
    getStorage(LAST_CHECK_KEY)
        .await
        .map_err(|e| format!("Failed to get storage: {:?}", e))
}

/// Overwrite the slot wholesale with the latest record.
pub async fn write_last_check(record: &CheckResult) -> Result<(), String> {
    let value = serde_wasm_bindgen::to_value(record)
        .map_err(|e| format!("Failed to serialize record: {}", e))?;

    setStorage(LAST_CHECK_KEY, value)
        .await
        .map_err(|e| format!("Failed to save storage: {:?}", e))
}
