/// Classifier client: one POST round-trip per URL, outcome recorded in
/// storage and on the toolbar badge

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::check::{ApiResponse, CheckRequest, CheckResult};
use crate::storage;

pub const API_URL: &str = "http://localhost:5000/api/predict";

pub const WARNING_BADGE: &str = "⚠️";
pub const ALERT_COLOR: &str = "#d9534f";

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn setBadgeText(text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn setBadgeBackgroundColor(color: &str) -> Result<(), JsValue>;
}

// Global fetch; works in both the service-worker and window scopes.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = fetch)]
    fn fetch_with_request(input: &Request) -> js_sys::Promise;
}

/// Run one classification round-trip for `url` and record the outcome.
///
/// No retries: failure is terminal for this invocation. Errors never escape
/// this function — transport failures become the persisted failure record,
/// service rejections are logged and dropped, and the badge only changes on
/// a definitive verdict.
pub async fn classify(url: String) {
    match request_verdict(&url).await {
        Ok(ApiResponse::Verdict {
            prediction,
            confidence,
        }) => {
            let record = CheckResult::verdict(url.clone(), prediction, confidence);
            if let Err(e) = storage::write_last_check(&record).await {
                log::error!("Failed to persist verdict for {}: {}", url, e);
            }
            if let Err(e) = apply_badge(prediction).await {
                log::error!("Failed to update badge: {}", e);
            }
        }
        Ok(ApiResponse::Rejected { error }) => {
            log::error!("API Error: {}", error);
        }
        Err(message) => {
            log::error!("Failed to fetch API: {}", message);
            let record = CheckResult::failed(url, message);
            if let Err(e) = storage::write_last_check(&record).await {
                log::error!("Failed to persist failure record: {}", e);
            }
        }
    }
}

/// POST the URL to the classification endpoint and validate the body.
/// Any non-2xx status is a transport failure regardless of body content.
async fn request_verdict(url: &str) -> Result<ApiResponse, String> {
    let body = serde_json::to_string(&CheckRequest { url })
        .map_err(|e| format!("Failed to encode request: {}", e))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(API_URL, &opts)
        .map_err(|e| format!("Failed to build request: {:?}", e))?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|e| format!("Failed to set headers: {:?}", e))?;

    let response = JsFuture::from(fetch_with_request(&request))
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| "fetch returned a non-Response value".to_string())?;

    if !response.ok() {
        return Err(format!("API returned {}", response.status()));
    }

    let text = JsFuture::from(
        response
            .text()
            .map_err(|e| format!("Failed to read response body: {:?}", e))?,
    )
    .await
    .map_err(|e| format!("Failed to read response body: {:?}", e))?;
    let text = text
        .as_string()
        .ok_or_else(|| "Response body was not text".to_string())?;

    ApiResponse::parse(&text)
}

fn badge_text(prediction: u8) -> &'static str {
    if prediction == 1 { WARNING_BADGE } else { "" }
}

/// A phishing verdict shows the warning glyph on an alert background; a
/// benign verdict clears the badge text. Nothing else touches the badge.
async fn apply_badge(prediction: u8) -> Result<(), String> {
    setBadgeText(badge_text(prediction))
        .await
        .map_err(|e| format!("Failed to set badge text: {:?}", e))?;

    if prediction == 1 {
        setBadgeBackgroundColor(ALERT_COLOR)
            .await
            .map_err(|e| format!("Failed to set badge color: {:?}", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phishing_verdict_shows_warning_glyph() {
        assert_eq!(badge_text(1), "⚠️");
    }

    #[test]
    fn test_benign_verdict_clears_badge() {
        assert_eq!(badge_text(0), "");
    }
}
