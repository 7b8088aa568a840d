/// Navigation gating and runtime-message dispatch for the background monitor

use serde::{Deserialize, Serialize};
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::classifier;
use crate::storage;

/// Long-lived background component. Owns the single piece of transient
/// state: the last URL handed to the classifier, used to suppress repeated
/// classification when a tab fires multiple "complete" updates for the same
/// address. Reset whenever the background process restarts.
pub struct Monitor {
    last_checked_url: String,
}

impl Monitor {
    pub fn new() -> Monitor {
        Monitor {
            last_checked_url: String::new(),
        }
    }

    /// Gate for tab-update events. Returns the URL to classify only when
    /// the navigation has completed, the URL is a non-empty HTTP/HTTPS
    /// address, and it differs from the last one checked. Accepting an
    /// event records the URL before classification starts.
    pub fn accept(&mut self, status: Option<&str>, url: Option<&str>) -> Option<String> {
        if status != Some("complete") {
            return None;
        }

        let url = url.unwrap_or("");
        if url.is_empty() || !is_web_url(url) || url == self.last_checked_url {
            return None;
        }

        self.last_checked_url = url.to_string();
        Some(url.to_string())
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_web_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Messages accepted from the popup (or any extension context).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetStatus,
    ForceCheck { url: String },
}

/// Immediate acknowledgment for `forceCheck`; sent before classification
/// finishes.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub status: &'static str,
}

impl Ack {
    pub fn checking() -> Ack {
        Ack { status: "checking" }
    }
}

/// Handle one runtime message and produce the reply for `sendResponse`.
///
/// Classification triggered by `forceCheck` runs detached; the caller is
/// acknowledged right away and the fresh result only lands in storage later.
/// Errors never cross the message boundary: callers see either a stored
/// record or undefined.
pub async fn handle_message(request: JsValue) -> Result<JsValue, JsValue> {
    let request: Request = match serde_wasm_bindgen::from_value(request) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Ignoring unrecognized runtime message: {}", e);
            return Ok(JsValue::UNDEFINED);
        }
    };

    match request {
        Request::GetStatus => match storage::read_last_check_raw().await {
            Ok(value) => Ok(value),
            Err(e) => {
                log::error!("Failed to read last check: {}", e);
                Ok(JsValue::UNDEFINED)
            }
        },
        Request::ForceCheck { url } => {
            spawn_local(classifier::classify(url));
            serde_wasm_bindgen::to_value(&Ack::checking()).map_err(|e| JsValue::from_str(&e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_novel_http_url() {
        let mut monitor = Monitor::new();

        let accepted = monitor.accept(Some("complete"), Some("https://example.com/"));

        assert_eq!(accepted, Some("https://example.com/".to_string()));
    }

    #[test]
    fn test_repeat_url_suppressed() {
        let mut monitor = Monitor::new();

        assert!(monitor.accept(Some("complete"), Some("https://example.com/")).is_some());
        assert_eq!(monitor.accept(Some("complete"), Some("https://example.com/")), None);
    }

    #[test]
    fn test_new_url_after_repeat_accepted() {
        let mut monitor = Monitor::new();

        assert!(monitor.accept(Some("complete"), Some("https://example.com/")).is_some());
        assert!(monitor.accept(Some("complete"), Some("https://bad.example/")).is_some());

        // Going back to the first URL counts as a new navigation again.
        assert!(monitor.accept(Some("complete"), Some("https://example.com/")).is_some());
    }

    #[test]
    fn test_incomplete_navigation_ignored() {
        let mut monitor = Monitor::new();

        assert_eq!(monitor.accept(Some("loading"), Some("https://example.com/")), None);
        assert_eq!(monitor.accept(None, Some("https://example.com/")), None);

        // The ignored URL was not recorded, so it is still novel.
        assert!(monitor.accept(Some("complete"), Some("https://example.com/")).is_some());
    }

    #[test]
    fn test_non_web_schemes_ignored() {
        let mut monitor = Monitor::new();

        assert_eq!(monitor.accept(Some("complete"), Some("chrome://extensions")), None);
        assert_eq!(monitor.accept(Some("complete"), Some("about:blank")), None);
        assert_eq!(monitor.accept(Some("complete"), Some("ftp://files.example.com/")), None);
        assert_eq!(monitor.accept(Some("complete"), Some("file:///etc/hosts")), None);
    }

    #[test]
    fn test_http_scheme_accepted() {
        let mut monitor = Monitor::new();

        assert!(monitor.accept(Some("complete"), Some("http://example.com/")).is_some());
    }

    #[test]
    fn test_missing_or_empty_url_ignored() {
        let mut monitor = Monitor::new();

        assert_eq!(monitor.accept(Some("complete"), None), None);
        assert_eq!(monitor.accept(Some("complete"), Some("")), None);
    }

    #[test]
    fn test_unparseable_url_ignored() {
        let mut monitor = Monitor::new();

        assert_eq!(monitor.accept(Some("complete"), Some("https://")), None);
        assert_eq!(monitor.accept(Some("complete"), Some("not a url")), None);
    }

    #[test]
    fn test_get_status_request_parses() {
        let request: Request = serde_json::from_str(r#"{"action": "getStatus"}"#).unwrap();
        assert_eq!(request, Request::GetStatus);
    }

    #[test]
    fn test_force_check_request_parses() {
        let request: Request =
            serde_json::from_str(r#"{"action": "forceCheck", "url": "https://example.com"}"#)
                .unwrap();

        assert_eq!(
            request,
            Request::ForceCheck {
                url: "https://example.com".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(serde_json::from_str::<Request>(r#"{"action": "selfDestruct"}"#).is_err());
        assert!(serde_json::from_str::<Request>(r#"{"no_action": true}"#).is_err());
    }

    #[test]
    fn test_request_serializes_with_action_tag() {
        let value = serde_json::to_value(&Request::ForceCheck {
            url: "https://example.com".to_string(),
        })
        .unwrap();

        assert_eq!(
            value,
            serde_json::json!({"action": "forceCheck", "url": "https://example.com"})
        );
    }

    #[test]
    fn test_checking_ack_shape() {
        let value = serde_json::to_value(&Ack::checking()).unwrap();
        assert_eq!(value, serde_json::json!({"status": "checking"}));
    }
}
