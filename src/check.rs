/// Data structures for Phish Watch
use serde::{Deserialize, Serialize};

/// Outcome of the most recent classification attempt, as persisted under the
/// `lastCheck` storage key. Exactly one of these exists at a time; every
/// write replaces the previous record wholesale.
///
/// The two variants are disjoint JSON shapes:
/// - success: `{"url", "prediction", "confidence"}`
/// - failure: `{"url", "error": true, "errorMessage"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckResult {
    Verdict {
        url: String,
        prediction: u8,
        confidence: f64,
    },
    Failed {
        url: String,
        error: bool,
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl CheckResult {
    pub fn verdict(url: String, prediction: u8, confidence: f64) -> CheckResult {
        CheckResult::Verdict {
            url,
            prediction,
            confidence,
        }
    }

    pub fn failed(url: String, error_message: String) -> CheckResult {
        CheckResult::Failed {
            url,
            error: true,
            error_message,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            CheckResult::Verdict { url, .. } => url,
            CheckResult::Failed { url, .. } => url,
        }
    }

    /// Status message and CSS class for the popup.
    pub fn status_line(&self) -> (String, &'static str) {
        match self {
            CheckResult::Verdict { prediction: 1, .. } => {
                ("⚠️ This website is PHISHING!".to_string(), "danger")
            }
            CheckResult::Verdict { .. } => ("✅ Website appears SAFE".to_string(), "safe"),
            CheckResult::Failed { error_message, .. } => {
                (format!("❌ Check failed: {}", error_message), "danger")
            }
        }
    }

    /// Confidence formatted to one decimal place, e.g. "97.3%".
    /// Failure records carry no confidence.
    pub fn confidence_text(&self) -> Option<String> {
        match self {
            CheckResult::Verdict { confidence, .. } => Some(format!("{:.1}%", confidence)),
            CheckResult::Failed { .. } => None,
        }
    }
}

/// Request body sent to the classification endpoint.
#[derive(Debug, Serialize)]
pub struct CheckRequest<'a> {
    pub url: &'a str,
}

/// Body returned by the classification endpoint, validated here at the
/// boundary and never trusted downstream. A body carrying an `error` field
/// is a rejection even if verdict fields are also present, matching the
/// service contract.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Rejected { error: String },
    Verdict { prediction: u8, confidence: f64 },
}

impl ApiResponse {
    pub fn parse(body: &str) -> Result<ApiResponse, String> {
        serde_json::from_str(body).map_err(|e| format!("Malformed API response: {}", e))
    }
}
