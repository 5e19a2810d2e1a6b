//! One-time notices carried across a redirect in the `flash` cookie.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    // ---
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Flash {
    // ---
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    // ---
    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub(crate) fn danger(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Danger,
            message: message.into(),
        }
    }

    /// Cookie-safe encoding: URL-safe base64 of the JSON form.
    pub(crate) fn encode(&self) -> String {
        // ---
        // Serializing two plain fields cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Inverse of [`Flash::encode`]. Tampered or stale values decode to `None`.
    pub(crate) fn decode(value: &str) -> Option<Self> {
        // ---
        let json = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&json).ok()
    }
}
