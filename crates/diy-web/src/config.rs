//! Client Configuration

use diy_checkout::DEFAULT_INTENT_KEY;

/// Frontend settings resolved at startup
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Origin the API is served from, without trailing slash
    pub api_base: String,

    /// `localStorage` key holding the pending checkout
    pub intent_key: String,
}

impl ClientConfig {
    /// `DIY_API_BASE` at build time, else the page's own origin
    pub fn from_env() -> Self {
        let api_base = option_env!("DIY_API_BASE")
            .map(str::to_string)
            .or_else(|| web_sys::window().and_then(|w| w.location().origin().ok()))
            .unwrap_or_else(|| "http://localhost:3000".into());

        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            intent_key: DEFAULT_INTENT_KEY.to_string(),
        }
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}
