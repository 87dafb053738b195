//! Identity provider endpoint set

use serde::Deserialize;

use crate::constants::{AUTHORIZE_ENDPOINT, ISSUER_URL, TOKEN_ENDPOINT, USERINFO_ENDPOINT};

/// The four provider URLs the relay talks to (or hands to kubectl).
///
/// Every field falls back to Google's value, so a config file only needs
/// to name the endpoints it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub issuer_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_ENDPOINT.to_string(),
            token_url: TOKEN_ENDPOINT.to_string(),
            userinfo_url: USERINFO_ENDPOINT.to_string(),
            issuer_url: ISSUER_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Iterate `(name, url)` pairs, used for startup validation.
    pub fn urls(&self) -> [(&'static str, &str); 4] {
        [
            ("authorize_url", self.authorize_url.as_str()),
            ("token_url", self.token_url.as_str()),
            ("userinfo_url", self.userinfo_url.as_str()),
            ("issuer_url", self.issuer_url.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_google() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.authorize_url,
            "https://accounts.google.com/o/oauth2/auth"
        );
        assert_eq!(
            endpoints.token_url,
            "https://www.googleapis.com/oauth2/v3/token"
        );
        assert_eq!(
            endpoints.userinfo_url,
            "https://www.googleapis.com/oauth2/v1/userinfo"
        );
        assert_eq!(endpoints.issuer_url, "https://accounts.google.com");
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let json = r#"{"token_url":"http://127.0.0.1:9999/token"}"#;
        let endpoints: Endpoints = serde_json::from_str(json).unwrap();
        assert_eq!(endpoints.token_url, "http://127.0.0.1:9999/token");
        assert_eq!(endpoints.userinfo_url, USERINFO_ENDPOINT);
        assert_eq!(endpoints.issuer_url, ISSUER_URL);
    }
}
