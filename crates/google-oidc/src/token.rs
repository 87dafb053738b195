//! Authorization code exchange
//!
//! POSTs the single-use authorization code to the token endpoint and parses
//! the access, refresh and id tokens out of the JSON response. The exchange
//! is never retried: a code the provider has already seen is rejected.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::constants::GRANT_TYPE_AUTHORIZATION_CODE;
use crate::error::{Error, Result};

/// Tokens returned by a successful code exchange.
///
/// `refresh_token` is empty when the provider decides not to issue one.
#[derive(Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    pub id_token: String,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("id_token", &"[REDACTED]")
            .finish()
    }
}

/// Parameters for the code exchange.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeRequest<'a> {
    pub code: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
}

/// Exchange an authorization code for a [`TokenSet`].
///
/// Transport errors, timeouts, non-success statuses and undecodable bodies
/// all surface as errors; the caller decides how to report them.
pub async fn exchange_code(
    client: &reqwest::Client,
    token_url: &str,
    request: &ExchangeRequest<'_>,
    timeout: Duration,
) -> Result<TokenSet> {
    let response = client
        .post(token_url)
        .form(&[
            ("code", request.code),
            ("client_secret", request.client_secret),
            ("redirect_uri", request.redirect_uri),
            ("grant_type", GRANT_TYPE_AUTHORIZATION_CODE),
            ("client_id", request.client_id),
        ])
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| Error::transport("token exchange request failed", e))?;

    let status = response.status();
    debug!(%status, "token endpoint responded");
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::TokenExchange(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    response
        .json::<TokenSet>()
        .await
        .map_err(|e| {
            Error::TokenExchange(format!("invalid token response: {}", e.without_url()))
        })
}
