//! Callback error types
//!
//! Every failure in the callback sequence is caught at the resolver boundary
//! and converted into a bare status response. Bodies are the canonical
//! reason phrase only; causes go to the log, never to the browser.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// External call that failed during a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TokenExchange,
    EmailLookup,
    HostedDomainLookup,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::TokenExchange => "token_exchange",
            Stage::EmailLookup => "email_lookup",
            Stage::HostedDomainLookup => "hosted_domain_lookup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a callback does not produce a credential.
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("callback carried no authorization code")]
    MissingCode,

    #[error("identity provider returned error: {0}")]
    ProviderDenied(String),

    #[error("{stage} failed: {source}")]
    UpstreamCallFailure {
        stage: Stage,
        #[source]
        source: google_oidc::Error,
    },

    #[error("hosted domain {hosted_domain:?} is not allowed")]
    PolicyRejection { hosted_domain: String },
}

impl CallbackError {
    pub fn upstream(stage: Stage) -> impl FnOnce(google_oidc::Error) -> Self {
        move |source| CallbackError::UpstreamCallFailure { stage, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CallbackError::MissingCode | CallbackError::ProviderDenied(_) => {
                StatusCode::BAD_REQUEST
            }
            CallbackError::UpstreamCallFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CallbackError::PolicyRejection { .. } => StatusCode::FORBIDDEN,
        }
    }

    /// Outcome label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            CallbackError::MissingCode | CallbackError::ProviderDenied(_) => "bad_request",
            CallbackError::UpstreamCallFailure { .. } => "upstream_error",
            CallbackError::PolicyRejection { .. } => "forbidden",
        }
    }
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        (
            status,
            [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{reason}\n"),
        )
            .into_response()
    }
}
