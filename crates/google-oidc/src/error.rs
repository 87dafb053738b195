//! Error types for identity provider calls

/// Errors from calls against the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("user-info lookup failed: {0}")]
    UserInfo(String),
}

impl Error {
    /// Classify a reqwest transport error, keeping timeouts distinguishable.
    ///
    /// The request URL is stripped: user-info URLs carry the access token
    /// in their query string.
    pub(crate) fn transport(context: &str, e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            Error::Timeout(format!("{context}: {e}"))
        } else {
            Error::Http(format!("{context}: {e}"))
        }
    }

    /// Short label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Http(_) => "http",
            Error::Timeout(_) => "timeout",
            Error::TokenExchange(_) => "token_exchange",
            Error::UserInfo(_) => "userinfo",
        }
    }
}

/// Result alias for identity provider operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_context() {
        let err = Error::TokenExchange("token endpoint returned 400".into());
        assert_eq!(
            err.to_string(),
            "token exchange failed: token endpoint returned 400"
        );
        assert!(
            Error::Timeout("email lookup".into())
                .to_string()
                .starts_with("request timed out")
        );
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(Error::Http(String::new()).kind(), "http");
        assert_eq!(Error::Timeout(String::new()).kind(), "timeout");
        assert_eq!(Error::TokenExchange(String::new()).kind(), "token_exchange");
        assert_eq!(Error::UserInfo(String::new()).kind(), "userinfo");
    }
}
