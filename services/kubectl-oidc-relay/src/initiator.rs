//! Authorization initiator
//!
//! Sends the browser to the identity provider's consent screen. Nothing here
//! can fail at request time: the URL is pure interpolation of values
//! validated at startup.

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::metrics;
use crate::resolver::RelayState;

/// Respond `302 Found` towards the authorization endpoint, with no body.
pub fn redirect_to_provider(state: &RelayState) -> Response {
    let config = &state.config;
    let location = google_oidc::build_authorization_url(
        &config.provider.authorize_url,
        &config.oauth.client_id,
        &config.oauth.callback_url,
    );

    metrics::record_redirect();
    debug!("redirecting to authorization endpoint");

    (StatusCode::FOUND, [(LOCATION, location)]).into_response()
}
