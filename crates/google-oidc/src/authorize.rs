//! Authorization URL construction
//!
//! The browser is sent to the provider's authorization endpoint with a fixed
//! parameter set: authorization code response, `openid email profile` scopes,
//! forced re-consent and offline access. Forcing consent together with
//! `access_type=offline` makes Google issue a refresh token on every login,
//! which kubectl needs to renew the id token on its own.

use crate::constants::SCOPES;

/// Build the authorization URL for `client_id` returning to `callback_url`.
///
/// Values are interpolated verbatim into the template; nothing else in the
/// query string changes between deployments.
pub fn build_authorization_url(authorize_url: &str, client_id: &str, callback_url: &str) -> String {
    format!(
        "{authorize_url}?redirect_uri={callback_url}&response_type=code&client_id={client_id}&scope={SCOPES}&approval_prompt=force&access_type=offline"
    )
}
