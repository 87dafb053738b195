//! Google OAuth2 / OpenID Connect constants
//!
//! Default endpoint set for Google accounts. Deployments may override any of
//! these through the relay's `[provider]` config section.

/// Authorization endpoint the browser is redirected to
pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";

/// Token endpoint for the authorization code exchange
pub const TOKEN_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/token";

/// User-info endpoint queried for the email and hosted domain claims
pub const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v1/userinfo";

/// Issuer URL kubectl uses to validate and refresh the id token
pub const ISSUER_URL: &str = "https://accounts.google.com";

/// Scopes requested during authorization, already `+`-joined for the query string.
pub const SCOPES: &str = "openid+email+profile";

/// Grant type sent to the token endpoint.
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
