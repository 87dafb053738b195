//! Google OpenID Connect client library
//!
//! Provides the provider-facing half of the authorization code flow used by
//! the kubectl credential relay. This crate has no dependency on the relay
//! binary and can be tested on its own.
//!
//! Flow:
//! 1. Relay redirects the browser to `authorize::build_authorization_url()`
//! 2. Provider calls back with a code, relay calls `token::exchange_code()`
//! 3. Relay resolves the user with `userinfo::fetch_email()` and
//!    `userinfo::fetch_hosted_domain()`

pub mod authorize;
pub mod constants;
pub mod endpoints;
pub mod error;
pub mod token;
pub mod userinfo;

pub use authorize::build_authorization_url;
pub use constants::*;
pub use endpoints::Endpoints;
pub use error::{Error, Result};
pub use token::{ExchangeRequest, TokenSet, exchange_code};
pub use userinfo::{UserIdentity, fetch_email, fetch_hosted_domain};
