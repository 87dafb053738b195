//! User-info lookups
//!
//! The email address and the hosted domain are fetched with two separate
//! GETs against the user-info endpoint. Each lookup authenticates with the
//! access token as a query credential.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

/// Identity assembled from the two user-info lookups.
///
/// `hosted_domain` is empty for accounts outside any organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub email: String,
    pub hosted_domain: String,
}

#[derive(Debug, Deserialize)]
struct EmailClaim {
    email: String,
}

#[derive(Debug, Deserialize)]
struct HostedDomainClaim {
    #[serde(default)]
    hd: String,
}

/// Fetch the authenticated user's email address.
pub async fn fetch_email(
    client: &reqwest::Client,
    userinfo_url: &str,
    access_token: &str,
    timeout: Duration,
) -> Result<String> {
    let claim: EmailClaim = get_json(
        client,
        userinfo_url,
        &[("access_token", access_token)],
        timeout,
    )
    .await?;
    Ok(claim.email)
}

/// Fetch the authenticated user's hosted domain (`hd` claim).
///
/// A response without `hd` yields an empty string. Any transport or decode
/// failure is an error; callers must not treat it as "no domain".
pub async fn fetch_hosted_domain(
    client: &reqwest::Client,
    userinfo_url: &str,
    access_token: &str,
    timeout: Duration,
) -> Result<String> {
    let claim: HostedDomainClaim = get_json(
        client,
        userinfo_url,
        &[("alt", "json"), ("access_token", access_token)],
        timeout,
    )
    .await?;
    Ok(claim.hd)
}

async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    userinfo_url: &str,
    query: &[(&str, &str)],
    timeout: Duration,
) -> Result<T> {
    let response = client
        .get(userinfo_url)
        .query(query)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| Error::transport("user-info request failed", e))?;

    let status = response.status();
    debug!(%status, "user-info endpoint responded");
    if !status.is_success() {
        return Err(Error::UserInfo(format!(
            "user-info endpoint returned {status}"
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| {
            Error::UserInfo(format!("invalid user-info response: {}", e.without_url()))
        })
}
