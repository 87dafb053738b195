//! Callback resolver
//!
//! Turns an authorization code into an accept/reject decision. Three serial
//! calls against the identity provider: code exchange, email lookup, hosted
//! domain lookup. The hosted domain must equal the configured allowed domain
//! exactly; any failed lookup rejects the callback before the comparison.
//!
//! The response body is rendered into a buffer before the status is chosen,
//! so a success status is never sent with a partial body.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::error::{CallbackError, Stage};
use crate::metrics::{self, RequestCounters};
use crate::render::{CredentialParams, render_credentials};
use google_oidc::{ExchangeRequest, UserIdentity};

/// Shared state passed to the relay handlers via axum State extractor.
///
/// Everything here is read-only per request; the counters are process-wide
/// observability only.
#[derive(Clone)]
pub struct RelayState {
    pub client: reqwest::Client,
    pub config: Arc<Config>,
    pub counters: RequestCounters,
}

/// Query parameters the provider appends to the callback URL.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    /// Set instead of `code` when the user declines consent
    pub error: Option<String>,
}

/// Handle `GET /callback`: resolve the code and map the result to a response.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn handle_callback(
    state: &RelayState,
    params: CallbackParams,
    request_id: String,
) -> Response {
    let started = Instant::now();
    state.counters.callbacks_total.fetch_add(1, Ordering::Relaxed);

    let result = resolve(state, params).await;
    let outcome = match &result {
        Ok(_) => "issued",
        Err(e) => e.outcome(),
    };
    metrics::record_callback(outcome, started.elapsed().as_secs_f64());

    match result {
        Ok(body) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            report(state, &e);
            e.into_response()
        }
    }
}

/// Log and count a failed callback.
fn report(state: &RelayState, err: &CallbackError) {
    match err {
        CallbackError::UpstreamCallFailure { stage, source } => {
            state.counters.errors_total.fetch_add(1, Ordering::Relaxed);
            metrics::record_upstream_error(stage.as_str(), source.kind());
            error!(stage = %stage, error = %source, "identity provider call failed");
        }
        CallbackError::PolicyRejection { hosted_domain } => {
            state.counters.rejections_total.fetch_add(1, Ordering::Relaxed);
            warn!(
                hosted_domain = %hosted_domain,
                allowed_domain = %state.config.oauth.allowed_domain,
                "hosted domain does not match"
            );
        }
        CallbackError::MissingCode | CallbackError::ProviderDenied(_) => {
            warn!(error = %err, "rejecting malformed callback");
        }
    }
}

/// Run the exchange and policy check, returning the rendered credential.
pub async fn resolve(state: &RelayState, params: CallbackParams) -> Result<String, CallbackError> {
    if let Some(denied) = params.error {
        return Err(CallbackError::ProviderDenied(denied));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(CallbackError::MissingCode)?;

    let config = &state.config;
    let timeout = config.server.timeout();
    let userinfo_url = &config.provider.userinfo_url;

    let tokens = google_oidc::exchange_code(
        &state.client,
        &config.provider.token_url,
        &ExchangeRequest {
            code: &code,
            client_id: &config.oauth.client_id,
            client_secret: config.oauth.client_secret.expose(),
            redirect_uri: &config.oauth.callback_url,
        },
        timeout,
    )
    .await
    .map_err(CallbackError::upstream(Stage::TokenExchange))?;

    let email =
        google_oidc::fetch_email(&state.client, userinfo_url, &tokens.access_token, timeout)
            .await
            .map_err(CallbackError::upstream(Stage::EmailLookup))?;

    let hosted_domain = google_oidc::fetch_hosted_domain(
        &state.client,
        userinfo_url,
        &tokens.access_token,
        timeout,
    )
    .await
    .map_err(CallbackError::upstream(Stage::HostedDomainLookup))?;

    let identity = UserIdentity {
        email,
        hosted_domain,
    };

    if identity.hosted_domain != config.oauth.allowed_domain {
        return Err(CallbackError::PolicyRejection {
            hosted_domain: identity.hosted_domain,
        });
    }

    info!(email = %identity.email, "issuing kubectl credential");

    Ok(render_credentials(&CredentialParams {
        command: &config.output.command,
        email: &identity.email,
        client_id: &config.oauth.client_id,
        client_secret: config.oauth.client_secret.expose(),
        id_token: &tokens.id_token,
        issuer_url: &config.provider.issuer_url,
        refresh_token: &tokens.refresh_token,
    }))
}
