//! Stripe Checkout client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use ghostrepo_core::config::PaymentConfig;
use ghostrepo_core::error::{AppError, ErrorKind};
use ghostrepo_core::result::AppResult;

use crate::gateway::{CheckoutRequest, CheckoutSession, PaymentGateway};

/// [`PaymentGateway`] backed by the Stripe REST API.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_url: Url,
    secret_key: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_url", &self.api_url.as_str())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: String,
}

impl StripeClient {
    /// Build a client from configuration.
    pub fn new(config: &PaymentConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        let api_url = Url::parse(&config.api_url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid payment.api_url", e)
        })?;
        Ok(Self {
            http,
            api_url,
            secret_key: config.secret_key.clone(),
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> AppResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("payment.api_url cannot be a base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn session_url(&self, session_id: &str) -> AppResult<Url> {
        if !is_session_id(session_id) {
            return Err(AppError::validation("Invalid checkout session id"));
        }
        self.endpoint(["v1", "checkout", "sessions", session_id])
    }
}

/// Checkout session ids are `cs_` prefixed alphanumerics.
fn is_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 255
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Form fields of a one-item payment-mode checkout session.
fn checkout_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("customer_email", request.buyer_email.clone()),
        ("customer_creation", "always".to_string()),
        ("metadata[share_token]", request.share_token.clone()),
        ("metadata[email]", request.buyer_email.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        (
            "line_items[0][price_data][currency]",
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            request.amount_minor.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            request.product_name.clone(),
        ),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
    ]
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutSession> {
        let resp = self
            .http
            .post(self.endpoint(["v1", "checkout", "sessions"])?)
            .bearer_auth(&self.secret_key)
            .form(&checkout_form(request))
            .send()
            .await
            .map_err(request_failed)?;
        let session: CheckoutSession = parse(resp).await?;

        info!(
            session_id = %session.id,
            share_token = %request.share_token,
            amount = request.amount_minor,
            "Checkout session created"
        );
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<CheckoutSession> {
        let resp = self
            .http
            .get(self.session_url(session_id)?)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(request_failed)?;
        parse(resp).await
    }
}

fn request_failed(e: reqwest::Error) -> AppError {
    AppError::with_source(ErrorKind::ExternalService, "Payment processor request failed", e)
}

async fn parse(resp: Response) -> AppResult<CheckoutSession> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp
            .json::<StripeErrorBody>()
            .await
            .map(|b| b.error.message)
            .unwrap_or_else(|_| status.to_string());
        warn!(%status, %message, "Payment processor returned non-success");
        return Err(AppError::upstream(
            Some(status.as_u16()),
            format!("Payment processor: {message}"),
        ));
    }
    resp.json::<CheckoutSession>().await.map_err(|e| {
        AppError::with_source(
            ErrorKind::ExternalService,
            "Unexpected response from payment processor",
            e,
        )
    })
}
