//! Checkout round-trip with the payment processor.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Redirect;

use crate::dto::request::{CheckoutRequest, CheckoutSuccessQuery};
use crate::dto::response::CheckoutResponse;
use crate::dto::validate_body;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/stripe/checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    validate_body(&req)?;
    let url = state.checkout.start(req.into()).await?;
    Ok(Json(CheckoutResponse { url }))
}

/// GET /api/stripe/success
///
/// Answers with a 303 to the viewer page carrying a single-use grant, or to
/// the canceled page when the session is unpaid.
pub async fn checkout_success(
    State(state): State<AppState>,
    Query(query): Query<CheckoutSuccessQuery>,
) -> Result<Redirect, ApiError> {
    let location = state
        .checkout
        .complete(&query.session_id, &query.token)
        .await?;
    Ok(Redirect::to(&location))
}
