//! Visitor gate: password check, paid-unlock lookup and grant redemption.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use ghostrepo_core::error::AppError;
use ghostrepo_entity::access::AccessVerdict;

use crate::dto::request::{CheckAccessRequest, RedeemRequest, ValidateRequest};
use crate::dto::response::{AccessResponse, ValidateResponse};
use crate::dto::validate_body;
use crate::error::ApiError;
use crate::extractors::Visitor;
use crate::state::AppState;

/// POST /api/shares/{token}/validate
///
/// Expected gate outcomes are answered with 200 and `valid: false`; only an
/// invalid token is a 404. Once the password check passes the visitor gets a
/// pass so later requests need not resend the password.
pub async fn validate_share(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(token): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, CookieJar, Json<ValidateResponse>), ApiError> {
    let req: ValidateRequest = if body.is_empty() {
        ValidateRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?
    };
    let credentials = visitor.credentials(&token, req.password);
    let evaluation = state.evaluator.evaluate(&token, &credentials).await;
    let response = ValidateResponse::from(&evaluation.verdict);

    match &evaluation.verdict {
        AccessVerdict::Invalid { .. } => {
            Ok((StatusCode::NOT_FOUND, CookieJar::new(), Json(response)))
        }
        AccessVerdict::Open | AccessVerdict::Paywall { .. } => {
            let jar = visitor.issue_pass(
                &token,
                credentials.verified_email.as_deref(),
                evaluation.password_proof(),
            )?;
            Ok((StatusCode::OK, jar, Json(response)))
        }
        AccessVerdict::PasswordRequired { .. } | AccessVerdict::Expired => {
            Ok((StatusCode::OK, CookieJar::new(), Json(response)))
        }
    }
}

/// POST /api/shares/check-access
pub async fn check_access(
    State(state): State<AppState>,
    Json(req): Json<CheckAccessRequest>,
) -> Result<Json<AccessResponse>, ApiError> {
    validate_body(&req)?;
    let valid = state.ledger.has_paid_unlock(&req.token, &req.email).await?;
    Ok(Json(AccessResponse { valid }))
}

/// POST /api/shares/{token}/redeem
///
/// Consumes the single-use grant from the checkout redirect and stores the
/// verified buyer email in the visitor pass.
pub async fn redeem_grant(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(token): Path<String>,
    Json(req): Json<RedeemRequest>,
) -> Result<(CookieJar, Json<AccessResponse>), ApiError> {
    validate_body(&req)?;
    let email = state.ledger.redeem_grant(&token, &req.grant).await?;

    let mut credentials = visitor.credentials(&token, None);
    credentials.verified_email = Some(email.clone());
    let evaluation = state.evaluator.evaluate(&token, &credentials).await;

    let jar = visitor.issue_pass(&token, Some(&email), credentials.password_proof)?;
    Ok((
        jar,
        Json(AccessResponse {
            valid: evaluation.verdict.is_open(),
        }),
    ))
}
