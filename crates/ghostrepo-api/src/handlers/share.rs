//! Owner dashboard: share, configure and unshare repositories.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use ghostrepo_core::types::pagination::PageResponse;

use crate::dto::request::{CreateShareRequest, UpdateShareRequest};
use crate::dto::response::{CreateShareResponse, ShareLinkResponse};
use crate::dto::validate_body;
use crate::error::ApiError;
use crate::extractors::{OwnerUser, PageQuery};
use crate::state::AppState;

/// GET /api/shares
pub async fn list_shares(
    State(state): State<AppState>,
    owner: OwnerUser,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<ShareLinkResponse>>, ApiError> {
    let page = state
        .registry
        .list_for_owner(&owner, query.into())
        .await?;

    let items = page
        .items
        .into_iter()
        .map(|link| {
            let url = state.config.server.share_url(&link.token);
            ShareLinkResponse::new(link, url)
        })
        .collect();

    Ok(Json(PageResponse::new(
        items,
        page.page,
        page.page_size,
        page.total_items,
    )))
}

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    owner: OwnerUser,
    Json(req): Json<CreateShareRequest>,
) -> Result<(StatusCode, Json<CreateShareResponse>), ApiError> {
    validate_body(&req)?;

    let link = state
        .registry
        .create(&owner, req.owner.trim(), req.repo.trim(), req.installation_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateShareResponse {
            share_url: state.config.server.share_url(&link.token),
            token: link.token,
        }),
    ))
}

/// PATCH /api/shares/{token}
pub async fn update_share(
    State(state): State<AppState>,
    owner: OwnerUser,
    Path(token): Path<String>,
    Json(req): Json<UpdateShareRequest>,
) -> Result<Json<ShareLinkResponse>, ApiError> {
    let link = state.registry.update(&owner, &token, req).await?;
    let url = state.config.server.share_url(&link.token);
    Ok(Json(ShareLinkResponse::new(link, url)))
}

/// DELETE /api/shares/{token}
pub async fn delete_share(
    State(state): State<AppState>,
    owner: OwnerUser,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.registry.deactivate(&owner, &token).await?;
    Ok(StatusCode::NO_CONTENT)
}
