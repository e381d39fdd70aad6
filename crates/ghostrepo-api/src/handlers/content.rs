//! Repository browsing for visitors who passed the gate.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use ghostrepo_core::error::AppError;
use ghostrepo_entity::content::{RepoContent, TreeListing};
use ghostrepo_entity::share::ShareLink;
use ghostrepo_service::content::Hierarchy;

use crate::dto::request::{BranchQuery, FileQuery};
use crate::dto::response::BranchesResponse;
use crate::error::ApiError;
use crate::extractors::Visitor;
use crate::state::AppState;

/// Runs the gate with the visitor's pass and returns the link to browse.
async fn open_link(
    state: &AppState,
    visitor: &Visitor,
    token: &str,
) -> Result<ShareLink, ApiError> {
    let credentials = visitor.credentials(token, None);
    Ok(state.evaluator.authorize(token, &credentials).await?)
}

/// GET /api/shares/{token}
pub async fn get_tree(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(token): Path<String>,
    Query(query): Query<BranchQuery>,
) -> Result<Json<TreeListing>, ApiError> {
    let link = open_link(&state, &visitor, &token).await?;
    let listing = state.resolver.tree(&link, query.branch.as_deref()).await?;
    Ok(Json(listing))
}

/// GET /api/shares/{token}/hierarchy
pub async fn get_hierarchy(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(token): Path<String>,
    Query(query): Query<BranchQuery>,
) -> Result<Json<Hierarchy>, ApiError> {
    let link = open_link(&state, &visitor, &token).await?;
    let hierarchy = state
        .resolver
        .hierarchy(&link, query.branch.as_deref())
        .await?;
    Ok(Json(hierarchy))
}

/// GET /api/shares/{token}/branches
pub async fn list_branches(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(token): Path<String>,
) -> Result<Json<BranchesResponse>, ApiError> {
    let link = open_link(&state, &visitor, &token).await?;
    let branches = state.resolver.branches(&link).await?;
    Ok(Json(BranchesResponse { branches }))
}

/// GET /api/shares/file
pub async fn get_file(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(query): Query<FileQuery>,
) -> Result<Json<RepoContent>, ApiError> {
    let link = open_link(&state, &visitor, &query.token).await?;
    let content = state
        .resolver
        .file(&link, &query.path, query.branch.as_deref())
        .await?;
    Ok(Json(content))
}

/// GET /api/shares/{token}/zip
pub async fn download_zip(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(token): Path<String>,
    Query(query): Query<BranchQuery>,
) -> Result<Response, ApiError> {
    let link = open_link(&state, &visitor, &token).await?;
    let archive = state.resolver.zip(&link, query.branch.as_deref()).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", archive.filename),
        )
        .body(Body::from_stream(archive.body))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
