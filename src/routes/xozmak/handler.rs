use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::{Xozmak, XozmakUpdate},
    error::AppError,
    middleware::current_user,
    result::ApiResponse,
    utils::{AppJson, TokenClaims, success_to_api_response},
};

use super::model::{CreateXozmakRequest, validate_update};

#[axum::debug_handler]
pub async fn create_xozmak(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    AppJson(req): AppJson<CreateXozmakRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Xozmak>>), AppError> {
    let created_by = current_user(&claims)?;
    let xozmak = req.into_xozmak(created_by)?;

    tracing::info!(id = %xozmak.id, name = %xozmak.name, created_by = %xozmak.created_by, "CreateXozmak started");
    state.xozmaks.create_xozmak(&xozmak).await?;
    tracing::info!(id = %xozmak.id, "CreateXozmak finished");

    Ok((StatusCode::CREATED, success_to_api_response(xozmak)))
}

#[axum::debug_handler]
pub async fn list_xozmaks(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Xozmak>>>, AppError> {
    let xozmaks = state.xozmaks.list_xozmaks().await?;
    Ok(success_to_api_response(xozmaks))
}

#[axum::debug_handler]
pub async fn update_xozmak(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
    AppJson(req): AppJson<XozmakUpdate>,
) -> Result<Json<ApiResponse<Xozmak>>, AppError> {
    current_user(&claims)?;
    validate_update(&req)?;

    tracing::info!(%id, "UpdateXozmak started");
    let xozmak = state.xozmaks.update_xozmak(&id, &req).await?;

    Ok(success_to_api_response(xozmak))
}

#[axum::debug_handler]
pub async fn delete_xozmak(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    current_user(&claims)?;

    tracing::info!(%id, "DeleteXozmak started");
    state.xozmaks.delete_xozmak(&id).await?;

    Ok(success_to_api_response(()))
}
