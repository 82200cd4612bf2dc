use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::{ProfileUpdate, UserLocation, UserProfile},
    error::AppError,
    middleware::current_user,
    registration::{RegistrationRequest, RegistrationResult},
    result::ApiResponse,
    utils::{AppJson, TokenClaims, success_to_api_response},
};

use super::model::CreateLocationRequest;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegistrationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationResult>>), AppError> {
    let cancel = state.shutdown.child_token();
    let result = state.registration.register(req, &cancel).await?;

    Ok((StatusCode::CREATED, success_to_api_response(result)))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let user_id = current_user(&claims)?;
    let profile = state.profiles.get_profile(&user_id).await?;

    Ok(success_to_api_response(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    AppJson(req): AppJson<ProfileUpdate>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let user_id = current_user(&claims)?;
    if req.is_empty() {
        return Err(AppError::Validation("nothing to update".into()));
    }

    tracing::info!(%user_id, "Updating user profile");
    let profile = state.profiles.update_profile(&user_id, &req).await?;

    Ok(success_to_api_response(profile))
}

#[axum::debug_handler]
pub async fn add_location(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    AppJson(req): AppJson<CreateLocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserLocation>>), AppError> {
    let user_id = current_user(&claims)?;
    let location = req.into_location(user_id)?;

    tracing::info!(id = %location.id, user_id = %location.user_id, "Adding user location");
    state.locations.insert_location(&location).await?;

    Ok((StatusCode::CREATED, success_to_api_response(location)))
}

#[axum::debug_handler]
pub async fn list_locations(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<ApiResponse<Vec<UserLocation>>>, AppError> {
    let user_id = current_user(&claims)?;
    let locations = state.locations.list_locations(&user_id).await?;

    Ok(success_to_api_response(locations))
}
