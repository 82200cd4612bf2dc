use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    database::{Category, CategoryUpdate, SubCategory, SubCategoryUpdate},
    error::AppError,
    middleware::current_user,
    result::ApiResponse,
    utils::{AppJson, TokenClaims, required_field, success_to_api_response},
};

use super::model::{CreateCategoryRequest, CreateSubCategoryRequest, SubCategoryQuery};

#[axum::debug_handler]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    AppJson(req): AppJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), AppError> {
    current_user(&claims)?;
    let category = req.into_category()?;

    tracing::info!(id = %category.id, name = %category.name, "Creating category");
    state.categories.create_category(&category).await?;

    Ok((StatusCode::CREATED, success_to_api_response(category)))
}

#[axum::debug_handler]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    let categories = state.categories.list_categories().await?;
    Ok(success_to_api_response(categories))
}

#[axum::debug_handler]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
    AppJson(req): AppJson<CategoryUpdate>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    current_user(&claims)?;
    let name = required_field("name", req.name.as_deref().unwrap_or_default())?;

    let category = state
        .categories
        .update_category(&id, &CategoryUpdate { name: Some(name) })
        .await?;

    Ok(success_to_api_response(category))
}

#[axum::debug_handler]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    current_user(&claims)?;

    tracing::info!(%id, "Deleting category");
    state.categories.delete_category(&id).await?;

    Ok(success_to_api_response(()))
}

#[axum::debug_handler]
pub async fn create_sub_category(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    AppJson(req): AppJson<CreateSubCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubCategory>>), AppError> {
    current_user(&claims)?;
    let sub_category = req.into_sub_category()?;

    tracing::info!(
        id = %sub_category.id,
        category_id = %sub_category.category_id,
        "Creating sub category"
    );
    state.sub_categories.create_sub_category(&sub_category).await?;

    Ok((StatusCode::CREATED, success_to_api_response(sub_category)))
}

#[axum::debug_handler]
pub async fn list_sub_categories(
    State(state): State<AppState>,
    Query(query): Query<SubCategoryQuery>,
) -> Result<Json<ApiResponse<Vec<SubCategory>>>, AppError> {
    let sub_categories = state
        .sub_categories
        .list_sub_categories(query.category_id.as_deref())
        .await?;
    Ok(success_to_api_response(sub_categories))
}

#[axum::debug_handler]
pub async fn update_sub_category(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
    AppJson(req): AppJson<SubCategoryUpdate>,
) -> Result<Json<ApiResponse<SubCategory>>, AppError> {
    current_user(&claims)?;
    if req.is_empty() {
        return Err(AppError::Validation("nothing to update".into()));
    }

    let sub_category = state.sub_categories.update_sub_category(&id, &req).await?;

    Ok(success_to_api_response(sub_category))
}

#[axum::debug_handler]
pub async fn delete_sub_category(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    current_user(&claims)?;

    tracing::info!(%id, "Deleting sub category");
    state.sub_categories.delete_sub_category(&id).await?;

    Ok(success_to_api_response(()))
}
