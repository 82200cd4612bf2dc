use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{AppState, error::AppError, utils::TokenClaims};

/// Resolves the caller's claims for every route. Requests without credentials go through
/// as anonymous; a token that fails verification is rejected here.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let claims = state.tokens.claims_from_header(header).map_err(|e| {
        tracing::info!(error = %e, "Rejected bearer token");
        AppError::InvalidToken(e)
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Id of the signed-in user, or `Unauthorized` for anonymous callers.
pub fn current_user(claims: &TokenClaims) -> Result<String, AppError> {
    claims
        .user_id()
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}
