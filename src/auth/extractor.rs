use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::auth::token::constant_time_eq;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// Resolves `Authorization: Bearer <token>` to the owning user record.
///
/// Missing credential rejects with 401, a token that matches no user with
/// 403. Tokens are long-lived and opaque; there is no expiry.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(ApiError::MissingToken)?;

        let user = User::find_by_token(&state.db, token)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        // The lookup is by exact match already; re-check in constant time so
        // the comparison itself cannot leak a prefix.
        match user.api_token.as_deref() {
            Some(stored) if constant_time_eq(stored, token) => Ok(CurrentUser(user)),
            _ => Err(ApiError::InvalidToken),
        }
    }
}
