use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::extractor::CurrentUser;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::service::issue_token_if_absent;
use crate::auth::token::generate_token;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::state::AppState;
use crate::users::dto::{
    CheckUserRequest, CheckUserResponse, DeletedUserResponse, ProfileTokenResponse, PublicUser,
    RegisterRequest, RegisterResponse,
};
use crate::users::repo::User;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/users", get(list_users))
        .route("/check-user", post(check_user))
        .route("/delete-user/:id", delete(delete_user))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile/token", get(profile_token))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("all fields are required".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(ApiError::internal)?;
    let api_token = generate_token();

    // The unique constraint closes the race the pre-check leaves open;
    // a concurrent duplicate surfaces as 409 through the sqlx mapping.
    let user = User::create(&state.db, &payload.username, &payload.email, &hash, &api_token)
        .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created".into(),
            user_id: user.id,
            api_token,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    let users = User::list_public(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn check_user(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<CheckUserRequest>,
) -> ApiResult<Json<CheckUserResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".into()));
    }

    let found = User::find_by_email(&state.db, &payload.email).await?;
    let user = verify_credentials(found, &payload.password)?;

    // Lazy issuance: users from before the token scheme get one on first
    // successful login, everyone else gets their stored token back.
    let api_token = match user.api_token {
        Some(token) => token,
        None => issue_token_if_absent(&state.db, user.id).await?,
    };

    info!(user_id = user.id, "credentials verified");
    Ok(Json(CheckUserResponse {
        message: "user exists and password is valid".into(),
        user_id: user.id,
        api_token,
    }))
}

/// Credential decision ladder: unknown email → 404, password mismatch → 401,
/// otherwise the user record.
fn verify_credentials(found: Option<User>, password: &str) -> Result<User, ApiError> {
    let user = found.ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    let ok = verify_password(password, &user.password_hash).map_err(ApiError::internal)?;
    if !ok {
        warn!(user_id = user.id, "invalid password");
        return Err(ApiError::InvalidCredentials);
    }
    Ok(user)
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedUserResponse>> {
    let deleted = User::delete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    info!(user_id = deleted, "user deleted");
    Ok(Json(DeletedUserResponse {
        message: "user deleted".into(),
        user_id: deleted,
    }))
}

#[instrument(skip(user))]
pub async fn profile_token(
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<ProfileTokenResponse>> {
    // Authentication resolved the user by token, so one is always present.
    let api_token = user.api_token.ok_or_else(|| {
        ApiError::internal(anyhow::anyhow!("authenticated user has no token"))
    })?;
    Ok(Json(ProfileTokenResponse { api_token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn stored_user(password: &str) -> User {
        User {
            id: 1,
            username: "a".into(),
            email: "a@x.com".into(),
            password_hash: hash_password(password).expect("hashing should succeed"),
            api_token: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn unknown_email_is_not_found() {
        let err = verify_credentials(None, "p").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let err = verify_credentials(Some(stored_user("p")), "wrong").unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[test]
    fn correct_password_returns_the_user() {
        let user = verify_credentials(Some(stored_user("p")), "p").expect("should verify");
        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn body_missing_a_field_rejects_with_bad_request() {
        use axum::body::Body;
        use axum::extract::FromRequest;

        let req = axum::http::Request::builder()
            .method("POST")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"a@x.com","password":"p"}"#))
            .unwrap();

        let err = AppJson::<RegisterRequest>::from_request(req, &())
            .await
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@x.com"));
    }
}
