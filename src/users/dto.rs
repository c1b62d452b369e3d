use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response returned after registration; the token is issued at creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
    pub api_token: String,
}

/// Request body for credential verification.
#[derive(Debug, Deserialize)]
pub struct CheckUserRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful credential check, with the (possibly freshly
/// issued) API token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUserResponse {
    pub message: String,
    pub user_id: i64,
    pub api_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedUserResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileTokenResponse {
    pub api_token: String,
}

/// Public part of the user returned to clients. No password material.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responses_use_camel_case_field_names() {
        let resp = RegisterResponse {
            message: "user created".into(),
            user_id: 1,
            api_token: "abc".into(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("userId"));
        assert!(json.contains("apiToken"));
        assert!(!json.contains("user_id"));
    }

    #[test]
    fn public_user_has_no_password_field() {
        let user = PublicUser {
            id: 7,
            username: "a".into(),
            email: "a@x.com".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.to_lowercase().contains("password"));
    }
}
