use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::users::dto::PublicUser;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub api_token: Option<String>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, api_token, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_token(db: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, api_token, created_at
            FROM users
            WHERE api_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await
    }

    /// Creates a user with a token already assigned. Email uniqueness is
    /// enforced by the store constraint.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        api_token: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, api_token)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, api_token, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(api_token)
        .fetch_one(db)
        .await
    }

    /// Deletes a user, returning the deleted id or `None` if it never existed.
    pub async fn delete(db: &PgPool, user_id: i64) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(r#"DELETE FROM users WHERE id = $1 RETURNING id"#)
            .bind(user_id)
            .fetch_optional(db)
            .await
    }

    pub async fn list_public(db: &PgPool) -> Result<Vec<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"SELECT id, username, email FROM users ORDER BY id"#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn ids_without_token(db: &PgPool) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"SELECT id FROM users WHERE api_token IS NULL ORDER BY id"#,
        )
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::generate_token;
    use crate::error::ApiError;
    use sqlx::postgres::PgPoolOptions;

    async fn test_pool() -> PgPool {
        let url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must point at a migrated database");
        PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("connect to test database")
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL with the migrated schema"]
    async fn duplicate_email_registration_fails_with_conflict() {
        let db = test_pool().await;
        let email = format!("dup-{}@test.local", &generate_token()[..12]);

        User::create(&db, "first", &email, "hash-1", &generate_token())
            .await
            .expect("first create");
        let err = User::create(&db, "second", &email, "hash-2", &generate_token())
            .await
            .expect_err("second create with same email must fail");

        let api: ApiError = err.into();
        assert!(matches!(api, ApiError::Conflict(_)));
    }

    #[tokio::test]
    #[ignore = "needs TEST_DATABASE_URL with the migrated schema"]
    async fn deleting_unknown_id_returns_none() {
        let db = test_pool().await;
        let deleted = User::delete(&db, i64::MAX).await.expect("delete query");
        assert_eq!(deleted, None);
    }

    #[test]
    fn user_serialization_skips_password_hash() {
        let user = User {
            id: 1,
            username: "a".into(),
            email: "a@x.com".into(),
            password_hash: "argon2-material".into(),
            api_token: Some("token".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2-material"));
    }
}
