use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: i64,
    pub user_id: i64,
    pub form_id: i64,
    pub question_id: i64,
    pub answer: String,
    pub created_at: OffsetDateTime,
}

/// Answer row joined with responder and question columns, for listing.
#[derive(Debug, Clone, FromRow)]
pub struct AnswerRow {
    pub id: i64,
    pub answer: String,
    pub user_id: i64,
    pub username: String,
    pub question_id: i64,
    pub question_title: String,
    pub question_description: String,
    pub question_type: String,
}

impl Answer {
    /// Inserts one row per (question, value) pair in a single transaction, so
    /// a submission is stored whole or not at all.
    pub async fn create_batch(
        db: &PgPool,
        user_id: i64,
        form_id: i64,
        items: &[(i64, String)],
    ) -> Result<Vec<Answer>, sqlx::Error> {
        let mut tx = db.begin().await?;

        let mut created = Vec::with_capacity(items.len());
        for (question_id, value) in items {
            let answer = sqlx::query_as::<_, Answer>(
                r#"
                INSERT INTO answers (user_id, form_id, question_id, answer)
                VALUES ($1, $2, $3, $4)
                RETURNING id, user_id, form_id, question_id, answer, created_at
                "#,
            )
            .bind(user_id)
            .bind(form_id)
            .bind(question_id)
            .bind(value)
            .fetch_one(&mut *tx)
            .await?;
            created.push(answer);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn list_by_form(db: &PgPool, form_id: i64) -> Result<Vec<AnswerRow>, sqlx::Error> {
        sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT a.id, a.answer,
                   u.id AS user_id, u.username,
                   q.id AS question_id, q.title AS question_title,
                   q.description AS question_description, q.question_type
            FROM answers a
            JOIN users u ON u.id = a.user_id
            JOIN questions q ON q.id = a.question_id
            WHERE a.form_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(form_id)
        .fetch_all(db)
        .await
    }
}
