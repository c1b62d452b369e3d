use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::forms::dto::NewQuestion;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Form {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub form_id: i64,
    pub title: String,
    pub question_type: String,
    pub description: String,
    pub visible: bool,
}

/// Form row joined with its owner's public columns, for listing.
#[derive(Debug, Clone, FromRow)]
pub struct FormWithOwner {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub owner_username: String,
    pub owner_email: String,
}

impl Form {
    /// Inserts the form and all of its questions in one transaction.
    pub async fn create_with_questions(
        db: &PgPool,
        user_id: i64,
        title: &str,
        description: &str,
        questions: &[NewQuestion],
    ) -> Result<(Form, Vec<Question>), sqlx::Error> {
        let mut tx = db.begin().await?;

        let form = sqlx::query_as::<_, Form>(
            r#"
            INSERT INTO forms (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        let mut created = Vec::with_capacity(questions.len());
        for q in questions {
            let question = sqlx::query_as::<_, Question>(
                r#"
                INSERT INTO questions (form_id, title, question_type, description, visible)
                VALUES ($1, $2, $3, $4, TRUE)
                RETURNING id, form_id, title, question_type, description, visible
                "#,
            )
            .bind(form.id)
            .bind(&q.title)
            .bind(&q.question_type)
            .bind(&q.description)
            .fetch_one(&mut *tx)
            .await?;
            created.push(question);
        }

        tx.commit().await?;
        Ok((form, created))
    }

    pub async fn list_with_owners(db: &PgPool) -> Result<Vec<FormWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, FormWithOwner>(
            r#"
            SELECT f.id, f.user_id, f.title, f.description,
                   u.username AS owner_username, u.email AS owner_email
            FROM forms f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.id
            "#,
        )
        .fetch_all(db)
        .await
    }
}

impl Question {
    pub async fn list_for_forms(
        db: &PgPool,
        form_ids: &[i64],
    ) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            r#"
            SELECT id, form_id, title, question_type, description, visible
            FROM questions
            WHERE form_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(form_ids)
        .fetch_all(db)
        .await
    }
}
