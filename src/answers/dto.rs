use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersRequest {
    pub user_id: i64,
    pub form_id: i64,
    pub answers: Vec<AnswerItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerItem {
    pub question_id: i64,
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswersResponse {
    pub message: String,
    pub answers: Vec<AnswerDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub id: i64,
    pub user_id: i64,
    pub form_id: i64,
    pub question_id: i64,
    pub answer: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Answer as listed per form, with the responding user and the question
/// embedded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerWithContext {
    pub id: i64,
    pub answer: String,
    pub user: AnswerUser,
    pub question: AnswerQuestion,
}

#[derive(Debug, Serialize)]
pub struct AnswerUser {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuestion {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub question_type: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswersQuery {
    #[serde(rename = "formId")]
    pub form_id: i64,
}
