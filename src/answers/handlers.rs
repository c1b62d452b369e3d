use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::answers::dto::{
    AnswerDto, AnswerQuestion, AnswerUser, AnswerWithContext, AnswersQuery, SubmitAnswersRequest,
    SubmittedAnswersResponse,
};
use crate::answers::repo::Answer;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/answers", get(list_answers))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/answers", post(submit_answers))
}

#[instrument(skip(state, payload))]
pub async fn submit_answers(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitAnswersRequest>,
) -> ApiResult<(StatusCode, Json<SubmittedAnswersResponse>)> {
    if payload.answers.is_empty() {
        return Err(ApiError::BadRequest("answers are required".into()));
    }

    let items: Vec<(i64, String)> = payload
        .answers
        .into_iter()
        .map(|a| (a.question_id, a.answer))
        .collect();

    // Unknown user/form/question ids surface as 404 via FK mapping.
    let created = Answer::create_batch(&state.db, payload.user_id, payload.form_id, &items).await?;

    info!(
        user_id = payload.user_id,
        form_id = payload.form_id,
        count = created.len(),
        "answers submitted"
    );
    Ok((
        StatusCode::CREATED,
        Json(SubmittedAnswersResponse {
            message: "answers created".into(),
            answers: created
                .into_iter()
                .map(|a| AnswerDto {
                    id: a.id,
                    user_id: a.user_id,
                    form_id: a.form_id,
                    question_id: a.question_id,
                    answer: a.answer,
                    created_at: a.created_at,
                })
                .collect(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_answers(
    State(state): State<AppState>,
    Query(query): Query<AnswersQuery>,
) -> ApiResult<Json<Vec<AnswerWithContext>>> {
    let rows = Answer::list_by_form(&state.db, query.form_id).await?;

    let answers = rows
        .into_iter()
        .map(|r| AnswerWithContext {
            id: r.id,
            answer: r.answer,
            user: AnswerUser {
                id: r.user_id,
                username: r.username,
            },
            question: AnswerQuestion {
                id: r.question_id,
                title: r.question_title,
                description: r.question_description,
                question_type: r.question_type,
            },
        })
        .collect();

    Ok(Json(answers))
}
