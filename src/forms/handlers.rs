use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::extractor::CurrentUser;
use crate::error::{ApiError, ApiResult, AppJson};
use crate::forms::dto::{CreateFormRequest, CreatedFormResponse, FormDetails, QuestionDto};
use crate::forms::repo::{Form, Question};
use crate::state::AppState;
use crate::sync::{SurveyDraft, SurveyQuestion};
use crate::users::dto::PublicUser;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/forms", get(list_forms))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/forms", post(create_form))
}

#[instrument(skip(state, user, payload))]
pub async fn create_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<CreateFormRequest>,
) -> ApiResult<(StatusCode, Json<CreatedFormResponse>)> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(ApiError::BadRequest("title and description are required".into()));
    }
    if payload.questions.is_empty() {
        return Err(ApiError::BadRequest("questions are required".into()));
    }

    let (form, questions) = Form::create_with_questions(
        &state.db,
        user.id,
        payload.title.trim(),
        payload.description.trim(),
        &payload.questions,
    )
    .await?;

    info!(form_id = form.id, user_id = user.id, "form created");

    // Push to the survey platform; a sync failure never fails the request.
    let draft = SurveyDraft {
        title: form.title.clone(),
        description: form.description.clone(),
        questions: questions
            .iter()
            .map(|q| SurveyQuestion {
                title: q.title.clone(),
                question_type: q.question_type.clone(),
                description: q.description.clone(),
                visible: q.visible,
            })
            .collect(),
    };
    let odoo_response = match state.survey.create_survey(&draft).await {
        Ok(resp) => Some(resp),
        Err(e) => {
            warn!(form_id = form.id, error = %e, "survey sync failed");
            None
        }
    };

    let details = FormDetails {
        id: form.id,
        user_id: form.user_id,
        user: PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        },
        title: form.title,
        description: form.description,
        questions: questions.into_iter().map(question_dto).collect(),
    };

    Ok((
        StatusCode::CREATED,
        Json(CreatedFormResponse {
            message: "form created".into(),
            form: details,
            odoo_response,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_forms(State(state): State<AppState>) -> ApiResult<Json<Vec<FormDetails>>> {
    let forms = Form::list_with_owners(&state.db).await?;
    let form_ids: Vec<i64> = forms.iter().map(|f| f.id).collect();

    let mut questions_by_form: HashMap<i64, Vec<QuestionDto>> = HashMap::new();
    for q in Question::list_for_forms(&state.db, &form_ids).await? {
        questions_by_form
            .entry(q.form_id)
            .or_default()
            .push(question_dto(q));
    }

    let details = forms
        .into_iter()
        .map(|f| FormDetails {
            id: f.id,
            user_id: f.user_id,
            user: PublicUser {
                id: f.user_id,
                username: f.owner_username,
                email: f.owner_email,
            },
            title: f.title,
            description: f.description,
            questions: questions_by_form.remove(&f.id).unwrap_or_default(),
        })
        .collect();

    Ok(Json(details))
}

fn question_dto(q: Question) -> QuestionDto {
    QuestionDto {
        id: q.id,
        title: q.title,
        question_type: q.question_type,
        description: q.description,
        visible: q.visible,
    }
}
