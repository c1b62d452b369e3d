use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, instrument};

use crate::error::{ApiError, ApiResult, AppJson};
use crate::state::AppState;
use crate::sync::{NewTicket, SyncError, TicketSummary};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-ticket", post(create_ticket))
        .route("/get-tickets", get(get_tickets))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketResponse {
    pub jira_ticket_url: String,
}

#[instrument(skip(state, ticket))]
pub async fn create_ticket(
    State(state): State<AppState>,
    AppJson(ticket): AppJson<NewTicket>,
) -> ApiResult<Json<CreateTicketResponse>> {
    if ticket.summary.trim().is_empty() {
        return Err(ApiError::BadRequest("summary is required".into()));
    }

    let created = state
        .tracker
        .create_ticket(&ticket)
        .await
        .map_err(tracker_error)?;

    Ok(Json(CreateTicketResponse {
        jira_ticket_url: created.url,
    }))
}

#[instrument(skip(state))]
pub async fn get_tickets(State(state): State<AppState>) -> ApiResult<Json<Vec<TicketSummary>>> {
    let tickets = state.tracker.list_tickets().await.map_err(tracker_error)?;
    Ok(Json(tickets))
}

fn tracker_error(err: SyncError) -> ApiError {
    error!(error = %err, "issue tracker call failed");
    ApiError::Unavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_url_serializes_with_expected_name() {
        let resp = CreateTicketResponse {
            jira_ticket_url: "https://x.atlassian.net/browse/SCRUM-1".into(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("jiraTicketUrl"));
    }

    #[test]
    fn disabled_tracker_maps_to_unavailable() {
        let err = tracker_error(SyncError::Disabled);
        assert!(matches!(err, ApiError::Unavailable(_)));
    }
}
