pub mod handlers;
pub mod jira;
pub mod odoo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not configured")]
    Disabled,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Protocol(String),
}

/// A form as pushed to the survey platform.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyDraft {
    pub title: String,
    pub description: String,
    pub questions: Vec<SurveyQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyQuestion {
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub description: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveySummary {
    pub id: i64,
    pub title: String,
}

/// Ticket request as accepted by the inbound route; field names follow the
/// tracker integration the frontend already speaks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub summary: String,
    pub priority: String,
    pub link: String,
    pub template: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedTicket {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketSummary {
    pub id: String,
    pub key: String,
    pub summary: String,
    pub status: String,
    pub link: String,
}

/// One-way push of local forms to the survey platform. Calls are synchronous
/// within request handlers, best-effort, no retry.
#[async_trait]
pub trait SurveyClient: Send + Sync {
    async fn create_survey(&self, draft: &SurveyDraft) -> Result<serde_json::Value, SyncError>;
    async fn list_surveys(&self) -> Result<Vec<SurveySummary>, SyncError>;
}

/// One-way ticket creation/search against the issue tracker.
#[async_trait]
pub trait TrackerClient: Send + Sync {
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<CreatedTicket, SyncError>;
    async fn list_tickets(&self) -> Result<Vec<TicketSummary>, SyncError>;
}

/// Stand-in used when no survey platform is configured.
pub struct DisabledSurvey;

#[async_trait]
impl SurveyClient for DisabledSurvey {
    async fn create_survey(&self, _draft: &SurveyDraft) -> Result<serde_json::Value, SyncError> {
        Err(SyncError::Disabled)
    }

    async fn list_surveys(&self) -> Result<Vec<SurveySummary>, SyncError> {
        Err(SyncError::Disabled)
    }
}

/// Stand-in used when no issue tracker is configured.
pub struct DisabledTracker;

#[async_trait]
impl TrackerClient for DisabledTracker {
    async fn create_ticket(&self, _ticket: &NewTicket) -> Result<CreatedTicket, SyncError> {
        Err(SyncError::Disabled)
    }

    async fn list_tickets(&self) -> Result<Vec<TicketSummary>, SyncError> {
        Err(SyncError::Disabled)
    }
}
