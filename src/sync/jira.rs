use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::config::JiraConfig;
use crate::sync::{CreatedTicket, NewTicket, SyncError, TicketSummary, TrackerClient};

/// Issue tracker adapter for the Jira REST v3 API, authenticated with basic
/// auth (account email + API token).
pub struct JiraClient {
    http: reqwest::Client,
    cfg: JiraConfig,
}

impl JiraClient {
    pub fn new(cfg: JiraConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.cfg.base_url, key)
    }
}

/// Issue payload with the reporter context rendered as an ADF paragraph,
/// the way the tracker's v3 API expects rich text.
pub(crate) fn build_issue_payload(project_key: &str, ticket: &NewTicket) -> Value {
    json!({
        "fields": {
            "project": { "key": project_key },
            "summary": ticket.summary,
            "description": {
                "type": "doc",
                "version": 1,
                "content": [
                    {
                        "type": "paragraph",
                        "content": [
                            { "type": "text", "text": format!("Reported by: {}", ticket.user_email) },
                            { "type": "text", "text": format!("\nTemplate: {}", ticket.template) },
                            { "type": "text", "text": format!("\nPage: {}", ticket.link) },
                        ],
                    },
                ],
            },
            "issuetype": { "name": "Task" },
            "priority": { "name": ticket.priority },
        },
    })
}

#[derive(Debug, Deserialize)]
struct CreateIssueResponse {
    key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct Issue {
    id: String,
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
    status: IssueStatus,
}

#[derive(Debug, Deserialize)]
struct IssueStatus {
    name: String,
}

#[async_trait]
impl TrackerClient for JiraClient {
    #[instrument(skip(self, ticket), fields(summary = %ticket.summary))]
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<CreatedTicket, SyncError> {
        let payload = build_issue_payload(&self.cfg.project_key, ticket);
        let created: CreateIssueResponse = self
            .http
            .post(format!("{}/rest/api/3/issue", self.cfg.base_url))
            .basic_auth(&self.cfg.user_email, Some(&self.cfg.api_token))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let url = self.browse_url(&created.key);
        Ok(CreatedTicket {
            key: created.key,
            url,
        })
    }

    #[instrument(skip(self))]
    async fn list_tickets(&self) -> Result<Vec<TicketSummary>, SyncError> {
        let search: SearchResponse = self
            .http
            .get(format!("{}/rest/api/3/search", self.cfg.base_url))
            .query(&[("jql", format!("project={}", self.cfg.project_key))])
            .basic_auth(&self.cfg.user_email, Some(&self.cfg.api_token))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(search
            .issues
            .into_iter()
            .map(|issue| TicketSummary {
                link: self.browse_url(&issue.key),
                id: issue.id,
                key: issue.key,
                summary: issue.fields.summary,
                status: issue.fields.status.name,
            })
            .collect())
    }
}
