use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::config::OdooConfig;
use crate::sync::{SurveyClient, SurveyDraft, SurveySummary, SyncError};

/// Survey platform adapter speaking Odoo's JSON-RPC endpoint. Every
/// operation authenticates against the `common` service for a numeric uid,
/// then calls `execute_kw` on the `object` service.
pub struct OdooClient {
    http: reqwest::Client,
    cfg: OdooConfig,
}

impl OdooClient {
    pub fn new(cfg: OdooConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    async fn call(&self, service: &str, method: &str, args: Value) -> Result<Value, SyncError> {
        let body = rpc_envelope(service, method, args);
        let resp: Value = self
            .http
            .post(format!("{}/jsonrpc", self.cfg.url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = resp.get("error") {
            return Err(SyncError::Protocol(err.to_string()));
        }
        Ok(resp.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn authenticate(&self) -> Result<i64, SyncError> {
        let uid = self
            .call(
                "common",
                "authenticate",
                json!([self.cfg.db, self.cfg.username, self.cfg.api_key, {}]),
            )
            .await?;
        uid.as_i64()
            .filter(|uid| *uid > 0)
            .ok_or_else(|| SyncError::Protocol("authentication rejected".into()))
    }

    async fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, SyncError> {
        let uid = self.authenticate().await?;
        debug!(uid, model, method, "odoo execute_kw");
        self.call(
            "object",
            "execute_kw",
            json!([self.cfg.db, uid, self.cfg.api_key, model, method, args, kwargs]),
        )
        .await
    }
}

pub(crate) fn rpc_envelope(service: &str, method: &str, args: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "call",
        "params": {
            "service": service,
            "method": method,
            "args": args,
        },
        "id": 1,
    })
}

#[async_trait]
impl SurveyClient for OdooClient {
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create_survey(&self, draft: &SurveyDraft) -> Result<Value, SyncError> {
        let fields = json!({
            "title": draft.title,
            "description": draft.description,
            "questions": draft.questions,
        });
        self.execute_kw("survey.survey", "create", json!([fields]), json!({}))
            .await
    }

    #[instrument(skip(self))]
    async fn list_surveys(&self) -> Result<Vec<SurveySummary>, SyncError> {
        let result = self
            .execute_kw(
                "survey.survey",
                "search_read",
                json!([[]]),
                json!({ "fields": ["id", "title"] }),
            )
            .await?;
        serde_json::from_value(result).map_err(|e| SyncError::Protocol(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_service_and_method() {
        let body = rpc_envelope("common", "authenticate", json!(["db", "user", "key", {}]));
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "call");
        assert_eq!(body["params"]["service"], "common");
        assert_eq!(body["params"]["method"], "authenticate");
        assert_eq!(body["params"]["args"][0], "db");
    }

    #[test]
    fn survey_summaries_parse_from_search_read_result() {
        let result = json!([
            { "id": 3, "title": "Customer feedback" },
            { "id": 9, "title": "Onboarding" },
        ]);
        let surveys: Vec<SurveySummary> = serde_json::from_value(result).unwrap();
        assert_eq!(surveys.len(), 2);
        assert_eq!(surveys[0].id, 3);
        assert_eq!(surveys[1].title, "Onboarding");
    }
}
