use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::users::dto::PublicUser;

#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    pub title: String,
    pub description: String,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct NewQuestion {
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub description: String,
    pub visible: bool,
}

/// A form with its owner and questions, as listed to clients. The owner is
/// the public projection only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDetails {
    pub id: i64,
    pub user_id: i64,
    pub user: PublicUser,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFormResponse {
    pub message: String,
    pub form: FormDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odoo_response: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> FormDetails {
        FormDetails {
            id: 1,
            user_id: 2,
            user: PublicUser {
                id: 2,
                username: "a".into(),
                email: "a@x.com".into(),
            },
            title: "Feedback".into(),
            description: "Quarterly feedback".into(),
            questions: vec![QuestionDto {
                id: 5,
                title: "How was it?".into(),
                question_type: "text".into(),
                description: String::new(),
                visible: true,
            }],
        }
    }

    #[test]
    fn form_details_never_contain_password_material() {
        let json = serde_json::to_string(&sample_form()).unwrap();
        assert!(!json.to_lowercase().contains("password"));
    }

    #[test]
    fn question_type_serializes_as_type() {
        let json = serde_json::to_string(&sample_form()).unwrap();
        assert!(json.contains(r#""type":"text""#));
        assert!(!json.contains("question_type"));
    }

    #[test]
    fn created_form_omits_sync_response_when_absent() {
        let resp = CreatedFormResponse {
            message: "form created".into(),
            form: sample_form(),
            odoo_response: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("odooResponse"));
    }

    #[test]
    fn new_question_accepts_type_alias_and_defaults_description() {
        let q: NewQuestion =
            serde_json::from_str(r#"{"title":"Q1","type":"text"}"#).unwrap();
        assert_eq!(q.question_type, "text");
        assert_eq!(q.description, "");
    }
}
