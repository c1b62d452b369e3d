use tracing::warn;

/// Credentials for the survey platform (Odoo JSON-RPC).
#[derive(Debug, Clone)]
pub struct OdooConfig {
    pub url: String,
    pub db: String,
    pub username: String,
    pub api_key: String,
}

/// Credentials for the issue tracker (Jira REST).
#[derive(Debug, Clone)]
pub struct JiraConfig {
    pub base_url: String,
    pub user_email: String,
    pub api_token: String,
    pub project_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub odoo: Option<OdooConfig>,
    pub jira: Option<JiraConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;

        let odoo = match (
            env_opt("ODOO_URL"),
            env_opt("ODOO_DB"),
            env_opt("ODOO_USERNAME"),
            env_opt("ODOO_API_KEY"),
        ) {
            (Some(url), Some(db), Some(username), Some(api_key)) => Some(OdooConfig {
                url: url.trim_end_matches('/').to_string(),
                db,
                username,
                api_key,
            }),
            (None, _, _, _) => None,
            _ => {
                warn!("incomplete ODOO_* configuration; survey sync disabled");
                None
            }
        };

        let jira = match (
            env_opt("JIRA_BASE_URL"),
            env_opt("JIRA_USER_EMAIL"),
            env_opt("JIRA_API_TOKEN"),
        ) {
            (Some(base_url), Some(user_email), Some(api_token)) => Some(JiraConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                user_email,
                api_token,
                project_key: env_opt("JIRA_PROJECT_KEY").unwrap_or_else(|| "SCRUM".into()),
            }),
            (None, _, _) => None,
            _ => {
                warn!("incomplete JIRA_* configuration; issue tracker disabled");
                None
            }
        };

        Ok(Self {
            database_url,
            odoo,
            jira,
        })
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
