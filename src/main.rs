mod answers;
mod app;
mod auth;
mod config;
mod error;
mod forms;
mod state;
mod sync;
mod users;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "formbridge=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    // Eager sweep: every user created before tokens existed gets one at boot.
    match auth::service::backfill_missing_tokens(&state.db).await {
        Ok(report) => {
            if !report.failed.is_empty() {
                tracing::warn!(
                    issued = report.issued,
                    failed = ?report.failed,
                    "token backfill finished with failures"
                );
            } else if report.issued > 0 {
                tracing::info!(issued = report.issued, "token backfill finished");
            }
        }
        Err(e) => tracing::warn!(error = %e, "token backfill could not list users"),
    }

    // Best-effort reachability probe against the survey platform.
    let survey = state.survey.clone();
    tokio::spawn(async move {
        match survey.list_surveys().await {
            Ok(surveys) => tracing::info!(count = surveys.len(), "survey platform reachable"),
            Err(e) => tracing::warn!(error = %e, "survey platform probe failed"),
        }
    });

    let app = app::build_app(state);
    app::serve(app).await
}
