//! HTTP sync boundary
//!
//! Serves the same API surface the study app's web client already talks
//! to: snapshot push/pull under `/api/sync`, a progress summary under
//! `/api/status`, and manual report triggers under `/api/report/{slot}`.

use crate::config::{ReportsConfig, ServerConfig};
use crate::reporter::{Reporter, ReportSlot};
use crate::state::StateManager;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, SecondsFormat, Utc};
use serde_json::json;
use studycore::domain::AppState;
use studycore::{analyzer, diff};
use tracing::{error, info, warn};

/// Shared context for the request handlers
#[derive(Clone)]
pub struct AppCtx {
    pub state: StateManager,
    pub reporter: Reporter,
    pub reports: ReportsConfig,
}

pub fn router(ctx: AppCtx) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/sync", get(get_sync))
        .route("/api/sync", post(post_sync))
        .route("/api/status", get(get_status))
        .route("/api/report/{slot}", post(post_report))
        .with_state(ctx)
}

/// Bind and serve until the task is cancelled
pub async fn run_server(ctx: AppCtx, config: &ServerConfig) -> eyre::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    info!("Sync server listening on http://{local_addr}");
    axum::serve(listener, router(ctx)).await?;
    Ok(())
}

async fn health(State(ctx): State<AppCtx>) -> impl IntoResponse {
    let snapshot = match ctx.state.get().await {
        Ok(Some(_)) => "var",
        _ => "yok",
    };

    Json(json!({
        "status": "🟢 AGS Disiplin Botu çalışıyor!",
        "reports": {
            "morning": ctx.reports.morning,
            "midday": ctx.reports.midday,
            "evening": ctx.reports.evening,
        },
        "snapshot": snapshot,
    }))
}

async fn get_sync(State(ctx): State<AppCtx>) -> impl IntoResponse {
    let state = match ctx.state.get().await {
        Ok(state) => state,
        Err(e) => {
            warn!("Sync read over unreadable snapshot: {}", e);
            None
        }
    };

    Json(json!({ "state": state }))
}

async fn post_sync(
    State(ctx): State<AppCtx>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    let Some(state_value) = body.get("state").filter(|v| !v.is_null()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Veri gönderilmedi" })),
        );
    };

    let new_state: AppState = match serde_json::from_value(state_value.clone()) {
        Ok(state) => state,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": format!("Geçersiz state: {e}") })),
            );
        }
    };

    match ctx.state.replace(new_state.clone()).await {
        Ok(previous) => {
            // Notices only make sense against a previous snapshot; the
            // first sync ever stays quiet
            if let Some(previous) = previous {
                let changes = diff::diff(&previous, &new_state);
                if !changes.is_empty() {
                    let reporter = ctx.reporter.clone();
                    tokio::spawn(async move {
                        reporter.run_sync_notices(&changes).await;
                    });
                }
            }

            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "synced": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                })),
            )
        }
        Err(e) => {
            error!("Sync write failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
        }
    }
}

async fn get_status(State(ctx): State<AppCtx>) -> impl IntoResponse {
    let snapshot = match ctx.state.get().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("Status read over unreadable snapshot: {}", e);
            None
        }
    };

    let Some(snapshot) = snapshot else {
        return Json(json!({ "status": "no-data", "message": "Henüz veri yok." }));
    };

    let today = Local::now().date_naive();
    let analysis = analyzer::analyze(&snapshot, today);

    Json(json!({
        "status": "ok",
        "today": today.to_string(),
        "summary": {
            "overdue": analysis.overdue.len(),
            "dueToday": analysis.due_today.len(),
            "doneToday": analysis.done_today.len(),
            "allClear": analysis.all_clear,
        },
    }))
}

async fn post_report(
    State(ctx): State<AppCtx>,
    Path(slot): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    let slot: ReportSlot = match slot.parse() {
        Ok(slot) => slot,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e })),
            );
        }
    };

    let today = Local::now().date_naive();
    let outcome = ctx.reporter.run_slot(slot, today).await;

    (
        StatusCode::OK,
        Json(json!({ "slot": slot.as_str(), "outcome": outcome.as_str() })),
    )
}
