//! HTTP server: routes, handlers, and the serve loop.
//!
//! | Method | Path                   | Handler               |
//! |--------|------------------------|-----------------------|
//! | GET    | `/`                    | kiosk display page    |
//! | GET    | `/manage`              | management page       |
//! | POST   | `/manage`              | form action, 303 back |
//! | GET    | `/last-updated`        | config mtime (text)   |
//! | GET    | `/network-status`      | `{"online": bool}`    |
//! | GET    | `/api/config`          | document as JSON      |
//! | GET    | `/api/config/changes`  | 200 + doc, or 204     |
//! | POST   | `/system/stop-session` | stop kiosk session    |
//! | POST   | `/system/reboot`       | reboot host           |
//! | GET    | `/healthz`             | liveness              |
//!
//! `/` and `/api/config/changes` share the store's single change stamp.  A
//! change observed by one of them is not reported again to the other, so a
//! display page load can consume a change before a `/api/config/changes`
//! client sees it.
//!
//! `ConfigStore` uses blocking `std::fs`; every handler reaches it through
//! [`with_store`], which runs the call on Tokio's blocking pool.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use kiosk_core::{ConfigStore, PollOutcome, ReachabilityProbe};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::application::manage::{self, ManageAction, ManageForm};
use crate::application::system::{self, SystemAction, SystemController};
use crate::application::ActionError;
use crate::domain::DashboardConfig;
use crate::infrastructure::system_control::CommandSystemController;
use crate::infrastructure::views;

// ── Shared state ──────────────────────────────────────────────────────────────

/// State shared by every handler.
///
/// Cloned per request by axum; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub probe: ReachabilityProbe,
    pub system: Arc<dyn SystemController>,
}

impl AppState {
    /// Production wiring: file store, `ping` probe, `systemctl`/`reboot`.
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            store: Arc::new(ConfigStore::new(config.config_file.clone())),
            probe: ReachabilityProbe::with_ping(config.probe_targets, config.probe_timeout),
            system: Arc::new(CommandSystemController::new(
                config.session_service.clone(),
                config.use_sudo,
            )),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Builds the router with all dashboard routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(display))
        .route("/manage", get(manage_page).post(manage_submit))
        .route("/last-updated", get(last_updated))
        .route("/network-status", get(network_status))
        .route("/api/config", get(api_config))
        .route("/api/config/changes", get(api_config_changes))
        .route("/system/stop-session", post(stop_session))
        .route("/system/reboot", post(reboot))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the dashboard until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound (port in use, missing
/// permission) or the server fails while running.
pub async fn run_server(
    config: DashboardConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {}", config.bind_addr))?;

    info!(
        "kiosk dashboard listening on http://{} (config: {})",
        config.bind_addr,
        config.config_file.display()
    );

    let app = build_router(AppState::from_config(&config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server terminated with an error")?;

    Ok(())
}

// ── Error mapping ─────────────────────────────────────────────────────────────

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        match self {
            ActionError::Locked => {
                (StatusCode::LOCKED, "the dashboard is locked").into_response()
            }
            ActionError::Store(e) => {
                error!("config store error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("configuration error: {e}"))
                    .into_response()
            }
            ActionError::System(e) => {
                error!("system action failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("system action failed: {e}"))
                    .into_response()
            }
            ActionError::Worker(e) => {
                error!("config store worker failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
            }
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Runs `f` against the store on the blocking pool.
async fn with_store<T, F>(state: &AppState, f: F) -> Result<T, ActionError>
where
    F: FnOnce(&ConfigStore) -> T + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    Ok(tokio::task::spawn_blocking(move || f(&store)).await?)
}

async fn display(State(state): State<AppState>) -> Result<Html<String>, ActionError> {
    let doc = with_store(&state, |store| store.current()).await??;
    Ok(Html(views::display_page(&doc).into_string()))
}

async fn manage_page(State(state): State<AppState>) -> Result<Response, ActionError> {
    let doc = with_store(&state, |store| store.load()).await??;
    if doc.is_locked() {
        return Ok((StatusCode::LOCKED, Html(views::locked_page().into_string())).into_response());
    }
    Ok(Html(views::manage_page(&doc).into_string()).into_response())
}

async fn manage_submit(
    State(state): State<AppState>,
    Form(form): Form<ManageForm>,
) -> Result<Redirect, ActionError> {
    let action = ManageAction::from(form);
    let submitted = action.clone();
    let result = with_store(&state, move |store| manage::submit(store, &submitted)).await?;
    if let Err(e) = result {
        if matches!(e, ActionError::Locked) {
            warn!("rejected {action:?}: dashboard is locked");
        }
        return Err(e);
    }
    Ok(Redirect::to("/manage"))
}

async fn last_updated(State(state): State<AppState>) -> String {
    with_store(&state, |store| store.last_modified_secs())
        .await
        .unwrap_or(0.0)
        .to_string()
}

/// Body of `/network-status`.
#[derive(Debug, Serialize)]
pub struct NetworkStatus {
    pub online: bool,
}

async fn network_status(State(state): State<AppState>) -> Json<NetworkStatus> {
    Json(NetworkStatus {
        online: state.probe.is_online().await,
    })
}

async fn api_config(
    State(state): State<AppState>,
) -> Result<Json<kiosk_core::KioskDocument>, ActionError> {
    Ok(Json(with_store(&state, |store| store.load()).await??))
}

async fn api_config_changes(State(state): State<AppState>) -> Result<Response, ActionError> {
    let outcome = with_store(&state, |store| store.poll_if_changed()).await?;
    Ok(match outcome {
        PollOutcome::Changed(doc) => Json(doc).into_response(),
        PollOutcome::Unchanged => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Body of a successful `/system/*` request.
#[derive(Debug, Serialize)]
pub struct SystemAccepted {
    pub ok: bool,
    pub action: SystemAction,
}

async fn run_system_action(
    state: &AppState,
    action: SystemAction,
) -> Result<(StatusCode, Json<SystemAccepted>), ActionError> {
    system::perform(&state.store, state.system.as_ref(), action).await?;
    Ok((StatusCode::ACCEPTED, Json(SystemAccepted { ok: true, action })))
}

async fn stop_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SystemAccepted>), ActionError> {
    run_system_action(&state, SystemAction::StopSession).await
}

async fn reboot(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SystemAccepted>), ActionError> {
    run_system_action(&state, SystemAction::Reboot).await
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
