use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::category::Category;
use crate::error::{ExtractError, SpinError};
use crate::extractor::{Attendance, Extractor};
use crate::render::{self, RenderOptions, Segment};
use crate::session::{Action, Session};
use crate::wheel;

pub struct AppState {
    extractor: Extractor,
    session: Mutex<Session>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        AppState {
            extractor,
            session: Mutex::new(Session::new()),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, ApiError> {
        self.session
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".to_string()))
    }

    // Swaps in the next session value and returns a copy of it.
    fn apply(&self, action: Action) -> Result<Session, ApiError> {
        let mut session = self.session()?;
        *session = session.apply(action);
        Ok(session.clone())
    }
}

/// Errors surfaced to the browser as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Failed to parse uploaded HTML.")]
    Parse(#[from] ExtractError),
    #[error("No names selected.")]
    EmptyCandidates,
    #[error("A spin is already in progress.")]
    AlreadySpinning,
    #[error("Unknown category '{0}'.")]
    UnknownCategory(String),
    #[error("{0}")]
    Internal(String),
}

impl From<SpinError> for ApiError {
    fn from(e: SpinError) -> Self {
        match e {
            SpinError::EmptyCandidates => ApiError::EmptyCandidates,
            SpinError::AlreadySpinning => ApiError::AlreadySpinning,
            SpinError::InvalidVelocity | SpinError::InvalidOffset => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::EmptyCandidates => StatusCode::BAD_REQUEST,
            ApiError::AlreadySpinning => StatusCode::CONFLICT,
            ApiError::UnknownCategory(_) => StatusCode::NOT_FOUND,
            ApiError::Parse(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct CategoryView {
    key: &'static str,
    label: &'static str,
    count: usize,
    enabled: bool,
}

/// Snapshot of the session as the page consumes it.
#[derive(Serialize)]
struct SessionView {
    groups: Option<Attendance>,
    categories: Vec<CategoryView>,
    chosen: Option<String>,
    offset: f64,
    candidates: Vec<String>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        SessionView {
            groups: session.groups().cloned(),
            categories: session
                .counts()
                .into_iter()
                .map(|(category, count)| CategoryView {
                    key: category.key(),
                    label: category.label(),
                    count,
                    enabled: session.is_enabled(category),
                })
                .collect(),
            chosen: session.chosen().map(str::to_string),
            offset: session.offset(),
            candidates: session.candidate_pool(),
        }
    }
}

#[derive(Serialize)]
struct SpinResponse {
    winner: String,
    start_offset: f64,
    final_offset: f64,
    frames: Vec<f64>,
    session: SessionView,
}

#[derive(Serialize)]
struct GeometryResponse {
    offset: f64,
    segments: Vec<Segment>,
}

#[derive(Deserialize)]
struct WheelImageQuery {
    size: Option<u32>,
    labels: Option<bool>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/upload", post(upload_document))
        .route("/api/session", get(get_session))
        .route("/api/groups/:category/toggle", post(toggle_group))
        .route("/api/spin", post(spin_wheel))
        .route("/api/wheel", get(get_wheel_geometry))
        .route("/api/wheel.png", get(get_wheel_image))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: SocketAddr, extractor: Extractor) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(extractor));
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

// Declared type must be text/html; parameters such as charset are allowed.
fn is_html(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
}

async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Attendance>, ApiError> {
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        file = Some((content_type, bytes));
    }

    let (content_type, bytes) = match file {
        Some((content_type, bytes)) if is_html(content_type.as_deref()) => (content_type, bytes),
        other => {
            tracing::warn!(
                content_type = ?other.and_then(|(ct, _)| ct),
                "upload rejected"
            );
            return Err(ApiError::InvalidInput(
                "Invalid or missing HTML file.".to_string(),
            ));
        }
    };

    let attendance = state.extractor.extract(&bytes).map_err(|e| {
        tracing::error!(error = %e, "upload parse error");
        ApiError::from(e)
    })?;

    tracing::info!(
        bytes = bytes.len(),
        content_type = content_type.as_deref().unwrap_or_default(),
        present = attendance.present.len(),
        excused = attendance.excused.len(),
        absent = attendance.absent.len(),
        "document extracted"
    );

    state.apply(Action::Uploaded(attendance.clone()))?;
    Ok(Json(attendance))
}

async fn get_session(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let session = state.session()?;
    Ok(Json(SessionView::from(&*session)))
}

async fn toggle_group(
    Path(category): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let category =
        Category::from_strng(&category).ok_or(ApiError::UnknownCategory(category))?;
    let session = state.apply(Action::Toggle(category))?;
    Ok(Json(SessionView::from(&session)))
}

async fn spin_wheel(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    // The lock is held for the whole spin so only one runs at a time.
    let mut session = state.session()?;
    let candidates = session.candidate_pool();

    let trace = wheel::run_to_rest(&candidates, session.offset(), &mut rand::thread_rng())
        .inspect_err(|_| tracing::info!("spin requested with no names selected"))?;

    *session = session.apply(Action::Settled {
        name: trace.winner.clone(),
        offset: trace.final_offset(),
    });
    tracing::info!(
        winner = %trace.winner,
        candidates = candidates.len(),
        frames = trace.frames.len(),
        "spin settled"
    );

    Ok(Json(SpinResponse {
        final_offset: trace.final_offset(),
        winner: trace.winner,
        start_offset: trace.start_offset,
        frames: trace.frames,
        session: SessionView::from(&*session),
    }))
}

async fn get_wheel_geometry(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.session()?;
    Ok(Json(GeometryResponse {
        offset: session.offset(),
        segments: render::wheel_geometry(&session.candidate_pool(), 0.0),
    }))
}

async fn get_wheel_image(
    query: Result<Query<WheelImageQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let (candidates, offset) = {
        let session = state.session()?;
        (session.candidate_pool(), session.offset())
    };
    let defaults = RenderOptions::default();
    let options = RenderOptions {
        size: params.size.unwrap_or(defaults.size),
        labels: params.labels.unwrap_or(defaults.labels),
    };

    let png = tokio::task::spawn_blocking(move || render::render_png(&candidates, offset, &options))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| {
            tracing::error!(error = %e, "wheel render failed");
            ApiError::Internal(e.to_string())
        })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_content_type_check() {
        assert!(is_html(Some("text/html")));
        assert!(is_html(Some("TEXT/HTML; charset=utf-8")));
        assert!(!is_html(Some("text/plain")));
        assert!(!is_html(Some("application/xhtml+xml")));
        assert!(!is_html(None));
    }

    #[test]
    fn error_statuses() {
        assert_eq!(ApiError::EmptyCandidates.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Parse(ExtractError::Parse("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(SpinError::AlreadySpinning).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::EmptyCandidates.to_string(), "No names selected.");
    }
}
