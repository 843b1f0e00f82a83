use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use super::session::Session;
use super::templates::render_index;
use super::AppState;
use crate::commands;
use crate::errors::CameraError;
use crate::streaming::MJPEG_CONTENT_TYPE;

pub const STREAM_STOPPED_MESSAGE: &str = "Streaming is stopped.";
pub const CAPTURE_FAILED_MESSAGE: &str = "Failed to capture frame";

/// Camera failures that escape a handler become a plain 500.
pub struct AppError(CameraError);

impl From<CameraError> for AppError {
    fn from(e: CameraError) -> Self {
        AppError(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub streaming: bool,
    pub camera_open: bool,
}

fn redirect_to_index() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// GET /
pub async fn index(Extension(session): Extension<Session>) -> Html<String> {
    Html(render_index(session.streaming().await))
}

/// GET /video_feed/
pub async fn video_feed(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    if !session.streaming().await {
        return Ok(STREAM_STOPPED_MESSAGE.into_response());
    }

    let producer =
        commands::open_feed(state.camera.clone(), state.config.storage.jpeg_quality).await?;
    log::info!("Live feed attached for session {}", session.id());

    Ok((
        [
            (header::CONTENT_TYPE, MJPEG_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
        ],
        Body::from_stream(producer.into_stream()),
    )
        .into_response())
}

/// GET /capture/
pub async fn capture(State(state): State<AppState>) -> Response {
    let storage = &state.config.storage;
    match commands::capture_to_disk(
        state.camera.clone(),
        storage.capture_path.clone(),
        storage.jpeg_quality,
    )
    .await
    {
        Ok(_) => redirect_to_index(),
        Err(CameraError::CaptureError(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, CAPTURE_FAILED_MESSAGE).into_response()
        }
        Err(e) => AppError(e).into_response(),
    }
}

/// GET /start_stream/
///
/// The flag is set before the camera opens and stays set if opening fails.
pub async fn start_stream(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    session.set_streaming(true).await;
    commands::start_stream(state.camera.clone()).await?;
    Ok(redirect_to_index())
}

/// GET /stop_stream/
pub async fn stop_stream(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    session.set_streaming(false).await;
    commands::stop_stream(state.camera.clone()).await?;
    Ok(redirect_to_index())
}

/// GET /status/
pub async fn status(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        streaming: session.streaming().await,
        camera_open: state.camera.is_open(),
    })
}
