//! HTTP surface
//!
//! Five browser routes plus a JSON status route:
//!
//! | route            | effect                                              |
//! |------------------|-----------------------------------------------------|
//! | `/`              | control page reflecting the session flag            |
//! | `/video_feed/`   | MJPEG feed when streaming, static text otherwise    |
//! | `/capture/`      | save one frame to the capture path, redirect home   |
//! | `/start_stream/` | set the flag, open the camera, redirect home        |
//! | `/stop_stream/`  | clear the flag, release the camera, redirect home   |
//! | `/status/`       | `{"streaming": .., "camera_open": ..}`              |

pub mod routes;
pub mod session;
pub mod templates;

use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::camera::CameraManager;
use crate::commands;
use crate::config::CamfeedConfig;
use crate::errors::CameraError;
pub use session::{Session, SessionData, SessionStore, SESSION_COOKIE};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub camera: Arc<CameraManager>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<CamfeedConfig>,
}

impl AppState {
    pub fn new(camera: Arc<CameraManager>, config: CamfeedConfig) -> Self {
        Self {
            camera,
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/video_feed/", get(routes::video_feed))
        .route("/capture/", get(routes::capture))
        .route("/start_stream/", get(routes::start_stream))
        .route("/stop_stream/", get(routes::stop_stream))
        .route("/status/", get(routes::status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_layer,
        ))
        .with_state(state)
}

/// Serve until Ctrl-C, then release the camera.
pub async fn serve(state: AppState) -> Result<(), CameraError> {
    let addr = state.config.socket_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CameraError::InitializationError(format!("Failed to bind {}: {}", addr, e)))?;

    log::info!("Listening on http://{}", addr);
    serve_until(listener, state, ctrl_c()).await
}

/// Serve on `listener` until `signal` resolves. The camera is released as
/// soon as the signal fires, so open live feeds end and graceful shutdown can
/// complete, and once more after the server has stopped.
pub async fn serve_until<F>(listener: TcpListener, state: AppState, signal: F) -> Result<(), CameraError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let camera = state.camera.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(release_on(signal, camera.clone()))
        .await?;

    log::info!("Server stopped");
    commands::stop_stream(camera).await
}

async fn release_on<F>(signal: F, camera: Arc<CameraManager>)
where
    F: Future<Output = ()>,
{
    signal.await;
    log::info!("Shutdown requested, releasing camera");
    if let Err(e) = commands::stop_stream(camera).await {
        log::warn!("Failed to release camera: {}", e);
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
