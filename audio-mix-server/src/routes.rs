use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::future::Future;
use tokio::net::TcpListener;

use audio_mix_core::{MixError, MixRequest, MixResult};

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::upload;

/// Body of every 500. Details go to the log only.
pub const PROCESSING_ERROR: &str = "Error processing audio files";

pub fn router(state: AppState) -> Router {
    let body_limit = match state.cfg.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };
    let isolate = state.cfg.cross_origin_isolation;

    let app = Router::new()
        .route("/api/merge-audio", post(merge_audio))
        .route("/health", get(health))
        .layer(body_limit)
        .with_state(state);

    if isolate {
        app.layer(middleware::map_response(cross_origin_isolation))
    } else {
        app
    }
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_server(cfg: ServerConfig) -> Result<(), String> {
    let addr = cfg.socket_addr()?;
    let state = AppState::with_ffmpeg(cfg);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        log::info!("Shutting down");
    })
    .await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), String>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(|e| e.to_string())?;
    log::info!("audio-mix server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| e.to_string())
}

// ═══════════════════════════════════════════════════════════════
// POST /api/merge-audio
// ═══════════════════════════════════════════════════════════════

async fn merge_audio(State(st): State<AppState>, multipart: Result<Multipart, MultipartRejection>) -> Response {
    let multipart = match multipart {
        Ok(m) => m,
        Err(e) => return invalid_form(e.status(), e.body_text()),
    };
    let request = match upload::read_mix_request(multipart).await {
        Ok(r) => r,
        Err(e) => return invalid_form(e.status(), e.body_text()),
    };

    // rejected before any engine exists
    if let Err(e) = request.ensure_complete() {
        return error_response(&e);
    }

    let _permit = match st.limiter() {
        Some(limiter) => match limiter.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(e) => {
                log::error!("Mix limiter closed: {}", e);
                return json_error(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_ERROR);
            }
        },
        None => None,
    };

    let state = st.clone();
    match tokio::task::spawn_blocking(move || mix_blocking(&state, request)).await {
        Ok(Ok(result)) => mp3_response(result),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            log::error!("Mix task failed: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_ERROR)
        }
    }
}

/// One engine per request; dropping the session removes its scratch directory.
fn mix_blocking(st: &AppState, request: MixRequest) -> Result<MixResult, MixError> {
    let session = st.new_session()?;
    session.load()?;
    session.mix(request)
}

fn mp3_response(result: MixResult) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", result.file_name);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, result.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        result.data,
    )
        .into_response()
}

fn error_response(e: &MixError) -> Response {
    match e {
        MixError::MissingInput { .. } => {
            log::info!("Rejected merge request: {}", e);
            json_error(StatusCode::BAD_REQUEST, e.to_string())
        }
        MixError::UnsupportedMediaType { .. } => {
            log::info!("Rejected merge request: {}", e);
            json_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
        }
        _ => {
            log::error!("Error processing audio: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_ERROR)
        }
    }
}

fn invalid_form(status: StatusCode, detail: String) -> Response {
    log::info!("Rejected merge request: {}", detail);
    json_error(status, format!("Invalid multipart form data: {detail}"))
}

fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

// ═══════════════════════════════════════════════════════════════
// GET /health
// ═══════════════════════════════════════════════════════════════

async fn health(State(st): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "ok": true,
        "engine": st.engine.name,
        "ffmpeg_version": st.engine.version,
    });
    (StatusCode::OK, Json(body))
}

async fn cross_origin_isolation(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert("cross-origin-opener-policy", HeaderValue::from_static("same-origin"));
    headers.insert("cross-origin-embedder-policy", HeaderValue::from_static("require-corp"));
    response
}
