//! Media routes: the data-URL catalog and per-file streams.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::error::ApiError;
use super::AppContext;
use crate::media::MediaKind;
use crate::streaming::stream_file;

/// Create media routes.
pub fn media_routes() -> Router<AppContext> {
    Router::new()
        .route("/api/media/all", get(all_media))
        .route("/videos/:filename", get(stream_video))
        .route("/audio/:filename", get(stream_audio))
}

/// Every video and audio file as data URLs, in one payload.
async fn all_media(State(ctx): State<AppContext>) -> Response {
    match ctx.media.all_media().await {
        Ok(media) => Json(json!({
            "success": true,
            "media": media,
            "timestamp": chrono::Utc::now().timestamp_millis(),
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to build media catalog: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn stream_video(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    stream(&ctx, MediaKind::Video, &filename, &headers).await
}

async fn stream_audio(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    stream(&ctx, MediaKind::Audio, &filename, &headers).await
}

async fn stream(
    ctx: &AppContext,
    kind: MediaKind,
    filename: &str,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());

    let response = stream_file(
        ctx.media.root(),
        kind,
        filename,
        range,
        &ctx.stream_settings,
    )
    .await?;

    Ok(response)
}
