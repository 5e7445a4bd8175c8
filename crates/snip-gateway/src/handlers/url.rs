use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, info};

/// `POST /api/shorten`
///
/// Body: `{"url": "https://..."}`. Shortening the same URL again returns the
/// same short URL.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "invalid request body");
        AppError::BadRequest("Invalid request body".to_string())
    })?;

    if request.url.is_empty() {
        debug!("empty url in request");
        return Err(AppError::BadRequest("URL is required".to_string()));
    }

    let shortened = state.shortener().shorten(&request.url).await?;
    info!(
        code = %shortened.code,
        short_url = %shortened.short_url,
        long_url = %request.url,
        "shortened url"
    );

    Ok(Json(ShortenResponse {
        short_url: shortened.short_url,
        code: shortened.code.to_string(),
        long_url: request.url,
    }))
}

/// `GET /{short_code}`: 302 to the long URL.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let long_url = state.shortener().resolve(&short_code).await?;
    let location = HeaderValue::try_from(long_url.as_str()).map_err(|e| {
        AppError::Internal(format!(
            "stored url for {} is not a valid Location header: {}",
            short_code, e
        ))
    })?;
    debug!(code = %short_code, long_url = %long_url, "redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
