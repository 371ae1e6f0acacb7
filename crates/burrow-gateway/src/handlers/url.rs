use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, trace};

/// `POST /shorten`
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload?;

    let code = state.shortener().shorten(&request.url).await?;
    let short_url = state.short_url(&code);
    info!(code = %code, url = %request.url, "shortened url");

    Ok(Json(ShortenResponse {
        url: request.url,
        short_url,
    }))
}

/// `GET /sh/{code}`
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let Some(url) = state.shortener().lookup(&code) else {
        trace!(code = %code, "short code not found");
        return Err(AppError::NotFound);
    };

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
