//! Stateless image proxy.
//!
//! Media CDN URLs reject cross-origin browser fetches, so the dashboard asks
//! the server to fetch them. Pure pass-through: body bytes and content type
//! are replayed as-is with a permissive CORS header.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProxyQuery {
    pub url: Option<String>,
}

pub(super) async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(url) = query.url else {
        return Err(ApiError::new("bad_request", "missing url parameter"));
    };

    let response = state.proxy_client.get(&url).send().await.map_err(|e| {
        tracing::warn!(url = %url, error = %e, "image proxy fetch failed");
        ApiError::new("bad_gateway", "upstream fetch failed")
    })?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_owned();

    let body = response.bytes().await.map_err(|e| {
        tracing::warn!(url = %url, error = %e, "image proxy body read failed");
        ApiError::new("bad_gateway", "upstream body read failed")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("image/jpeg")),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );

    Ok((StatusCode::OK, headers, body))
}
