//! Static asset serving

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const SYNAP_CSS: &str = include_str!("../static/synap.css");

/// GET /static/synap.css
pub async fn serve_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        SYNAP_CSS,
    )
        .into_response()
}
