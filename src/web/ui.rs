use axum::response::{Html, IntoResponse};

/// Single-page UI handler
pub async fn index_handler() -> impl IntoResponse {
    Html(include_str!("../../templates/index.html"))
}
