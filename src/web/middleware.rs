use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Request logging middleware
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let start_time = Instant::now();
    let response = next.run(req).await;
    let duration = start_time.elapsed();

    tracing::info!(
        "{} {} - {} - {:.3}ms",
        method,
        uri,
        response.status(),
        duration.as_secs_f64() * 1000.0
    );

    response
}
