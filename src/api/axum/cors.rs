//! CORS configuration for Axum using tower-http.

use axum::http::{HeaderName, Method, header};
use tower_http::cors::CorsLayer;

use super::context::API_TOKEN_HEADER;

/// Allows any origin without credentials. Development only: the session
/// cookie is not sent cross-origin under this layer.
pub fn permissive() -> CorsLayer {
    CorsLayer::permissive()
}

/// CORS for a dashboard served from other origins.
///
/// Credentials are allowed so the `user` cookie travels, which is why the
/// origins must be listed explicitly. The `Token` header is allowed for
/// upload clients.
pub fn dashboard(allowed_origins: &[&str]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(API_TOKEN_HEADER),
        ])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_dashboard_allows_credentials_for_listed_origin() {
        let app = Router::new()
            .route("/user", get(|| async { "ok" }))
            .layer(dashboard(&["https://dash.example.com", "not a url\n"]));

        let request = Request::builder()
            .uri("/user")
            .header(header::ORIGIN, "https://dash.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://dash.example.com"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
