use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use skp_headers::{CacheHeaders, HeaderSet};

/// The caching headers the middleware will write for this request
///
/// Reads `Arc<CacheHeaders>` from router state. `Last-Modified` is not
/// included since it needs a filesystem lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedHeaders(pub HeaderSet);

impl<State> FromRequestParts<State> for PlannedHeaders
where
    Arc<CacheHeaders>: FromRef<State>,
    State: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &State) -> Result<Self, Self::Rejection> {
        let headers = Arc::<CacheHeaders>::from_ref(state);
        Ok(PlannedHeaders(headers.headers_for(parts.uri.path())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacheHeadersLayer;
    use axum::{Router, body::Body, http::Request, routing::get};
    use skp_headers::CacheHeadersConfig;
    use tower::ServiceExt;

    async fn describe(PlannedHeaders(headers): PlannedHeaders) -> String {
        headers.get("cache-control").unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_handler_sees_planned_headers() {
        let cache = Arc::new(
            CacheHeaders::new(CacheHeadersConfig::new().path("/docs/**", "ONE_DAY")).unwrap(),
        );
        let app = Router::new()
            .route("/docs/{page}", get(describe))
            .layer(CacheHeadersLayer::shared(cache.clone()))
            .with_state(cache);

        let response = app
            .oneshot(Request::builder().uri("/docs/intro").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()["cache-control"], "max-age=86400");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"max-age=86400");
    }
}
