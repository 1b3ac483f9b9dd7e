use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use http::{Request, Response};
use skp_headers::{AdditionalHeaders, CacheHeaders};
use tower_service::Service;
use tracing::trace;

/// Service produced by [`CacheHeadersLayer`](crate::CacheHeadersLayer)
///
/// The inner service runs first; the headers for the request path are
/// written on its response. Unless the configuration says `overwrite`,
/// headers the handler or an inner layer already set are kept.
#[derive(Debug, Clone)]
pub struct CacheHeadersMiddleware<S> {
    inner: S,
    headers: Arc<CacheHeaders>,
}

impl<S> CacheHeadersMiddleware<S> {
    pub fn new(inner: S, headers: Arc<CacheHeaders>) -> Self {
        Self { inner, headers }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CacheHeadersMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        // the clone is not ready; keep the instance poll_ready was called on
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let headers = self.headers.clone();
        let path = req.uri().path().to_owned();

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            headers.apply(&path, response.headers_mut()).await;
            trace!(target: "skp_headers", path = %path, "cache headers applied");
            Ok(response)
        })
    }
}

/// Service produced by [`AdditionalHeadersLayer`](crate::AdditionalHeadersLayer)
///
/// Values the handler set itself are left alone.
#[derive(Debug, Clone)]
pub struct AdditionalHeadersMiddleware<S> {
    inner: S,
    headers: Arc<AdditionalHeaders>,
}

impl<S> AdditionalHeadersMiddleware<S> {
    pub fn new(inner: S, headers: Arc<AdditionalHeaders>) -> Self {
        Self { inner, headers }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AdditionalHeadersMiddleware<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let headers = self.headers.clone();

        Box::pin(async move {
            let mut response = inner.call(req).await?;
            if !headers.is_empty() {
                headers.headers().apply(response.headers_mut(), false);
            }
            Ok(response)
        })
    }
}
