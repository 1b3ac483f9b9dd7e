use std::sync::Arc;

use skp_headers::{AdditionalHeaders, CacheHeaders, CacheHeadersConfig, Result};
use tower::Layer;

use crate::middleware::{AdditionalHeadersMiddleware, CacheHeadersMiddleware};

/// Adds caching headers to every response of the wrapped service
#[derive(Debug, Clone)]
pub struct CacheHeadersLayer {
    pub headers: Arc<CacheHeaders>,
}

impl CacheHeadersLayer {
    pub fn new(headers: CacheHeaders) -> Self {
        Self::shared(Arc::new(headers))
    }

    /// Reuse headers that are also held elsewhere, e.g. in router state
    pub fn shared(headers: Arc<CacheHeaders>) -> Self {
        Self { headers }
    }

    /// Compile a configuration; fails on malformed patterns or policies
    pub fn from_config(config: CacheHeadersConfig) -> Result<Self> {
        CacheHeaders::new(config).map(Self::new)
    }
}

impl<S> Layer<S> for CacheHeadersLayer {
    type Service = CacheHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CacheHeadersMiddleware::new(inner, self.headers.clone())
    }
}

/// Adds a fixed list of headers to every response
#[derive(Debug, Clone)]
pub struct AdditionalHeadersLayer {
    pub headers: Arc<AdditionalHeaders>,
}

impl AdditionalHeadersLayer {
    pub fn new(headers: AdditionalHeaders) -> Self {
        Self {
            headers: Arc::new(headers),
        }
    }
}

impl<S> Layer<S> for AdditionalHeadersLayer {
    type Service = AdditionalHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AdditionalHeadersMiddleware::new(inner, self.headers.clone())
    }
}
