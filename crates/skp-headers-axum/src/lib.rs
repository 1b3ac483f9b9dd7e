//! skp-headers-axum: tower layers for axum routers
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use skp_headers::CacheHeadersConfig;
//! use skp_headers_axum::CacheHeadersLayer;
//!
//! # fn build() -> skp_headers::Result<Router> {
//! let layer = CacheHeadersLayer::from_config(
//!     CacheHeadersConfig::new()
//!         .path("/assets/**", "ONE_YEAR")
//!         .path("/api/**", false),
//! )?;
//! let app = Router::new()
//!     .route("/", get(|| async { "home" }))
//!     .layer(layer);
//! # Ok(app)
//! # }
//! ```

pub mod extractor;
pub mod layer;
pub mod middleware;

pub use extractor::PlannedHeaders;
pub use layer::{AdditionalHeadersLayer, CacheHeadersLayer};
pub use middleware::{AdditionalHeadersMiddleware, CacheHeadersMiddleware};
