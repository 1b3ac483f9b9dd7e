use axum::{Router, response::IntoResponse, routing::get};
use serde_json::json;
use skp_headers::{AdditionalHeaders, CacheHeadersConfig};
use skp_headers_axum::{AdditionalHeadersLayer, CacheHeadersLayer};
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app_headers = CacheHeadersLayer::from_config(
        CacheHeadersConfig::new()
            .path("/assets/**", "ONE_YEAR")
            .path("/account/**", json!({ "setPrivate": true, "maxAge": 60 }))
            .path("!/assets/**", json!({ "maxAge": "ONE_MINUTE" }))
            .expires(true)
            .last_modified_path("."),
    )?;

    // more specific than the app-wide layer, so it wins on this route
    let login_headers = CacheHeadersLayer::from_config(CacheHeadersConfig::new().path("/login", false))?;

    let extra = AdditionalHeadersLayer::new(AdditionalHeaders::new(vec![
        json!({ "X-Content-Type-Options": "nosniff" }),
    ])?);

    let app = Router::new()
        .route("/", get(handler))
        .route("/assets/{file}", get(handler))
        .route("/account/{page}", get(handler))
        .route("/login", get(handler).layer(login_headers))
        .layer(app_headers)
        .layer(extra);

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    println!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn handler() -> impl IntoResponse {
    "Hello, World!"
}
