use serde_json::json;
use skp_headers::prelude::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // DEBUG shows which pattern answered each path
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let config = CacheHeadersConfig::from_json_str(
        r#"{
            "paths": {
                "/static/**": "ONE_YEAR",
                "/account/**": { "setPrivate": true, "maxAge": "ONE_MINUTE" },
                "/news/*": { "maxAge": 60, "sMaxAge": "ONE_HOUR", "staleRevalidate": 30 },
                "/api/**": false,
                "/legacy": "public, max-age=5"
            },
            "expires": true,
            "lastModified": { "path": "." }
        }"#,
    )?;
    let cache = CacheHeaders::new(config)?;

    for path in ["/static/app.js", "/account/me", "/news/today", "/api/users", "/legacy", "/"] {
        println!("\n{path}");
        for header in cache.headers(path).await.iter() {
            println!("  {}: {}", header.name, header.value_str());
        }
    }

    let extra = AdditionalHeaders::new(vec![
        json!({ "X-Content-Type-Options": "nosniff" }),
        json!({ "name": "Vary", "value": "Accept-Encoding" }),
    ])?;
    println!("\nadditional");
    for header in extra.headers().iter() {
        println!("  {}: {}", header.name, header.value_str());
    }

    Ok(())
}
