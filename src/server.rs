//! Web server for the quakemap UI.
//!
//! Serves the composed Leaflet map over HTTP with axum. Every request to `/`
//! fetches the configured feed and renders a fresh page; a failed fetch
//! returns a visible error page instead of a blank map.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
};

use crate::client::{FeedClient, FeedSelector};
use crate::map::MapView;
use crate::marker;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub feed: FeedSelector,
    pub access_token: String,
    pub min_magnitude: Option<f64>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    config: ServerConfig,
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(map_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(AppState { config });

    tracing::info!("quakemap UI starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Map page handler: fetch, compose, render.
async fn map_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.clone();

    // The feed client is blocking; keep it off the async worker threads.
    let result = tokio::task::spawn_blocking(move || {
        let client = FeedClient::new()?;
        client.fetch_feed(config.feed)
    })
    .await;

    let feed = match result {
        Ok(Ok(feed)) => feed,
        Ok(Err(e)) => {
            tracing::warn!("feed fetch failed: {}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Html(error_page(&format!("Feed fetch failed: {e}"))),
            );
        }
        Err(e) => {
            tracing::error!("fetch task failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(error_page("Internal error while fetching the feed")),
            );
        }
    };

    let mut features = feed.features;
    if let Some(min) = state.config.min_magnitude {
        features.retain(|f| f.properties.mag.is_some_and(|m| m >= min));
    }

    let markers = marker::overlay(&features);
    let view = MapView::compose(markers, &state.config.access_token, &feed.metadata.title);

    tracing::debug!(
        "rendered {} markers from {}",
        view.marker_count(),
        feed.metadata.url
    );

    (StatusCode::OK, Html(view.render_html()))
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

/// Minimal fallback page shown when the feed cannot be fetched.
fn error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>quakemap — error</title></head>
<body style="font-family: sans-serif; padding: 2rem;">
    <h1>Map unavailable</h1>
    <p>{message}</p>
    <p>Reload the page to try again.</p>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_page_contains_message() {
        let page = error_page("Feed fetch failed: timeout");
        assert!(page.contains("Map unavailable"));
        assert!(page.contains("Feed fetch failed: timeout"));
    }
}
