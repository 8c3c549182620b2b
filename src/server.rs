//! HTTP surface: the metrics endpoint and a static index page

use crate::collector::ImapCollector;
use crate::config::ExporterConfig;
use crate::error::Result;
use crate::metrics::{self, Labels};
use axum::Router;
use axum::extract::State;
use axum::http::{Uri, header};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

const INDEX_PAGE: &str = "<html><head><title>IMAP mailbox exporter</title></head>\
<body><h1>IMAP mailbox exporter</h1></body></html>";

struct ExporterState {
    collector: ImapCollector,
    labels: Labels,
    metrics_endpoint: String,
}

/// Build the exporter's router.
///
/// The metrics endpoint scrapes the mailbox on every request. Every
/// other path serves the index page. Any method is accepted.
///
/// The endpoint is compared literally against the request path, so
/// characters that are route syntax to axum (`{`, `:`, `*`) carry no
/// special meaning.
pub fn router(config: &ExporterConfig, collector: ImapCollector) -> Router {
    let state = Arc::new(ExporterState {
        labels: Labels {
            mailbox: collector.config().mailbox.clone(),
            username: collector.config().username.clone(),
        },
        collector,
        metrics_endpoint: config.metrics_endpoint.clone(),
    });

    Router::new()
        .fallback(dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured listen address and serve until the listener fails.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn serve(config: ExporterConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Exporter listening on {}", config.listen_address);

    let collector = ImapCollector::new(config.imap.clone());
    axum::serve(listener, router(&config, collector)).await?;
    Ok(())
}

async fn dispatch(State(state): State<Arc<ExporterState>>, uri: Uri) -> Response {
    if uri.path() == state.metrics_endpoint {
        scrape(&state).await.into_response()
    } else {
        Html(INDEX_PAGE).into_response()
    }
}

async fn scrape(state: &ExporterState) -> impl IntoResponse {
    let result = state.collector.collect().await;
    (
        [(header::CONTENT_TYPE, metrics::CONTENT_TYPE)],
        metrics::render(result, &state.labels),
    )
}
