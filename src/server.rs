//! Embedded HTTP server for the browser dashboard.
//!
//! The page at `/` builds its grid from `/api/layout`, embeds each static
//! chart from `/api/charts/:id`, and re-fetches `/api/insights` whenever the
//! dropdown changes. The selection lives in the browser; each request carries
//! it, so the server holds no per-client state.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

use crate::chart::{vega, ChartId, UnknownChart};
use crate::dashboard::{Dashboard, Layout};
use crate::data::model::{SentimentFilter, UnknownSentiment};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
pub struct ServerState {
    dashboard: Arc<Dashboard>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownSentiment(#[from] UnknownSentiment),
    #[error(transparent)]
    UnknownChart(#[from] UnknownChart),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::UnknownSentiment(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownChart(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_layout(State(state): State<ServerState>) -> Json<Layout> {
    Json(state.dashboard.layout().clone())
}

async fn get_charts(State(state): State<ServerState>) -> Json<Value> {
    let charts: Map<String, Value> = state
        .dashboard
        .static_charts()
        .map(|spec| (spec.id.to_string(), vega::to_vega_lite(spec)))
        .collect();
    Json(Value::Object(charts))
}

async fn get_chart(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let chart_id: ChartId = id.parse()?;
    let spec = state
        .dashboard
        .chart(chart_id)
        .ok_or_else(|| UnknownChart(id.clone()))?;
    Ok(Json(vega::to_vega_lite(spec)))
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    sentiment: Option<String>,
}

/// The filter-change event: rebuild the insights chart for the selection.
async fn get_insights(
    State(state): State<ServerState>,
    Query(query): Query<InsightsQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = match query.sentiment.as_deref() {
        None => SentimentFilter::All,
        Some(s) => s.parse::<SentimentFilter>()?,
    };
    let spec = state.dashboard.update_insights(&filter);
    Ok(Json(vega::to_vega_lite(&spec)))
}

// ---------------------------------------------------------------------------
// Router and server
// ---------------------------------------------------------------------------

pub fn router(dashboard: Arc<Dashboard>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/layout", get(get_layout))
        .route("/api/charts", get(get_charts))
        .route("/api/charts/:id", get(get_chart))
        .route("/api/insights", get(get_insights))
        .with_state(ServerState { dashboard })
}

/// Serve the dashboard until Ctrl-C.
pub async fn serve(dashboard: Arc<Dashboard>, bind_addr: SocketAddr) -> Result<()> {
    let app = router(dashboard);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    log::info!("Dashboard listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("Server error")?;

    log::info!("Server shut down gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::data::model::{Dataset, Record};

    fn dashboard() -> Arc<Dashboard> {
        let rec = |label: &str, likes: &str| Record {
            sentiment: Some(label.to_string()),
            likes: crate::data::loader::to_numeric(likes),
            retweets: Some(1.0),
            timestamp: crate::data::loader::to_datetime("2024-01-01 12:00:00"),
        };
        Arc::new(Dashboard::build(Dataset::from_records(vec![
            rec("Positive", "5"),
            rec("Negative", "bad"),
            rec("Positive", "3"),
        ])))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = router(dashboard())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn insights_default_to_all() {
        let (status, doc) = get_json("/api/insights").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["title"], "Sentiment Insights (All)");
        assert_eq!(doc["data"]["values"][0], json!({ "label": "Positive", "value": 2 }));
        assert_eq!(doc["data"]["values"][1], json!({ "label": "Negative", "value": 1 }));
    }

    #[tokio::test]
    async fn insights_filter_by_label() {
        let (status, doc) = get_json("/api/insights?sentiment=Negative").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["title"], "Sentiment Insights (Negative)");
        assert_eq!(doc["data"]["values"], json!([{ "label": "Negative", "value": 1 }]));
    }

    #[tokio::test]
    async fn insights_for_absent_label_are_empty() {
        let (status, doc) = get_json("/api/insights?sentiment=Neutral").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["data"]["values"], json!([]));
    }

    #[tokio::test]
    async fn unknown_sentiment_is_rejected() {
        let (status, doc) = get_json("/api/insights?sentiment=Angry").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(doc["error"].as_str().unwrap().contains("Angry"));
    }

    #[tokio::test]
    async fn static_charts_are_served() {
        let (status, doc) = get_json("/api/charts").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(ids.len(), ChartId::STATIC.len());

        let (status, pie) = get_json("/api/charts/sentiment-distribution").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pie["mark"]["type"], "arc");
    }

    #[tokio::test]
    async fn dynamic_and_unknown_charts_are_not_found() {
        let (status, _) = get_json("/api/charts/sentiment-insights").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get_json("/api/charts/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn layout_lists_filter_options() {
        let (status, layout) = get_json("/api/layout").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(layout["title"], "Sentiment Analysis Dashboard");
        assert_eq!(
            layout["rows"][3]["cells"][0]["region"]["options"],
            json!(["Positive", "Negative", "Neutral", "All"])
        );
    }

    #[tokio::test]
    async fn index_page_is_html() {
        let response = router(dashboard())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn index_page_drops_superseded_insights_responses() {
        let response = router(dashboard())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/api/insights?sentiment="));
        assert!(page.contains(".abort()"));
        assert!(page.contains("insightsRequests.get(chartId) !== controller"));
    }
}
