use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;

use crate::generator::{to_routing_doc, to_summary};
use crate::interfaces::{fetch_all, fetch_one, fetch_urls};
use crate::models::{AppState, FeedResult, SubscriptionSource};
use crate::utils::url::url_decode;

/// Body of `POST /api/nodes/single`
#[derive(Deserialize, Debug, Clone)]
pub struct SingleFeedRequest {
    pub url: String,
}

async fn fetch_configured(app_state: &AppState) -> Vec<FeedResult> {
    fetch_all(
        &app_state.fetcher,
        &app_state.config.subscriptions,
        &app_state.fetch_options(),
    )
    .await
}

/// Health check
pub async fn index_handler() -> HttpResponse {
    HttpResponse::Ok().body("NodePin is running!")
}

/// Public dashboard summary of the configured subscriptions
pub async fn public_subscriptions_handler(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    let results = fetch_configured(&app_state).await;
    HttpResponse::Ok().json(to_summary(&results))
}

/// Every usable feed with its nodes
pub async fn nodes_handler(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    let results = fetch_configured(&app_state).await;
    HttpResponse::Ok().json(results)
}

/// Fetch one subscription URL on demand
///
/// An unusable feed is reported in the body, not as an HTTP error.
pub async fn single_node_handler(
    body: web::Json<SingleFeedRequest>,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    let source = SubscriptionSource::new("", body.url.as_str());
    debug!("Fetching single subscription {}", source.url);

    match fetch_one(&app_state.fetcher, &source, &app_state.fetch_options()).await {
        Ok(result) => HttpResponse::Ok().json(json!({
            "info": result.info,
            "nodes": result.nodes,
        })),
        Err(e) => {
            warn!("Single subscription {} failed: {}", source.url, e);
            HttpResponse::Ok().json(json!({
                "error": e.to_string(),
                "info": {},
                "nodes": [],
            }))
        }
    }
}

/// Fetch one subscription given as a percent-encoded path segment
///
/// Responds with the feed result, or a zero-usage result carrying `error`
/// when the feed is unusable.
pub async fn feed_by_url_handler(
    path: web::Path<String>,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    let url = url_decode(&path.into_inner());
    let results = fetch_urls(
        &app_state.fetcher,
        std::slice::from_ref(&url),
        &app_state.fetch_options(),
    )
    .await;

    match results.into_iter().next() {
        Some(result) => HttpResponse::Ok().json(result),
        None => {
            warn!("Subscription {} returned no usable feed", url);
            HttpResponse::Ok().json(json!({
                "url": url,
                "info": {"upload": 0, "download": 0, "total": 0, "expire": 0, "nodeCount": 0},
                "nodes": [],
                "error": "Subscription unavailable or has no usable nodes",
            }))
        }
    }
}

/// Merged Clash profile of all configured subscriptions
pub async fn clash_handler(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    let results = fetch_configured(&app_state).await;
    let options = &app_state.config.profile;
    let doc = to_routing_doc(&results, options, Utc::now().timestamp());

    let mut resp = HttpResponse::Ok();
    for (name, value) in doc.headers(options) {
        resp.insert_header((name, value));
    }
    resp.body(doc.render())
}

/// Register web handlers
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_handler))
        .route(
            "/api/public/subscriptions",
            web::get().to(public_subscriptions_handler),
        )
        .route("/api/nodes", web::get().to(nodes_handler))
        .route("/api/nodes/single", web::post().to(single_node_handler))
        .route("/api/nodes/{url:.+}", web::get().to(feed_by_url_handler))
        .route("/clash", web::get().to(clash_handler));
}
