mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::Estimator;
use crate::routes::estimate::AppState;
use crate::services::{FxClient, GeoClient, LlmClient, SearchClient, TtlCache};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap_or_default())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting rate-scout estimation service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    if settings.search.api_key.as_deref().unwrap_or("").is_empty() {
        error!("SERPAPI_API_KEY is not set; estimate requests will fail until it is");
    }
    if settings.llm.api_key.as_deref().unwrap_or("").is_empty() {
        error!("OPENAI_API_KEY is not set; estimate requests will fail until it is");
    }

    // Initialize upstream clients
    let search = Arc::new(
        SearchClient::new(
            settings.search.base_url,
            settings.search.api_key,
            settings.search.per_query_results,
            settings.search.candidate_cap,
        )
        .unwrap_or_else(|e| {
            error!("Failed to build search client: {}", e);
            panic!("Search client error: {}", e);
        }),
    );

    let llm = Arc::new(
        LlmClient::new(
            settings.llm.base_url,
            settings.llm.api_key,
            settings.llm.model,
            settings.llm.max_output_tokens,
        )
        .unwrap_or_else(|e| {
            error!("Failed to build LLM client: {}", e);
            panic!("LLM client error: {}", e);
        }),
    );

    let geo = Arc::new(GeoClient::new(settings.geography.base_url).unwrap_or_else(|e| {
        error!("Failed to build geography client: {}", e);
        panic!("Geography client error: {}", e);
    }));

    let fx = Arc::new(FxClient::new(settings.fx.base_url).unwrap_or_else(|e| {
        error!("Failed to build FX client: {}", e);
        panic!("FX client error: {}", e);
    }));

    info!("Upstream clients initialized");

    // Name lists are near-static, FX rates refresh daily upstream.
    let geo_cache = Arc::new(TtlCache::new(settings.cache.capacity, settings.cache.geo_ttl_secs));
    let fx_cache = Arc::new(TtlCache::new(16, settings.cache.fx_ttl_secs));

    info!(
        "Caches initialized (geo TTL: {}s, FX TTL: {}s)",
        settings.cache.geo_ttl_secs, settings.cache.fx_ttl_secs
    );

    let estimator = Estimator::new(settings.estimation.policy());

    // Build application state
    let app_state = AppState {
        search,
        llm,
        geo,
        fx,
        geo_cache,
        fx_cache,
        estimator,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
