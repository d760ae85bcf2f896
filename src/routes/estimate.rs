use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;

use crate::core::convert::to_display;
use crate::core::estimator::{EstimateError, Estimator};
use crate::models::{
    CitiesQuery, CurrenciesResponse, ErrorResponse, EstimateRequest, EstimateResponse,
    HealthResponse, NameListResponse, SourceEntry, StatesQuery,
};
use crate::services::{CacheKey, FxClient, FxError, GeoClient, GeoError, LlmClient, SearchClient, TtlCache};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchClient>,
    pub llm: Arc<LlmClient>,
    pub geo: Arc<GeoClient>,
    pub fx: Arc<FxClient>,
    pub geo_cache: Arc<TtlCache>,
    pub fx_cache: Arc<TtlCache>,
    pub estimator: Estimator,
}

/// Configure all estimation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/estimate", web::post().to(estimate))
        .route("/geo/countries", web::get().to(list_countries))
        .route("/geo/states", web::get().to(list_states))
        .route("/geo/cities", web::get().to(list_cities))
        .route("/fx/currencies", web::get().to(list_currencies));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Estimate a compensation range
///
/// POST /api/v1/estimate
///
/// Request body:
/// ```json
/// {
///   "jobTitle": "string",
///   "experienceHint": "string",
///   "jobDescription": "string",
///   "country": "string",
///   "state": "string",
///   "city": "string",
///   "rateType": "salary|hourly",
///   "currency": "EUR"
/// }
/// ```
async fn estimate(
    state: web::Data<AppState>,
    req: web::Json<EstimateRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for estimate request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let query = req.into_inner().into_job_query();

    tracing::info!(
        "Estimating: title={}, location={}, rate_type={}",
        query.job_title,
        query.location_label(),
        query.pay_type.as_rate_type()
    );

    let result = match state
        .estimator
        .estimate(&query, &state.search, &state.llm)
        .await
    {
        Ok(result) => result,
        Err(e) => return estimate_error_response(e),
    };

    // Conversion happens at the boundary; internals are USD throughout.
    // USD output never needs the FX table. For any other currency a
    // failed fetch is an upstream outage, not a reason to relabel the
    // numbers, so it surfaces as a 502. A table that simply lacks the
    // requested code still falls back to USD labeling.
    let rates = if query.display_currency == "USD" {
        HashMap::from([("USD".to_string(), 1.0)])
    } else {
        match cached_fx_table(&state).await {
            Ok(rates) => rates,
            Err(e) => {
                tracing::error!("FX table unavailable for {} display: {}", query.display_currency, e);
                return HttpResponse::BadGateway().json(ErrorResponse::new(
                    "Upstream service failure",
                    "The exchange-rate provider is unavailable; retry or request USD".to_string(),
                    502,
                ));
            }
        }
    };
    let currency = if rates.contains_key(&query.display_currency) {
        query.display_currency.clone()
    } else {
        "USD".to_string()
    };

    let response = EstimateResponse {
        min: to_display(result.min_usd, &currency, &rates).round() as i64,
        max: to_display(result.max_usd, &currency, &rates).round() as i64,
        currency,
        rate_type: result.pay_type.as_rate_type().to_string(),
        sources: result
            .sources
            .into_iter()
            .map(|s| SourceEntry {
                title: s.title,
                url: s.url,
                range_tag: s.range_tag,
                strength: s.strength,
                geo_tag: s.geo_tag,
            })
            .collect(),
    };

    tracing::info!(
        "Returning estimate {}..{} {} with {} sources",
        response.min,
        response.max,
        response.currency,
        response.sources.len()
    );

    HttpResponse::Ok().json(response)
}

/// Map pipeline failures onto user-explainable HTTP responses.
fn estimate_error_response(err: EstimateError) -> HttpResponse {
    match err {
        EstimateError::Config(_) => {
            tracing::error!("Estimation aborted: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Service misconfigured",
                err.to_string(),
                500,
            ))
        }
        EstimateError::NoCandidates => HttpResponse::NotFound().json(ErrorResponse::new(
            "Insufficient data",
            "No usable salary sources were found; try a broader title or location".to_string(),
            404,
        )),
        EstimateError::Parse(_) => HttpResponse::UnprocessableEntity().json(ErrorResponse::new(
            "Extraction failed",
            err.to_string(),
            422,
        )),
        EstimateError::Validation { ref candidates, .. } => {
            let shown = candidates.clone();
            HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Extraction failed".to_string(),
                message: err.to_string(),
                status_code: 422,
                candidates: shown,
            })
        }
        EstimateError::Upstream(_) => HttpResponse::BadGateway().json(ErrorResponse::new(
            "Upstream service failure",
            err.to_string(),
            502,
        )),
    }
}

/// List all countries
///
/// GET /api/v1/geo/countries
async fn list_countries(state: web::Data<AppState>) -> impl Responder {
    let key = CacheKey::countries();
    if let Ok(names) = state.geo_cache.get::<Vec<String>>(&key).await {
        return name_list(names);
    }

    match state.geo.countries().await {
        Ok(names) => {
            cache_names(&state.geo_cache, &key, &names).await;
            name_list(names)
        }
        Err(e) => geo_error_response(e),
    }
}

/// List states for a country
///
/// GET /api/v1/geo/states?country={country}
async fn list_states(
    state: web::Data<AppState>,
    query: web::Query<StatesQuery>,
) -> impl Responder {
    let key = CacheKey::states(&query.country);
    if let Ok(names) = state.geo_cache.get::<Vec<String>>(&key).await {
        return name_list(names);
    }

    match state.geo.states(&query.country).await {
        Ok(names) => {
            cache_names(&state.geo_cache, &key, &names).await;
            name_list(names)
        }
        Err(e) => geo_error_response(e),
    }
}

/// List cities for a country, optionally scoped to a state
///
/// GET /api/v1/geo/cities?country={country}&state={state}
async fn list_cities(
    state: web::Data<AppState>,
    query: web::Query<CitiesQuery>,
) -> impl Responder {
    let state_filter = query.state.as_deref().unwrap_or("");
    let key = CacheKey::cities(&query.country, state_filter);
    if let Ok(names) = state.geo_cache.get::<Vec<String>>(&key).await {
        return name_list(names);
    }

    match state.geo.cities(&query.country, query.state.as_deref()).await {
        Ok(names) => {
            cache_names(&state.geo_cache, &key, &names).await;
            name_list(names)
        }
        Err(e) => geo_error_response(e),
    }
}

/// List supported display currencies
///
/// GET /api/v1/fx/currencies
async fn list_currencies(state: web::Data<AppState>) -> impl Responder {
    match cached_fx_table(&state).await {
        Ok(rates) => {
            let mut currencies: Vec<String> = rates.into_keys().collect();
            currencies.sort();
            HttpResponse::Ok().json(CurrenciesResponse {
                currencies,
                base: "USD".to_string(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to fetch FX table: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse::new(
                "Upstream service failure",
                e.to_string(),
                502,
            ))
        }
    }
}

fn name_list(names: Vec<String>) -> HttpResponse {
    let count = names.len();
    HttpResponse::Ok().json(NameListResponse { names, count })
}

fn geo_error_response(err: GeoError) -> HttpResponse {
    tracing::error!("Geography lookup failed: {}", err);
    HttpResponse::BadGateway().json(ErrorResponse::new(
        "Upstream service failure",
        err.to_string(),
        502,
    ))
}

async fn cache_names(cache: &TtlCache, key: &str, names: &[String]) {
    if let Err(e) = cache.set(key, &names.to_vec()).await {
        tracing::warn!("Failed to cache {}: {}", key, e);
    }
}

/// Cached daily FX table; fetched at most once per TTL window.
async fn cached_fx_table(state: &AppState) -> Result<HashMap<String, f64>, FxError> {
    let key = CacheKey::fx_table();
    if let Ok(rates) = state.fx_cache.get::<HashMap<String, f64>>(&key).await {
        return Ok(rates);
    }

    let rates = state.fx.usd_table().await?;
    if let Err(e) = state.fx_cache.set(&key, &rates).await {
        tracing::warn!("Failed to cache FX table: {}", e);
    }
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_error_response_candidates_surfaced() {
        let err = EstimateError::Validation {
            reason: "no numeric range".to_string(),
            candidates: vec!["https://glassdoor.com/a".to_string()],
        };
        let response = estimate_error_response(err);
        assert_eq!(response.status(), actix_web::http::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
