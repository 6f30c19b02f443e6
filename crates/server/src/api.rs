//! JSON API for catalog browsing and product recommendations.
//!
//! Endpoints:
//! - `GET  /`            — service status and catalog summary
//! - `GET  /companies`   — list all company names
//! - `GET  /recommend`   — recommend via query parameters
//! - `POST /recommend`   — recommend via JSON body

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use salesrec_core::{
    ApplicationError, InterfaceError, ProductQuery, RecommendationRequest, RecommendationResult,
};
use salesrec_db::CatalogStore;
use salesrec_engine::RecommendationEngine;

/// Companies shown inline on the status endpoint.
const STATUS_COMPANY_PREVIEW: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub engine: Arc<RecommendationEngine>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub database: &'static str,
    pub ai_enabled: bool,
    pub total_companies: usize,
    pub companies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub companies: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub company_name: String,
    pub product_query: String,
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendBody {
    pub company_name: String,
    pub product_query: ProductQuery,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, correlation_id) = match &self.0 {
            InterfaceError::BadRequest { correlation_id, .. } => {
                (StatusCode::BAD_REQUEST, correlation_id.clone())
            }
            InterfaceError::ServiceUnavailable { correlation_id, .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, correlation_id.clone())
            }
            InterfaceError::Internal { correlation_id, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, correlation_id.clone())
            }
        };
        let body = ErrorBody { error: self.0.user_message(), correlation_id };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_status))
        .route("/companies", get(list_companies))
        .route("/recommend", get(recommend_from_params))
        .route("/recommend", post(recommend_from_body))
        .with_state(state)
}

pub async fn service_status(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let names = company_names(&state, &correlation_id).await?;

    Ok(Json(StatusResponse {
        service: "salesrec",
        status: "running",
        database: "SQLite",
        ai_enabled: state.engine.ai_available(),
        total_companies: names.len(),
        companies: names.into_iter().take(STATUS_COMPANY_PREVIEW).collect(),
    }))
}

pub async fn list_companies(
    State(state): State<AppState>,
) -> Result<Json<CompaniesResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();
    let names = company_names(&state, &correlation_id).await?;
    let total = names.len();
    Ok(Json(CompaniesResponse { companies: names, total }))
}

pub async fn recommend_from_params(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<RecommendationResult>, ApiError> {
    recommend(
        &state,
        params.company_name,
        ProductQuery::Text(params.product_query),
        params.count,
    )
    .await
    .map(Json)
}

pub async fn recommend_from_body(
    State(state): State<AppState>,
    Json(body): Json<RecommendBody>,
) -> Result<Json<RecommendationResult>, ApiError> {
    recommend(&state, body.company_name, body.product_query, body.count).await.map(Json)
}

async fn recommend(
    state: &AppState,
    company_name: String,
    product_query: ProductQuery,
    count: Option<usize>,
) -> Result<RecommendationResult, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let request =
        RecommendationRequest::new(company_name, product_query, count).map_err(|error| {
            warn!(
                event_name = "api.recommend.rejected",
                correlation_id = %correlation_id,
                error = %error,
                "recommendation request failed validation"
            );
            ApiError(ApplicationError::from(error).into_interface(&correlation_id))
        })?;

    let snapshot = state.catalog.snapshot().await.map_err(|error| {
        warn!(
            event_name = "api.recommend.catalog_unavailable",
            correlation_id = %correlation_id,
            error = %error,
            "catalog snapshot failed"
        );
        ApiError(
            ApplicationError::Persistence(error.to_string()).into_interface(&correlation_id),
        )
    })?;

    let result = state.engine.recommend(&snapshot, &request).await;
    info!(
        event_name = "api.recommend.completed",
        correlation_id = %correlation_id,
        company_name = %request.company_name(),
        method = result.method.as_str(),
        total = result.total_recommendations,
        "recommendation request completed"
    );
    Ok(result)
}

async fn company_names(state: &AppState, correlation_id: &str) -> Result<Vec<String>, ApiError> {
    state.catalog.company_names().await.map_err(|error| {
        warn!(
            event_name = "api.companies.catalog_unavailable",
            correlation_id = %correlation_id,
            error = %error,
            "company listing failed"
        );
        ApiError(ApplicationError::Persistence(error.to_string()).into_interface(correlation_id))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use axum::Json;

    use salesrec_core::{CandidateSelector, InterfaceError, Method, ProductQuery};
    use salesrec_db::{connect_with_settings, migrations, CatalogStore, DbPool, DemoSeedDataset};
    use salesrec_engine::RecommendationEngine;

    use super::{
        list_companies, recommend_from_body, recommend_from_params, service_status, AppState,
        RecommendBody, RecommendParams,
    };

    async fn seeded_state() -> (AppState, DbPool) {
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 5)
            .await
            .expect("pool should connect");
        migrations::run_pending(&pool).await.expect("migrations should apply");
        DemoSeedDataset::load(&pool).await.expect("demo catalog should load");

        let state = AppState {
            catalog: Arc::new(CatalogStore::new(pool.clone())),
            engine: Arc::new(RecommendationEngine::fallback_only(CandidateSelector::default())),
        };
        (state, pool)
    }

    #[tokio::test]
    async fn status_reports_catalog_summary() {
        let (state, pool) = seeded_state().await;

        let Json(status) = service_status(State(state)).await.expect("status should succeed");

        assert_eq!(status.service, "salesrec");
        assert_eq!(status.database, "SQLite");
        assert!(!status.ai_enabled);
        assert_eq!(status.total_companies, 5);
        assert_eq!(status.companies.len(), 5);

        pool.close().await;
    }

    #[tokio::test]
    async fn companies_lists_all_names_in_order() {
        let (state, pool) = seeded_state().await;

        let Json(response) =
            list_companies(State(state)).await.expect("company listing should succeed");

        assert_eq!(response.total, 5);
        assert_eq!(response.companies.first().map(String::as_str), Some("Acme Industrial"));

        pool.close().await;
    }

    #[tokio::test]
    async fn get_recommend_returns_same_company_products_first() {
        let (state, pool) = seeded_state().await;

        let Json(result) = recommend_from_params(
            State(state),
            Query(RecommendParams {
                company_name: "Fowler".to_string(),
                product_query: "Cleaner".to_string(),
                count: Some(5),
            }),
        )
        .await
        .expect("recommendation should succeed");

        assert_eq!(result.method, Method::Fallback);
        assert!(!result.ai_used);
        assert!(!result.recommendations.is_empty());
        assert_eq!(result.recommendations[0].company_name, "Fowler");
        assert!(result.total_recommendations <= 5);

        pool.close().await;
    }

    #[tokio::test]
    async fn post_recommend_accepts_query_term_lists() {
        let (state, pool) = seeded_state().await;

        let Json(result) = recommend_from_body(
            State(state),
            Json(RecommendBody {
                company_name: "Helios Thermal".to_string(),
                product_query: ProductQuery::Terms(vec![
                    "Heat".to_string(),
                    "Pump".to_string(),
                ]),
                count: None,
            }),
        )
        .await
        .expect("recommendation should succeed");

        assert!(result
            .recommendations
            .iter()
            .any(|product| product.product_line == "Heat Pump"));

        pool.close().await;
    }

    #[tokio::test]
    async fn invalid_count_is_rejected_with_bad_request() {
        let (state, pool) = seeded_state().await;

        let error = recommend_from_params(
            State(state),
            Query(RecommendParams {
                company_name: "Fowler".to_string(),
                product_query: "Cleaner".to_string(),
                count: Some(42),
            }),
        )
        .await
        .expect_err("out-of-range count should be rejected");

        assert!(matches!(error.0, InterfaceError::BadRequest { .. }));

        pool.close().await;
    }

    #[tokio::test]
    async fn closed_database_maps_to_service_unavailable() {
        let (state, pool) = seeded_state().await;
        pool.close().await;

        let error = recommend_from_params(
            State(state),
            Query(RecommendParams {
                company_name: "Fowler".to_string(),
                product_query: "Cleaner".to_string(),
                count: None,
            }),
        )
        .await
        .expect_err("closed pool should surface as unavailable");

        assert!(matches!(error.0, InterfaceError::ServiceUnavailable { .. }));
    }
}
