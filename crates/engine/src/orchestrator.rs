//! Coordinates one recommendation request: deterministic candidate
//! selection, one optional AI ranking attempt, and the fallback that
//! makes the whole pipeline total. `recommend` never fails outward;
//! `ai_used` in the result is how degradation is communicated.

use uuid::Uuid;

use salesrec_core::catalog::CatalogSnapshot;
use salesrec_core::domain::recommendation::{Method, RecommendationRequest, RecommendationResult};
use salesrec_core::selector::CandidateSelector;
use tracing::{info, warn};

use crate::ranker::AiRanker;

pub struct RecommendationEngine {
    selector: CandidateSelector,
    ranker: Option<AiRanker>,
}

impl RecommendationEngine {
    pub fn new(selector: CandidateSelector, ranker: Option<AiRanker>) -> Self {
        Self { selector, ranker }
    }

    /// Engine without a text generator: every request takes the
    /// deterministic path and no outbound calls are made.
    pub fn fallback_only(selector: CandidateSelector) -> Self {
        Self { selector, ranker: None }
    }

    pub fn ai_available(&self) -> bool {
        self.ranker.is_some()
    }

    /// Per-request pipeline: select, then rank-or-fallback. At most one
    /// outbound text-generation call per request; zero when selection
    /// comes back empty or no ranker is configured.
    pub async fn recommend(
        &self,
        snapshot: &CatalogSnapshot,
        request: &RecommendationRequest,
    ) -> RecommendationResult {
        let correlation_id = Uuid::new_v4().to_string();
        let query = request.query_text();

        let candidates = self.selector.select(snapshot, request.company_name(), &query);
        info!(
            event_name = "recommend.candidates_selected",
            correlation_id = %correlation_id,
            company_name = request.company_name(),
            candidate_count = candidates.len(),
            "selected candidates for request"
        );

        if candidates.is_empty() {
            return RecommendationResult::empty(request);
        }

        if let Some(ranker) = &self.ranker {
            match ranker.rank(&candidates, request.company_name(), &query, request.count()).await {
                Ok(ranked) => {
                    info!(
                        event_name = "recommend.ai_ranked",
                        correlation_id = %correlation_id,
                        ranked_count = ranked.len(),
                        "ai ranking accepted"
                    );
                    return RecommendationResult::from_candidates(request, &ranked, Method::Ai);
                }
                Err(error) => {
                    warn!(
                        event_name = "recommend.ai_fallback",
                        correlation_id = %correlation_id,
                        error = %error,
                        "ai ranking failed, using deterministic fallback"
                    );
                }
            }
        }

        RecommendationResult::from_candidates(request, &candidates, Method::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use salesrec_core::domain::company::{Company, CompanyId};
    use salesrec_core::domain::product::{Product, ProductId};
    use salesrec_core::domain::recommendation::Method;

    use crate::llm::TextGenerator;

    struct CountingGenerator {
        calls: Arc<AtomicUsize>,
        response: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.response {
                Ok(text) => Ok(text.to_string()),
                Err(message) => Err(anyhow!(message)),
            }
        }
    }

    fn product(id: &str, company: &str, line: &str) -> Product {
        Product {
            id: ProductId(id.to_string()),
            company_id: CompanyId(format!("company-{}", company.to_lowercase())),
            company_name: company.to_string(),
            name: format!("{company} {line}"),
            product_line: line.to_string(),
            category: None,
            description: None,
            price: None,
            active: true,
        }
    }

    /// Five Fowler cleaners and three cross-company ones.
    fn cleaner_catalog() -> CatalogSnapshot {
        let companies = vec![
            Company { id: CompanyId("c1".into()), name: "Fowler".into(), industry: None },
            Company { id: CompanyId("c2".into()), name: "Acme".into(), industry: None },
            Company { id: CompanyId("c3".into()), name: "Baxter".into(), industry: None },
        ];
        let products = vec![
            product("prod-fowler-01", "Fowler", "Cleaner"),
            product("prod-fowler-02", "Fowler", "Cleaner"),
            product("prod-fowler-03", "Fowler", "Steam Cleaner"),
            product("prod-fowler-04", "Fowler", "Cleaner"),
            product("prod-fowler-05", "Fowler", "Vacuum Cleaner"),
            product("prod-acme-01", "Acme", "Cleaner"),
            product("prod-acme-02", "Acme", "Steam Cleaner"),
            product("prod-baxter-01", "Baxter", "Cleaner"),
        ];
        CatalogSnapshot::new(companies, products)
    }

    fn request(company: &str, query: &str, count: usize) -> RecommendationRequest {
        RecommendationRequest::new(company, query, Some(count)).expect("request should be valid")
    }

    fn engine_with(
        response: Result<&'static str, &'static str>,
    ) -> (RecommendationEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = CountingGenerator { calls: calls.clone(), response };
        let ranker = AiRanker::new(Arc::new(generator), Duration::from_secs(10));
        (RecommendationEngine::new(CandidateSelector::default(), Some(ranker)), calls)
    }

    #[tokio::test]
    async fn no_matches_short_circuits_without_calling_ai() {
        let (engine, calls) = engine_with(Ok("prod-fowler-01"));

        let result = engine.recommend(&cleaner_catalog(), &request("Fowler", "Forklift", 5)).await;

        assert!(result.recommendations.is_empty());
        assert_eq!(result.total_recommendations, 0);
        assert!(!result.ai_used);
        assert_eq!(result.method, Method::Fallback);
        assert_eq!(calls.load(Ordering::SeqCst), 0, "empty selection must not reach the ai");
    }

    #[tokio::test]
    async fn ai_success_marks_method_ai_and_respects_membership() {
        let (engine, calls) =
            engine_with(Ok("prod-acme-01\nprod-invented-99\nprod-fowler-02"));

        let result = engine.recommend(&cleaner_catalog(), &request("Fowler", "Cleaner", 5)).await;

        assert!(result.ai_used);
        assert_eq!(result.method, Method::Ai);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let ids: Vec<&str> = result.recommendations.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["prod-acme-01", "prod-fowler-02"], "invented ids must be dropped");
    }

    #[tokio::test]
    async fn ranker_failure_degrades_to_selector_order() {
        let (engine, calls) = engine_with(Err("service unavailable"));
        let snapshot = cleaner_catalog();
        let request = request("Fowler", "Cleaner", 3);

        let result = engine.recommend(&snapshot, &request).await;

        assert!(!result.ai_used);
        assert_eq!(result.method, Method::Fallback);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one attempt, no retry");

        // The three highest-ranked same-company products, catalog order
        // on equal scores: the exact "Cleaner" lines before the
        // substring matches.
        let ids: Vec<&str> = result.recommendations.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["prod-fowler-01", "prod-fowler-02", "prod-fowler-04"]);
        assert!(ids.iter().all(|id| id.starts_with("prod-fowler")));
    }

    #[tokio::test]
    async fn fallback_equals_selector_output_truncated() {
        let (engine, _) = engine_with(Err("boom"));
        let snapshot = cleaner_catalog();

        let fallback = engine.recommend(&snapshot, &request("Fowler", "Cleaner", 10)).await;
        let selector_ids: Vec<String> = CandidateSelector::default()
            .select(&snapshot, "Fowler", "Cleaner")
            .iter()
            .map(|c| c.product.id.0.clone())
            .collect();
        let fallback_ids: Vec<String> =
            fallback.recommendations.iter().map(|r| r.id.0.clone()).collect();

        assert_eq!(fallback_ids, selector_ids[..fallback_ids.len()].to_vec());
    }

    #[tokio::test]
    async fn result_length_never_exceeds_requested_count() {
        for count in [1, 3, 10] {
            let (engine, _) = engine_with(Ok(
                "prod-fowler-01\nprod-fowler-02\nprod-fowler-04\nprod-acme-01\nprod-baxter-01",
            ));
            let result =
                engine.recommend(&cleaner_catalog(), &request("Fowler", "Cleaner", count)).await;
            assert!(result.recommendations.len() <= count);
            assert_eq!(result.total_recommendations, result.recommendations.len());
        }
    }

    #[tokio::test]
    async fn identical_requests_yield_identical_results() {
        let (engine, _) = engine_with(Ok("prod-baxter-01\nprod-fowler-01"));
        let snapshot = cleaner_catalog();
        let request = request("Fowler", "Cleaner", 5);

        let first = engine.recommend(&snapshot, &request).await;
        let second = engine.recommend(&snapshot, &request).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_company_draws_from_cross_company_only() {
        let engine = RecommendationEngine::fallback_only(CandidateSelector::default());

        let result = engine.recommend(&cleaner_catalog(), &request("Unknown", "Cleaner", 10)).await;

        assert!(!result.recommendations.is_empty());
        assert!(result
            .recommendations
            .iter()
            .all(|r| r.company_name != "Unknown"), "unknown company has no same-company bucket");
        assert_eq!(result.method, Method::Fallback);
    }

    #[tokio::test]
    async fn fallback_only_engine_never_calls_out() {
        let engine = RecommendationEngine::fallback_only(CandidateSelector::default());
        assert!(!engine.ai_available());

        let result = engine.recommend(&cleaner_catalog(), &request("Fowler", "Cleaner", 3)).await;

        assert!(!result.ai_used);
        assert_eq!(result.recommendations.len(), 3);
    }

    #[tokio::test]
    async fn response_echoes_the_request() {
        let engine = RecommendationEngine::fallback_only(CandidateSelector::default());
        let request = request("Fowler", "Cleaner", 3);

        let result = engine.recommend(&cleaner_catalog(), &request).await;

        assert_eq!(result.request.company_name, "Fowler");
        assert_eq!(result.request.product_query.joined(), "Cleaner");
    }
}
