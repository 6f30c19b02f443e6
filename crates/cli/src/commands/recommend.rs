use std::sync::Arc;
use std::time::Duration;

use crate::commands::CommandResult;
use salesrec_core::config::{AppConfig, LoadOptions};
use salesrec_core::{CandidateSelector, RecommendationRequest};
use salesrec_db::{connect_with_settings, migrations, CatalogStore};
use salesrec_engine::{AiRanker, ChatCompletionsClient, RecommendationEngine};

pub fn run(company: &str, query: &str, count: Option<usize>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let request = match RecommendationRequest::new(company, query, count) {
        Ok(request) => request,
        Err(error) => {
            return CommandResult::failure("recommend", "invalid_request", error.to_string(), 2);
        }
    };

    let engine = match build_engine(&config) {
        Ok(engine) => engine,
        Err(message) => {
            return CommandResult::failure("recommend", "llm_client", message, 3);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let snapshot = CatalogStore::new(pool.clone())
            .snapshot()
            .await
            .map_err(|error| ("catalog_load", error.to_string(), 5u8))?;

        let result = engine.recommend(&snapshot, &request).await;
        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(result)
    });

    match result {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure(
                "recommend",
                "serialization",
                format!("failed to serialize result: {error}"),
                6,
            ),
        },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("recommend", error_class, message, exit_code)
        }
    }
}

fn build_engine(config: &AppConfig) -> Result<RecommendationEngine, String> {
    let selector = CandidateSelector::new(config.recommendation.max_candidates);
    if !config.ai_enabled() {
        return Ok(RecommendationEngine::fallback_only(selector));
    }
    let client = ChatCompletionsClient::from_config(&config.llm)
        .map_err(|error| format!("llm client initialization failed: {error}"))?;
    let ranker = AiRanker::new(Arc::new(client), Duration::from_secs(config.llm.timeout_secs));
    Ok(RecommendationEngine::new(selector, Some(ranker)))
}
