use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use salesrec_core::config::{AppConfig, ConfigError, LoadOptions};
use salesrec_core::CandidateSelector;
use salesrec_db::{connect_with_settings, migrations, CatalogStore, DbPool};
use salesrec_engine::{AiRanker, ChatCompletionsClient, RecommendationEngine};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub catalog: Arc<CatalogStore>,
    pub engine: Arc<RecommendationEngine>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("llm client initialization failed: {0}")]
    LlmClient(String),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let engine = build_engine(&config)?;
    let catalog = Arc::new(CatalogStore::new(db_pool.clone()));

    Ok(Application { config, db_pool, catalog, engine: Arc::new(engine) })
}

/// Build the recommendation engine from config. A missing API key is not an
/// error: the engine runs with deterministic ordering only.
pub fn build_engine(config: &AppConfig) -> Result<RecommendationEngine, BootstrapError> {
    let selector = CandidateSelector::new(config.recommendation.max_candidates);

    if !config.ai_enabled() {
        warn!(
            event_name = "system.bootstrap.ai_disabled",
            correlation_id = "bootstrap",
            provider = %config.llm.provider.as_str(),
            "no llm api key configured, serving fallback recommendations only"
        );
        return Ok(RecommendationEngine::fallback_only(selector));
    }

    let client = ChatCompletionsClient::from_config(&config.llm)
        .map_err(|error| BootstrapError::LlmClient(error.to_string()))?;
    let ranker = AiRanker::new(Arc::new(client), Duration::from_secs(config.llm.timeout_secs));
    info!(
        event_name = "system.bootstrap.ai_enabled",
        correlation_id = "bootstrap",
        provider = %config.llm.provider.as_str(),
        model = %config.llm.model,
        "llm ranking enabled"
    );
    Ok(RecommendationEngine::new(selector, Some(ranker)))
}
