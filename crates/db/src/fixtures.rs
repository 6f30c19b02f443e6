use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_COMPANY_IDS: &[&str] =
    &["comp-fowler", "comp-acme", "comp-baxter", "comp-grayson", "comp-helios"];

const SEED_PRODUCT_COUNT: i64 = 16;
const SEED_INACTIVE_PRODUCT_IDS: &[&str] = &["prod-acme-03"];

/// Anchor rows checked by `verify`. One representative product per company.
const SEED_SPOT_CHECKS: &[SeedSpotCheck] = &[
    SeedSpotCheck {
        product_id: "prod-fowler-01",
        company_id: "comp-fowler",
        product_line: "Cleaner",
    },
    SeedSpotCheck { product_id: "prod-acme-02", company_id: "comp-acme", product_line: "Press" },
    SeedSpotCheck {
        product_id: "prod-baxter-01",
        company_id: "comp-baxter",
        product_line: "Steam Cleaner",
    },
    SeedSpotCheck { product_id: "prod-grayson-01", company_id: "comp-grayson", product_line: "Pump" },
    SeedSpotCheck {
        product_id: "prod-helios-02",
        company_id: "comp-helios",
        product_line: "Heat Pump",
    },
];

/// Deterministic demo catalog for local runs and end-to-end tests.
pub struct DemoSeedDataset;

impl DemoSeedDataset {
    /// SQL fixture content for the demo catalog.
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_catalog.sql");

    /// Load the demo catalog, replacing any previous rows.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            companies: SEED_COMPANY_IDS.len(),
            products: SEED_PRODUCT_COUNT as usize,
        })
    }

    /// Verify that seed data exists and matches the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let company_count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM companies")
            .fetch_one(pool)
            .await?;
        checks.push(("company-count", company_count == SEED_COMPANY_IDS.len() as i64));

        let product_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM products").fetch_one(pool).await?;
        checks.push(("product-count", product_count == SEED_PRODUCT_COUNT));

        for company_id in SEED_COMPANY_IDS {
            let exists: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM companies WHERE id = ?1)")
                    .bind(company_id)
                    .fetch_one(pool)
                    .await?;
            checks.push((*company_id, exists == 1));
        }

        for spot in SEED_SPOT_CHECKS {
            let matches: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1 AND company_id = ?2 AND product_line = ?3 AND is_active = 1)",
            )
            .bind(spot.product_id)
            .bind(spot.company_id)
            .bind(spot.product_line)
            .fetch_one(pool)
            .await?;
            checks.push((spot.product_id, matches == 1));
        }

        for product_id in SEED_INACTIVE_PRODUCT_IDS {
            let inactive: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = ?1 AND is_active = 0)",
            )
            .bind(product_id)
            .fetch_one(pool)
            .await?;
            checks.push((*product_id, inactive == 1));
        }

        let all_present = checks.iter().all(|(_, exists)| *exists);
        Ok(VerificationResult { all_present, checks })
    }

    /// Remove the demo catalog from a database.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM companies").execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedSpotCheck {
    product_id: &'static str,
    company_id: &'static str,
    product_line: &'static str,
}

#[derive(Debug)]
pub struct SeedResult {
    pub companies: usize,
    pub products: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
