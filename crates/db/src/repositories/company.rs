use sqlx::Row;

use salesrec_core::domain::company::{Company, CompanyId};

use super::{CompanyRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCompanyRepository {
    pool: DbPool,
}

impl SqlCompanyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CompanyRepository for SqlCompanyRepository {
    async fn list(&self) -> Result<Vec<Company>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, industry FROM companies ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(Company {
                    id: CompanyId(row.try_get("id")?),
                    name: row.try_get("name")?,
                    industry: row.try_get("industry")?,
                })
            })
            .collect()
    }
}
