use salesrec_core::CatalogSnapshot;

use crate::repositories::{
    CompanyRepository, ProductRepository, RepositoryError, SqlCompanyRepository,
    SqlProductRepository,
};
use crate::DbPool;

/// Read-side loader for the product catalog.
///
/// Recommendation scoring works on an in-memory snapshot so a single request
/// sees one consistent view of companies and products.
pub struct CatalogStore {
    companies: SqlCompanyRepository,
    products: SqlProductRepository,
}

impl CatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            companies: SqlCompanyRepository::new(pool.clone()),
            products: SqlProductRepository::new(pool),
        }
    }

    /// Load every company and every active product.
    pub async fn snapshot(&self) -> Result<CatalogSnapshot, RepositoryError> {
        let companies = self.companies.list().await?;
        let products = self.products.list_active(None).await?;
        Ok(CatalogSnapshot::new(companies, products))
    }

    /// Company names in listing order, for status and browsing endpoints.
    pub async fn company_names(&self) -> Result<Vec<String>, RepositoryError> {
        let companies = self.companies.list().await?;
        Ok(companies.into_iter().map(|company| company.name).collect())
    }
}
