use tokio::sync::RwLock;

use salesrec_core::domain::company::Company;
use salesrec_core::domain::product::Product;

use super::{CompanyRepository, ProductRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryCompanyRepository {
    companies: RwLock<Vec<Company>>,
}

impl InMemoryCompanyRepository {
    pub async fn save(&self, company: Company) {
        let mut companies = self.companies.write().await;
        companies.push(company);
    }
}

#[async_trait::async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn list(&self) -> Result<Vec<Company>, RepositoryError> {
        let companies = self.companies.read().await;
        let mut listed = companies.clone();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub async fn save(&self, product: Product) {
        let mut products = self.products.write().await;
        products.push(product);
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_active(
        &self,
        company_name: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|product| product.active)
            .filter(|product| match company_name {
                Some(name) => product.company_name.eq_ignore_ascii_case(name),
                None => true,
            })
            .cloned()
            .collect())
    }
}
