use async_trait::async_trait;
use thiserror::Error;

use salesrec_core::domain::company::Company;
use salesrec_core::domain::product::Product;

pub mod company;
pub mod memory;
pub mod product;

pub use company::SqlCompanyRepository;
pub use memory::{InMemoryCompanyRepository, InMemoryProductRepository};
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// All companies, ordered by name.
    async fn list(&self) -> Result<Vec<Company>, RepositoryError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Active products, ordered by company name then product line.
    /// `company_name` narrows to a single company, matched
    /// case-insensitively.
    async fn list_active(
        &self,
        company_name: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError>;
}
