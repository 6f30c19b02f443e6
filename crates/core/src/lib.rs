pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod selector;

pub use catalog::CatalogSnapshot;
pub use domain::company::{Company, CompanyId};
pub use domain::product::{Product, ProductId};
pub use domain::recommendation::{
    Method, ProductQuery, RecommendationRequest, RecommendationResult, RecommendedProduct,
    RequestEcho,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use selector::{Candidate, CandidateSelector, Relevance};
