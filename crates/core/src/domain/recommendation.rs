use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::errors::DomainError;
use crate::selector::Candidate;

pub const MIN_RESULT_COUNT: usize = 1;
pub const MAX_RESULT_COUNT: usize = 10;
pub const DEFAULT_RESULT_COUNT: usize = 5;

/// The product query as callers may send it: a single free-text string
/// or a list of terms. Matching always operates on the joined text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductQuery {
    Text(String),
    Terms(Vec<String>),
}

impl ProductQuery {
    pub fn joined(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Terms(terms) => terms
                .iter()
                .map(|term| term.trim())
                .filter(|term| !term.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.joined().is_empty()
    }
}

impl From<&str> for ProductQuery {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A validated recommendation request. Construct through [`new`] so an
/// invalid request can never reach the selection pipeline.
///
/// [`new`]: RecommendationRequest::new
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecommendationRequest {
    company_name: String,
    product_query: ProductQuery,
    count: usize,
}

impl RecommendationRequest {
    pub fn new(
        company_name: impl Into<String>,
        product_query: impl Into<ProductQuery>,
        count: Option<usize>,
    ) -> Result<Self, DomainError> {
        let company_name = company_name.into().trim().to_string();
        let product_query = product_query.into();
        let count = count.unwrap_or(DEFAULT_RESULT_COUNT);

        if company_name.is_empty() {
            return Err(DomainError::InvalidRequest {
                field: "company_name",
                message: "company_name must not be empty".to_string(),
            });
        }
        if product_query.is_empty() {
            return Err(DomainError::InvalidRequest {
                field: "product_query",
                message: "product_query must not be empty".to_string(),
            });
        }
        if !(MIN_RESULT_COUNT..=MAX_RESULT_COUNT).contains(&count) {
            return Err(DomainError::InvalidRequest {
                field: "count",
                message: format!(
                    "count must be in range {MIN_RESULT_COUNT}..={MAX_RESULT_COUNT}, got {count}"
                ),
            });
        }

        Ok(Self { company_name, product_query, count })
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn query_text(&self) -> String {
        self.product_query.joined()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn echo(&self) -> RequestEcho {
        RequestEcho {
            company_name: self.company_name.clone(),
            product_query: self.product_query.clone(),
        }
    }
}

/// The original request parameters, echoed back in the response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEcho {
    pub company_name: String,
    pub product_query: ProductQuery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Ai,
    Fallback,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Fallback => "fallback",
        }
    }
}

/// Display fields for one recommended product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub company_name: String,
    pub product_line: String,
    pub name: String,
}

impl From<&Candidate> for RecommendedProduct {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.product.id.clone(),
            company_name: candidate.product.company_name.clone(),
            product_line: candidate.product.product_line.clone(),
            name: candidate.product.name.clone(),
        }
    }
}

/// Final response payload for one recommendation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub request: RequestEcho,
    pub recommendations: Vec<RecommendedProduct>,
    pub total_recommendations: usize,
    pub ai_used: bool,
    pub method: Method,
}

impl RecommendationResult {
    pub fn from_candidates(
        request: &RecommendationRequest,
        candidates: &[Candidate],
        method: Method,
    ) -> Self {
        let recommendations: Vec<RecommendedProduct> =
            candidates.iter().take(request.count()).map(RecommendedProduct::from).collect();
        let total_recommendations = recommendations.len();
        Self {
            request: request.echo(),
            recommendations,
            total_recommendations,
            ai_used: method == Method::Ai,
            method,
        }
    }

    pub fn empty(request: &RecommendationRequest) -> Self {
        Self {
            request: request.echo(),
            recommendations: Vec::new(),
            total_recommendations: 0,
            ai_used: false,
            method: Method::Fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_count_to_five() {
        let request = RecommendationRequest::new("Fowler", "Cleaner", None)
            .expect("request should be valid");
        assert_eq!(request.count(), 5);
        assert_eq!(request.company_name(), "Fowler");
        assert_eq!(request.query_text(), "Cleaner");
    }

    #[test]
    fn request_rejects_empty_company_name() {
        let error = RecommendationRequest::new("   ", "Cleaner", None)
            .expect_err("blank company should be rejected");
        assert!(matches!(error, DomainError::InvalidRequest { field: "company_name", .. }));
    }

    #[test]
    fn request_rejects_empty_query_terms() {
        let error = RecommendationRequest::new(
            "Fowler",
            ProductQuery::Terms(vec![" ".to_string(), String::new()]),
            None,
        )
        .expect_err("blank terms should be rejected");
        assert!(matches!(error, DomainError::InvalidRequest { field: "product_query", .. }));
    }

    #[test]
    fn request_rejects_count_outside_bounds() {
        for count in [0, 11, 100] {
            let error = RecommendationRequest::new("Fowler", "Cleaner", Some(count))
                .expect_err("out-of-range count should be rejected");
            assert!(matches!(error, DomainError::InvalidRequest { field: "count", .. }));
        }
        assert!(RecommendationRequest::new("Fowler", "Cleaner", Some(1)).is_ok());
        assert!(RecommendationRequest::new("Fowler", "Cleaner", Some(10)).is_ok());
    }

    #[test]
    fn query_terms_join_with_spaces() {
        let query = ProductQuery::Terms(vec!["Heat".to_string(), "Pump".to_string()]);
        assert_eq!(query.joined(), "Heat Pump");
    }

    #[test]
    fn product_query_deserializes_from_string_or_list() {
        let from_text: ProductQuery =
            serde_json::from_str("\"Pump\"").expect("string form should deserialize");
        assert_eq!(from_text, ProductQuery::Text("Pump".to_string()));

        let from_list: ProductQuery =
            serde_json::from_str("[\"Pump\", \"Spares\"]").expect("list form should deserialize");
        assert_eq!(from_list.joined(), "Pump Spares");
    }
}
