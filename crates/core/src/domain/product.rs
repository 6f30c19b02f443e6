use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::company::CompanyId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// One catalog entry. Read-only from the recommendation core's
/// perspective; `company_name` is denormalized onto the product so a
/// catalog snapshot can be matched without a join per request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub company_id: CompanyId,
    pub company_name: String,
    pub name: String,
    pub product_line: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub active: bool,
}

impl Product {
    pub fn belongs_to(&self, company_name: &str) -> bool {
        self.company_name.trim().eq_ignore_ascii_case(company_name.trim())
    }
}
