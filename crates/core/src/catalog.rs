use crate::domain::company::Company;
use crate::domain::product::Product;

/// Read-only view of the catalog taken at the start of one
/// recommendation request. Selection and ranking operate on this
/// snapshot only; concurrent catalog writes are the store's concern.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    companies: Vec<Company>,
    products: Vec<Product>,
}

impl CatalogSnapshot {
    pub fn new(companies: Vec<Company>, products: Vec<Product>) -> Self {
        Self { companies, products }
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Products in catalog order. Selector tie-breaks rely on this
    /// order being stable for the lifetime of the snapshot.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find_company(&self, name: &str) -> Option<&Company> {
        self.companies.iter().find(|company| company.matches_name(name))
    }

    pub fn has_company(&self, name: &str) -> bool {
        self.find_company(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
