//! Candidate selection: the deterministic, AI-free half of the
//! recommendation pipeline.
//!
//! The catalog is partitioned into two buckets, products owned by the
//! target company and everything else, and each bucket is ordered by
//! match strength against the query with a stable tie-break on catalog
//! order. Same-company candidates always precede cross-company ones.

pub mod scoring;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSnapshot;
use crate::domain::product::Product;

/// Default cap on the combined candidate list.
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Whether a candidate's owning company matches the requester's target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    SameCompany,
    CrossCompany,
}

/// A product under consideration for one request, tagged with its
/// relevance bucket, match score, and final position (1-based).
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub product: Product,
    pub relevance: Relevance,
    pub score: f64,
    pub rank: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct CandidateSelector {
    max_candidates: usize,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self { max_candidates: DEFAULT_MAX_CANDIDATES }
    }
}

impl CandidateSelector {
    /// `max_candidates` is clamped to at least 1.
    pub fn new(max_candidates: usize) -> Self {
        Self { max_candidates: max_candidates.max(1) }
    }

    /// Select and order candidates for `query` from the snapshot.
    ///
    /// An empty or unknown `target_company` means "no company
    /// preference": the same-company bucket stays empty and everything
    /// competes in the cross-company bucket. No matches is a valid
    /// empty result, never an error. Pure over the snapshot.
    pub fn select(
        &self,
        snapshot: &CatalogSnapshot,
        target_company: &str,
        query: &str,
    ) -> Vec<Candidate> {
        let target = snapshot.find_company(target_company).map(|company| company.name.as_str());

        let mut same_company: Vec<(f64, usize, &Product)> = Vec::new();
        let mut cross_company: Vec<(f64, usize, &Product)> = Vec::new();

        for (index, product) in snapshot.products().iter().enumerate() {
            if !product.active {
                continue;
            }
            let score = match scoring::best_field_score(
                query,
                [
                    Some(product.product_line.as_str()),
                    product.category.as_deref(),
                    Some(product.name.as_str()),
                ],
            ) {
                Some(score) => score,
                None => continue,
            };

            let bucket = match target {
                Some(target) if product.belongs_to(target) => &mut same_company,
                _ => &mut cross_company,
            };
            bucket.push((score, index, product));
        }

        sort_bucket(&mut same_company);
        sort_bucket(&mut cross_company);

        same_company
            .into_iter()
            .map(|entry| (Relevance::SameCompany, entry))
            .chain(cross_company.into_iter().map(|entry| (Relevance::CrossCompany, entry)))
            .take(self.max_candidates)
            .enumerate()
            .map(|(position, (relevance, (score, _, product)))| Candidate {
                product: product.clone(),
                relevance,
                score,
                rank: position + 1,
            })
            .collect()
    }
}

/// Score descending, catalog order ascending on ties. Scores come from
/// a fixed set of weights so `partial_cmp` cannot observe a NaN.
fn sort_bucket(bucket: &mut [(f64, usize, &Product)]) {
    bucket.sort_by(|a, b| {
        b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1))
    });
}
