//! Prompt contract for AI ranking. The model is told what the caller
//! wants and which candidates exist, and is instructed to answer with
//! candidate IDs only, one per line, most relevant first. The parser in
//! [`crate::ranker`] is the other half of this contract.

use std::fmt::Write;

use salesrec_core::selector::Candidate;

pub fn build_ranking_prompt(
    company_name: &str,
    query: &str,
    count: usize,
    candidates: &[Candidate],
) -> String {
    let mut catalog_lines = String::new();
    for candidate in candidates {
        let _ = writeln!(
            catalog_lines,
            "ID: {}, Company: {}, Product: {}",
            candidate.product.id.0, candidate.product.company_name, candidate.product.product_line
        );
    }

    format!(
        "You are ranking products for a customer request.\n\
         \n\
         Customer Request:\n\
         - Company Name: {company_name}\n\
         - Looking for product: {query}\n\
         - Number of recommendations needed: {count}\n\
         \n\
         Available Products:\n\
         {catalog_lines}\
         \n\
         Recommendation Rules:\n\
         1. PRIORITIZE products from {company_name} when available.\n\
         2. Otherwise recommend the closest matches from other companies.\n\
         3. Only use IDs from the list above.\n\
         4. Return up to {count} product IDs in order of preference, most relevant first.\n\
         \n\
         Respond with ONLY the product IDs, one per line, no additional text:"
    )
}
