//! AI ranking with a strict trust boundary: the model's free-text
//! output is reduced to candidate IDs by set-membership against the
//! input candidate set. Anything the model invents is discarded.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use salesrec_core::selector::Candidate;

use crate::llm::TextGenerator;
use crate::prompt::build_ranking_prompt;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RankerError {
    /// The external call errored or timed out. Single attempt, no
    /// retry; the orchestrator owns the fallback.
    #[error("text generation unavailable: {0}")]
    Unavailable(String),
    /// The response decoded to zero valid candidate identifiers.
    #[error("unparseable ranking response: {0}")]
    Unparseable(String),
}

pub struct AiRanker {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl AiRanker {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Re-rank `candidates` for the request via one bounded call to the
    /// text generator. On success the returned list contains only
    /// members of the input set, at most `count` of them, re-ranked in
    /// the model's preference order.
    pub async fn rank(
        &self,
        candidates: &[Candidate],
        company_name: &str,
        query: &str,
        count: usize,
    ) -> Result<Vec<Candidate>, RankerError> {
        let prompt = build_ranking_prompt(company_name, query, count, candidates);

        let response =
            match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await {
                Err(_) => {
                    return Err(RankerError::Unavailable(format!(
                        "text generation timed out after {}s",
                        self.timeout.as_secs()
                    )))
                }
                Ok(Err(error)) => return Err(RankerError::Unavailable(error.to_string())),
                Ok(Ok(response)) => response,
            };

        let ordered_ids: Vec<&str> =
            candidates.iter().map(|candidate| candidate.product.id.0.as_str()).collect();
        let ranked_ids = parse_ranked_ids(&response, &ordered_ids);
        if ranked_ids.is_empty() {
            return Err(RankerError::Unparseable(format!(
                "no valid candidate ids in response ({} chars)",
                response.len()
            )));
        }

        let by_id: HashMap<&str, &Candidate> = candidates
            .iter()
            .map(|candidate| (candidate.product.id.0.as_str(), candidate))
            .collect();

        Ok(ranked_ids
            .iter()
            .take(count)
            .enumerate()
            .map(|(position, id)| {
                let mut candidate = by_id[id.as_str()].clone();
                candidate.rank = position + 1;
                candidate
            })
            .collect())
    }
}

/// Extract candidate IDs from a model response, one line at a time.
///
/// A line counts if, after stripping leading enumeration ("1.", "2)",
/// "-", "*"), it equals a valid id exactly; failing that, the raw line
/// is scanned for the first valid id it contains, in candidate order so
/// the result is deterministic. Duplicates keep their first position.
fn parse_ranked_ids(response: &str, ordered_valid_ids: &[&str]) -> Vec<String> {
    let valid: HashSet<&str> = ordered_valid_ids.iter().copied().collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut ranked = Vec::new();

    for raw_line in response.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let stripped = strip_enumeration(line);
        let matched = if valid.contains(stripped) {
            Some(stripped.to_string())
        } else {
            ordered_valid_ids.iter().find(|id| line.contains(**id)).map(|id| id.to_string())
        };

        if let Some(id) = matched {
            if seen.insert(id.clone()) {
                ranked.push(id);
            }
        }
    }

    ranked
}

fn strip_enumeration(line: &str) -> &str {
    let without_digits = line.trim_start_matches(|ch: char| ch.is_ascii_digit());
    // Only treat the digits as enumeration when punctuation follows.
    let stripped = without_digits.trim_start_matches(['.', ')', ':', '-', '*', ' ']);
    if without_digits.len() == line.len() || stripped.len() < without_digits.len() {
        stripped.trim()
    } else {
        line.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;

    use salesrec_core::domain::company::CompanyId;
    use salesrec_core::domain::product::{Product, ProductId};
    use salesrec_core::selector::Relevance;

    struct StaticGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("connection refused"))
        }
    }

    struct NeverendingGenerator;

    #[async_trait]
    impl TextGenerator for NeverendingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    fn candidate(id: &str, rank: usize) -> Candidate {
        Candidate {
            product: Product {
                id: ProductId(id.to_string()),
                company_id: CompanyId("company-fowler".to_string()),
                company_name: "Fowler".to_string(),
                name: format!("Fowler {id}"),
                product_line: "Cleaner".to_string(),
                category: None,
                description: None,
                price: None,
                active: true,
            },
            relevance: Relevance::SameCompany,
            score: 1.0,
            rank,
        }
    }

    fn candidates(ids: &[&str]) -> Vec<Candidate> {
        ids.iter().enumerate().map(|(index, id)| candidate(id, index + 1)).collect()
    }

    fn ranker(generator: impl TextGenerator + 'static) -> AiRanker {
        AiRanker::new(Arc::new(generator), Duration::from_secs(10))
    }

    #[tokio::test]
    async fn rank_reorders_and_reassigns_positions() {
        let input = candidates(&["prod-a", "prod-b", "prod-c"]);
        let ranker = ranker(StaticGenerator("prod-c\nprod-a\nprod-b"));

        let ranked =
            ranker.rank(&input, "Fowler", "Cleaner", 3).await.expect("ranking should succeed");

        let ids: Vec<&str> = ranked.iter().map(|c| c.product.id.0.as_str()).collect();
        assert_eq!(ids, vec!["prod-c", "prod-a", "prod-b"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);
    }

    #[tokio::test]
    async fn invented_ids_are_discarded() {
        let input = candidates(&["prod-a", "prod-b"]);
        let ranker = ranker(StaticGenerator("prod-z\nprod-b\nprod-made-up\nprod-a"));

        let ranked =
            ranker.rank(&input, "Fowler", "Cleaner", 5).await.expect("ranking should succeed");

        let ids: Vec<&str> = ranked.iter().map(|c| c.product.id.0.as_str()).collect();
        assert_eq!(ids, vec!["prod-b", "prod-a"]);
    }

    #[tokio::test]
    async fn output_is_truncated_to_requested_count() {
        let input = candidates(&["prod-a", "prod-b", "prod-c", "prod-d"]);
        let ranker = ranker(StaticGenerator("prod-d\nprod-c\nprod-b\nprod-a"));

        let ranked =
            ranker.rank(&input, "Fowler", "Cleaner", 2).await.expect("ranking should succeed");

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].product.id.0, "prod-d");
    }

    #[tokio::test]
    async fn transport_error_maps_to_unavailable() {
        let input = candidates(&["prod-a"]);
        let error = ranker(FailingGenerator)
            .rank(&input, "Fowler", "Cleaner", 1)
            .await
            .expect_err("transport failure should surface");
        assert!(matches!(error, RankerError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generation_times_out_as_unavailable() {
        let input = candidates(&["prod-a"]);
        let ranker = AiRanker::new(Arc::new(NeverendingGenerator), Duration::from_secs(10));

        let error = ranker
            .rank(&input, "Fowler", "Cleaner", 1)
            .await
            .expect_err("timeout should surface");

        assert!(matches!(error, RankerError::Unavailable(ref reason) if reason.contains("timed out")));
    }

    #[tokio::test]
    async fn garbage_response_maps_to_unparseable() {
        let input = candidates(&["prod-a"]);
        let error = ranker(StaticGenerator("I cannot help with that request."))
            .rank(&input, "Fowler", "Cleaner", 1)
            .await
            .expect_err("prose-only response should be unparseable");
        assert!(matches!(error, RankerError::Unparseable(_)));
    }

    #[test]
    fn parser_strips_numbering_and_bullets() {
        let valid = ["prod-a", "prod-b", "prod-c"];
        let ranked = parse_ranked_ids("1. prod-b\n2) prod-a\n- prod-c", &valid);
        assert_eq!(ranked, vec!["prod-b", "prod-a", "prod-c"]);
    }

    #[test]
    fn parser_recovers_ids_embedded_in_prose() {
        let valid = ["prod-a", "prod-b"];
        let ranked = parse_ranked_ids("My top pick is prod-b because it fits.", &valid);
        assert_eq!(ranked, vec!["prod-b"]);
    }

    #[test]
    fn parser_keeps_first_position_on_duplicates() {
        let valid = ["prod-a", "prod-b"];
        let ranked = parse_ranked_ids("prod-b\nprod-a\nprod-b", &valid);
        assert_eq!(ranked, vec!["prod-b", "prod-a"]);
    }

    #[test]
    fn parser_ignores_blank_lines_and_junk() {
        let valid = ["prod-a"];
        let ranked = parse_ranked_ids("\n\n**\nprod-a\n\nnot-an-id\n", &valid);
        assert_eq!(ranked, vec!["prod-a"]);
    }
}
