//! AI-assisted ranking layer: the text-generation client, the prompt
//! contract, the response parser, and the orchestrator that ties
//! candidate selection and AI ranking together with a deterministic
//! fallback.

pub mod llm;
pub mod orchestrator;
pub mod prompt;
pub mod ranker;

pub use llm::{ChatCompletionsClient, TextGenerator};
pub use orchestrator::RecommendationEngine;
pub use ranker::{AiRanker, RankerError};
