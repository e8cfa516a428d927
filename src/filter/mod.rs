//! Secondary block filters
//!
//! Predicates run over a block's joined text. The engine combines them with a
//! fixed [`MatchPolicy`] and never lets one failing predicate abort the rest:
//! an error is logged, recorded, and counted as "did not match".

pub mod expression;
pub mod external;
pub mod line_regex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::blocks::Block;
use crate::error::BlockSearchError;

pub use expression::ExpressionPredicate;
pub use external::ExternalAwkPredicate;
pub use line_regex::LineRegexPredicate;

/// Capability shared by every filter variant
pub trait Predicate: Send + Sync {
    /// Source text of the predicate, used in logs and failure reports
    fn describe(&self) -> String;

    fn evaluate(&self, block_text: &str) -> Result<bool, BlockSearchError>;
}

/// How multiple predicates combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Keep a block when at least one predicate matches
    #[default]
    Any,
    /// Keep a block only when every predicate matches
    All,
}

/// A predicate that failed on one block
#[derive(Debug)]
pub struct PredicateFailure {
    pub predicate: String,
    pub line_start: usize,
    pub error: BlockSearchError,
}

/// Surviving blocks (in scan order) plus every evaluation failure
#[derive(Debug, Default)]
pub struct Filtered {
    pub blocks: Vec<Block>,
    pub failures: Vec<PredicateFailure>,
}

#[derive(Default)]
pub struct FilterEngine {
    predicates: Vec<Box<dyn Predicate>>,
    policy: MatchPolicy,
}

impl FilterEngine {
    pub fn new(predicates: Vec<Box<dyn Predicate>>, policy: MatchPolicy) -> Self {
        Self { predicates, policy }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn apply(&self, blocks: Vec<Block>) -> Filtered {
        if self.predicates.is_empty() {
            return Filtered {
                blocks,
                failures: Vec::new(),
            };
        }

        let mut filtered = Filtered::default();

        for block in blocks {
            let text = block.text();
            let mut matched = 0;

            // every predicate runs so each failure gets reported
            for predicate in &self.predicates {
                match predicate.evaluate(&text) {
                    Ok(true) => matched += 1,
                    Ok(false) => {}
                    Err(error) => {
                        warn!(
                            "predicate '{}' failed on block at line {}: {}",
                            predicate.describe(),
                            block.line_start(),
                            error
                        );
                        filtered.failures.push(PredicateFailure {
                            predicate: predicate.describe(),
                            line_start: block.line_start(),
                            error,
                        });
                    }
                }
            }

            let keep = match self.policy {
                MatchPolicy::Any => matched > 0,
                MatchPolicy::All => matched == self.predicates.len(),
            };

            if keep {
                filtered.blocks.push(block);
            }
        }

        filtered
    }
}

impl std::fmt::Debug for FilterEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterEngine")
            .field(
                "predicates",
                &self.predicates.iter().map(|p| p.describe()).collect::<Vec<_>>(),
            )
            .field("policy", &self.policy)
            .finish()
    }
}
