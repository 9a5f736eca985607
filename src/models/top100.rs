//! Top-100 solved list payloads

use serde::{Deserialize, Serialize};

// == Ranked Problem ==
/// One problem in a user's top-100 list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProblem {
    /// Upstream problem identifier
    pub problem_id: u32,
    /// Problem title
    pub title: String,
    /// Difficulty level of the problem
    pub level: u8,
}

// == Top 100 ==
/// The hardest problems a user has solved, hardest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Top100 {
    /// Number of problems in the list (at most 100)
    pub count: u32,
    /// The problems, ordered by descending level
    pub problems: Vec<RankedProblem>,
}

impl Top100 {
    /// Sum of problem levels, the score contribution of this list.
    pub fn level_sum(&self) -> u32 {
        self.problems.iter().map(|p| u32::from(p.level)).sum()
    }
}
