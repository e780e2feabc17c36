//! Big-O badge shown next to the display while a run is working
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub notation: String,
    pub description: String,
    pub operations: u64,
}

impl Complexity {
    /// Classify a run by the number of simulated steps it spent.
    pub fn from_steps(operations: u64) -> Self {
        let (notation, description) = match operations {
            0..=9 => ("O(1)", "Constant Time"),
            10..=49 => ("O(log n)", "Logarithmic Time"),
            50..=99 => ("O(n)", "Linear Time"),
            100..=199 => ("O(n log n)", "Linearithmic Time"),
            200..=499 => ("O(n²)", "Quadratic Time"),
            _ => ("O(2ⁿ)", "Exponential Time"),
        };

        Self {
            notation: notation.to_string(),
            description: description.to_string(),
            operations,
        }
    }
}
