//! Cyclomatic complexity as a decision-point count.
//!
//! Complexity starts at 1 and grows by one for each `if` (including `elif`),
//! `for`, `while`, `try` and `except` in the unit. Boolean operators, match
//! arms, `async for` and the `try` of an `except*` group are not counted.

use serde::{Deserialize, Serialize};

use super::tree::SyntaxTree;

/// Complexity metrics for one source unit.
///
/// `total_complexity` is always `1 + branch_points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub total_complexity: usize,
    pub branch_points: usize,
}

impl ComplexityReport {
    pub fn from_branch_points(branch_points: usize) -> Self {
        Self {
            total_complexity: 1 + branch_points,
            branch_points,
        }
    }
}

impl Default for ComplexityReport {
    fn default() -> Self {
        Self::from_branch_points(0)
    }
}

/// Count decision points over every node of the tree.
pub fn calculate(tree: &SyntaxTree) -> ComplexityReport {
    let branch_points = tree.walk().filter(|n| n.kind.is_branch_point()).count();
    ComplexityReport::from_branch_points(branch_points)
}
