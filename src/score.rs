//! Quality scoring for reviewed units.
//!
//! A unit starts at 1.0 and loses a fixed penalty per security finding and
//! per code smell, clamped to `[0.0, 1.0]`. Penalties are tracked in whole
//! hundredths so that scores compare exactly against thresholds.

use serde::{Deserialize, Serialize};

use crate::analysis::{SecurityFindings, Smell};

/// Penalties in hundredths of a point.
pub mod penalties {
    pub const SECURITY_FINDING: u32 = 10;
    pub const SMELL: u32 = 5;
}

/// Default minimum score for a unit to be acceptable.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.7;

/// Calculated quality score for one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Score from 0.0 to 1.0, higher is better.
    pub score: f64,
    /// Penalty from security findings.
    pub security_penalty: f64,
    /// Penalty from code smells.
    pub smell_penalty: f64,
    /// Whether the score meets the threshold.
    pub acceptable: bool,
    /// The threshold used.
    pub threshold: f64,
}

/// Calculate the score for a unit that parsed successfully.
pub fn calculate(security: &SecurityFindings, smells: &[Smell], threshold: f64) -> QualityScore {
    let security_points = penalties::SECURITY_FINDING * security.total() as u32;
    let smell_points = penalties::SMELL * smells.len() as u32;
    let remaining = 100u32.saturating_sub(security_points + smell_points);
    let score = hundredths(remaining);

    QualityScore {
        score,
        security_penalty: hundredths(security_points),
        smell_penalty: hundredths(smell_points),
        acceptable: score >= threshold,
        threshold,
    }
}

fn hundredths(points: u32) -> f64 {
    f64::from(points) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{SecurityCategory, SecurityFindings};

    fn findings(count: usize) -> SecurityFindings {
        let mut f = SecurityFindings::new();
        for i in 0..count {
            f.push(SecurityCategory::InputValidation, format!("finding {}", i));
        }
        f
    }

    #[test]
    fn test_clean_unit_scores_one() {
        let score = calculate(&SecurityFindings::new(), &[], DEFAULT_ACCEPTANCE_THRESHOLD);
        assert_eq!(score.score, 1.0);
        assert!(score.acceptable);
    }

    #[test]
    fn test_penalties() {
        let smells = vec![Smell::DeepNesting { depth: 4 }];
        let score = calculate(&findings(2), &smells, DEFAULT_ACCEPTANCE_THRESHOLD);
        assert_eq!(score.score, 0.75);
        assert_eq!(score.security_penalty, 0.2);
        assert_eq!(score.smell_penalty, 0.05);
        assert!(score.acceptable);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let score = calculate(&findings(3), &[], DEFAULT_ACCEPTANCE_THRESHOLD);
        assert_eq!(score.score, 0.7);
        assert!(score.acceptable);

        let score = calculate(&findings(4), &[], DEFAULT_ACCEPTANCE_THRESHOLD);
        assert!(!score.acceptable);
    }

    #[test]
    fn test_score_is_clamped_at_zero() {
        let score = calculate(&findings(15), &[], 0.0);
        assert_eq!(score.score, 0.0);
        assert!(score.acceptable);
    }
}
