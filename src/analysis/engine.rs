//! Analysis facade: the single entry point for callers.
//!
//! Each source unit is analyzed independently. A unit that fails to parse
//! yields an error record; the rest of the batch is unaffected.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info};

use super::complexity::{self, ComplexityReport};
use super::parser;
use super::security::{self, SecurityFindings};
use super::smells::{self, Smell, SmellConfig};
use crate::config::EngineConfig;
use crate::error::AnalysisError;
use crate::score::{self, QualityScore, DEFAULT_ACCEPTANCE_THRESHOLD};

/// Structural metrics for one successfully parsed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    pub function_count: usize,
    pub class_count: usize,
    pub complexity_metrics: ComplexityReport,
    pub potential_issues: Vec<Smell>,
}

/// Per-unit result of [`AnalysisEngine::analyze`].
///
/// Serializes either as the structure report's fields or as `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UnitReport {
    Structure(StructureReport),
    Error { error: String },
}

impl UnitReport {
    pub fn is_error(&self) -> bool {
        matches!(self, UnitReport::Error { .. })
    }

    pub fn structure(&self) -> Option<&StructureReport> {
        match self {
            UnitReport::Structure(report) => Some(report),
            UnitReport::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UnitReport::Structure(_) => None,
            UnitReport::Error { error } => Some(error),
        }
    }
}

impl From<Result<StructureReport, AnalysisError>> for UnitReport {
    fn from(result: Result<StructureReport, AnalysisError>) -> Self {
        match result {
            Ok(report) => UnitReport::Structure(report),
            Err(e) => UnitReport::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Full review of one unit: structure, security triage and quality score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReview {
    pub structure: UnitReport,
    pub security: SecurityFindings,
    /// Absent when the unit failed to parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityScore>,
}

impl UnitReview {
    /// A unit is acceptable only if it parsed and met the score threshold.
    pub fn is_acceptable(&self) -> bool {
        self.quality.as_ref().map(|q| q.acceptable).unwrap_or(false)
    }
}

/// Review of a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub units: BTreeMap<String, UnitReview>,
    pub summary: ReviewSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub units: usize,
    pub failed: usize,
    pub acceptable: usize,
    pub threshold: f64,
    /// Every unit is acceptable.
    pub passed: bool,
}

impl ReviewSummary {
    fn from_units(units: &BTreeMap<String, UnitReview>, threshold: f64) -> Self {
        let failed = units.values().filter(|u| u.structure.is_error()).count();
        let acceptable = units.values().filter(|u| u.is_acceptable()).count();
        Self {
            units: units.len(),
            failed,
            acceptable,
            threshold,
            passed: acceptable == units.len(),
        }
    }
}

/// Static analysis engine.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    smells: SmellConfig,
    acceptance_threshold: f64,
}

impl AnalysisEngine {
    pub fn new(smells: SmellConfig) -> Self {
        Self {
            smells,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.smells).with_acceptance_threshold(config.acceptance_threshold())
    }

    pub fn with_acceptance_threshold(mut self, threshold: f64) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    pub fn smell_config(&self) -> &SmellConfig {
        &self.smells
    }

    pub fn acceptance_threshold(&self) -> f64 {
        self.acceptance_threshold
    }

    /// Parse one unit and compute its structure report.
    pub fn analyze_unit(&self, source: &str) -> Result<StructureReport, AnalysisError> {
        let tree = parser::parse(source)?;

        Ok(StructureReport {
            function_count: tree.function_count(),
            class_count: tree.class_count(),
            complexity_metrics: complexity::calculate(&tree),
            potential_issues: smells::detect(&tree, &self.smells),
        })
    }

    /// Analyze a batch of named units in parallel.
    ///
    /// Always returns one entry per input unit.
    pub fn analyze(&self, units: &BTreeMap<String, String>) -> BTreeMap<String, UnitReport> {
        let reports: BTreeMap<String, UnitReport> = units
            .par_iter()
            .map(|(name, source)| (name.clone(), self.analyze_named(name, source)))
            .collect();

        let failed = reports.values().filter(|r| r.is_error()).count();
        info!(units = reports.len(), failed, "structure analysis complete");
        reports
    }

    /// Heuristic security scan of raw text. Never fails.
    pub fn scan_security(&self, text: &str) -> SecurityFindings {
        security::scan(text)
    }

    /// Analyze, scan and score a batch of named units in parallel.
    pub fn review(&self, units: &BTreeMap<String, String>) -> Review {
        let reviews: BTreeMap<String, UnitReview> = units
            .par_iter()
            .map(|(name, source)| (name.clone(), self.review_unit(name, source)))
            .collect();

        let summary = ReviewSummary::from_units(&reviews, self.acceptance_threshold);
        info!(
            units = summary.units,
            failed = summary.failed,
            acceptable = summary.acceptable,
            "review complete"
        );

        Review {
            units: reviews,
            summary,
        }
    }

    fn review_unit(&self, name: &str, source: &str) -> UnitReview {
        let structure = self.analyze_named(name, source);
        let security = self.scan_security(source);
        let quality = structure.structure().map(|report| {
            score::calculate(
                &security,
                &report.potential_issues,
                self.acceptance_threshold,
            )
        });

        UnitReview {
            structure,
            security,
            quality,
        }
    }

    fn analyze_named(&self, name: &str, source: &str) -> UnitReport {
        debug!(unit = name, bytes = source.len(), "analyzing unit");
        let result = self.analyze_unit(source);
        if let Err(e) = &result {
            error!(unit = name, "syntax error in code analysis: {}", e);
        }
        UnitReport::from(result)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new(SmellConfig::default())
    }
}
