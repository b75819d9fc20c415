//! Reviewcheck - static review gate for generated Python code.
//!
//! Reviewcheck scores source snippets before they are accepted into a
//! codebase. Each named unit is parsed into a syntax tree, measured for
//! cyclomatic complexity, checked for structural smells (long functions,
//! deep nesting) and run through a set of heuristic security patterns.
//!
//! # Architecture
//!
//! - `analysis`: parser, complexity, smells, security scanner and the
//!   `AnalysisEngine` facade that composes them per unit
//! - `config`: YAML configuration (thresholds, exclusions)
//! - `score`: quality score and acceptance threshold
//! - `report`: Output formatting (pretty, JSON)
//! - `cli`: command-line entry points
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use reviewcheck::AnalysisEngine;
//!
//! let mut units = BTreeMap::new();
//! units.insert("step_1".to_string(), "def f(): pass".to_string());
//!
//! let reports = AnalysisEngine::default().analyze(&units);
//! let report = reports["step_1"].structure().unwrap();
//! assert_eq!(report.function_count, 1);
//! assert_eq!(report.complexity_metrics.total_complexity, 1);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod score;

pub use analysis::{
    AnalysisEngine, ComplexityReport, Review, SecurityCategory, SecurityFindings, Smell,
    SmellConfig, StructureReport, SyntaxTree, UnitReport, UnitReview,
};
pub use config::EngineConfig;
pub use error::{AnalysisError, SyntaxError};
pub use score::QualityScore;
