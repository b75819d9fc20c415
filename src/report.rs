//! Output formatting for review results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use std::collections::BTreeMap;
use std::io::{self, Write};

use colored::*;
use serde::Serialize;

use crate::analysis::{Review, ReviewSummary, UnitReport, UnitReview};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            _ => Err(format!("invalid format {:?}, must be 'pretty' or 'json'", s)),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a str>,
    pub units: &'a BTreeMap<String, UnitReview>,
    pub summary: &'a ReviewSummary,
}

impl<'a> JsonReport<'a> {
    pub fn new(path: &'a str, config: Option<&'a str>, review: &'a Review) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            path,
            config,
            units: &review.units,
            summary: &review.summary,
        }
    }
}

/// Render the review as pretty-printed JSON.
pub fn to_json(path: &str, config: Option<&str>, review: &Review) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::new(path, config, review))?)
}

/// Write results in JSON format to stdout.
pub fn write_json(path: &str, config: Option<&str>, review: &Review) -> anyhow::Result<()> {
    let json = to_json(path, config, review)?;
    let mut out = io::stdout().lock();
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, config: Option<&str>, review: &Review) {
    // Header
    println!();
    print!("  ");
    print!("{}", "reviewcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Reviewing: ".dimmed());
    println!("{}", path);
    print!("  {}", "Config:    ".dimmed());
    println!("{}", config.unwrap_or("(defaults)"));
    println!();

    for (name, unit) in &review.units {
        write_unit(name, unit);
        println!();
    }

    write_summary(&review.summary);
    println!();
}

fn write_unit(name: &str, unit: &UnitReview) {
    write_status_tag(unit);
    println!(" {}", name.blue().bold());

    match &unit.structure {
        UnitReport::Error { error } => {
            println!("      {}", error.red());
        }
        UnitReport::Structure(report) => {
            println!(
                "      {} functions, {} classes, complexity {} ({} branch points)",
                report.function_count,
                report.class_count,
                report.complexity_metrics.total_complexity,
                report.complexity_metrics.branch_points
            );
            for smell in &report.potential_issues {
                println!("      {} {}", "SMELL".yellow(), smell);
            }
        }
    }

    for (category, finding) in unit.security.iter() {
        println!(
            "      {} {:<26}{}",
            "RISK ".red(),
            category.as_str().dimmed(),
            finding
        );
    }

    if let Some(quality) = &unit.quality {
        print!("      Quality: ");
        write_colored_score(quality.score, quality.threshold);
        println!();
    }
}

fn write_status_tag(unit: &UnitReview) {
    if unit.structure.is_error() {
        print!("    {}", "ERROR".red());
    } else if unit.is_acceptable() {
        print!("    {}", "✓ OK ".green());
    } else {
        print!("    {}", "✗ LOW".yellow());
    }
}

fn write_colored_score(score: f64, threshold: f64) {
    let text = format!("{:.2}", score);
    if score >= threshold {
        print!("{}", text.green());
    } else {
        print!("{}", text.red());
    }
}

fn write_summary(summary: &ReviewSummary) {
    println!("  {}", "Summary:".bold());
    println!(
        "    {} units, {} acceptable, {} failed to parse",
        summary.units, summary.acceptable, summary.failed
    );
    print!("  {}", format!("Threshold: {:.2}", summary.threshold).dimmed());
    print!("  ");
    if summary.passed {
        print!("{}", "PASSED".green());
    } else {
        print!("{}", "FAILED".red());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisEngine;

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert_eq!("Pretty".parse::<Format>(), Ok(Format::Pretty));
        assert!("sarif".parse::<Format>().is_err());
    }

    #[test]
    fn test_json_report_shape() {
        let units: BTreeMap<String, String> = [
            ("good.py".to_string(), "def f(): pass".to_string()),
            ("bad.py".to_string(), "def f(:".to_string()),
        ]
        .into_iter()
        .collect();
        let review = AnalysisEngine::default().review(&units);

        let json = to_json("src", None, &review).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["path"], "src");
        assert!(value.get("config").is_none());
        assert_eq!(value["summary"]["units"], 2);
        assert_eq!(value["units"]["good.py"]["structure"]["function_count"], 1);
        assert_eq!(value["units"]["good.py"]["quality"]["score"], 1.0);
        assert!(value["units"]["bad.py"]["structure"]["error"].is_string());
        assert!(value["units"]["bad.py"].get("quality").is_none());
        assert_eq!(
            value["units"]["bad.py"]["security"]["authentication_issues"],
            serde_json::json!([])
        );
    }
}
