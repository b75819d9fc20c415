//! Static analysis of Python source units.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌──────────┐    ┌────────────┐    ┌──────────────┐
//! │ Source text │───▶│ parser   │───▶│ SyntaxTree │───▶│ complexity   │
//! └─────────────┘    │(tree-    │    └────────────┘    │ smells       │
//!        │           │ sitter)  │                      └──────────────┘
//!        │           └──────────┘                             │
//!        │                                                    ▼
//!        │           ┌──────────┐                      ┌──────────────┐
//!        └──────────▶│ security │─────────────────────▶│ engine       │
//!                    │ (regex)  │                      │ (per unit)   │
//!                    └──────────┘                      └──────────────┘
//! ```
//!
//! The security scanner works on raw text and never needs a parse tree.
//! Everything else works on the lowered [`SyntaxTree`].

pub mod complexity;
pub mod engine;
pub mod parser;
pub mod security;
pub mod smells;
pub mod tree;

pub use complexity::ComplexityReport;
pub use engine::{AnalysisEngine, Review, ReviewSummary, StructureReport, UnitReport, UnitReview};
pub use parser::{parse, PythonParser};
pub use security::{SecurityCategory, SecurityFindings};
pub use smells::{Smell, SmellConfig};
pub use tree::{NodeKind, Span, SyntaxNode, SyntaxTree};
