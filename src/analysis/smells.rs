//! Structural code smell detection.
//!
//! Two independent checks:
//! - Long functions: a function body with more top-level statements than allowed.
//! - Deep nesting: `if`/`for`/`while` constructs nested deeper than allowed.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use super::tree::{NodeKind, SyntaxNode, SyntaxTree};

/// Default maximum number of statements in a function body.
pub const DEFAULT_MAX_FUNCTION_STATEMENTS: usize = 20;

/// Default maximum nesting depth of conditionals and loops.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 3;

/// Thresholds for smell detection. A smell is reported when a value
/// strictly exceeds its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmellConfig {
    #[serde(default = "default_max_function_statements")]
    pub max_function_statements: usize,
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

fn default_max_function_statements() -> usize {
    DEFAULT_MAX_FUNCTION_STATEMENTS
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}

impl Default for SmellConfig {
    fn default() -> Self {
        Self {
            max_function_statements: DEFAULT_MAX_FUNCTION_STATEMENTS,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// A detected code smell. Serializes as its human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Smell {
    LongFunction {
        name: String,
        statements: usize,
        line: usize,
    },
    DeepNesting {
        depth: usize,
    },
}

impl fmt::Display for Smell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smell::LongFunction { name, .. } => write!(f, "Long method detected: {}", name),
            Smell::DeepNesting { depth } => write!(f, "High nested complexity: {} levels", depth),
        }
    }
}

impl Serialize for Smell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Run both checks. Long-function findings come first, in traversal order.
pub fn detect(tree: &SyntaxTree, config: &SmellConfig) -> Vec<Smell> {
    let mut smells: Vec<Smell> = tree
        .walk()
        .filter_map(|node| match &node.kind {
            NodeKind::FunctionDef { name, body_len } if *body_len > config.max_function_statements => {
                Some(Smell::LongFunction {
                    name: name.clone(),
                    statements: *body_len,
                    line: node.span.start_line,
                })
            }
            _ => None,
        })
        .collect();

    let depth = max_nesting_depth(tree);
    if depth > config.max_nesting_depth {
        smells.push(Smell::DeepNesting { depth });
    }

    smells
}

/// Deepest chain of nested `if`/`for`/`while` constructs.
///
/// Only those constructs are descended into, starting from the module's
/// top-level statements. Anything inside a function, class, `with` or `try`
/// body is not counted. A tree without such constructs has depth 0.
pub fn max_nesting_depth(tree: &SyntaxTree) -> usize {
    depth_below(tree.root(), 0)
}

fn depth_below(node: &SyntaxNode, current: usize) -> usize {
    node.children
        .iter()
        .filter(|child| child.kind.is_nesting_construct())
        .map(|child| depth_below(child, current + 1))
        .fold(current, usize::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::parse;
    use crate::analysis::tree::tests::{leaf, node};

    fn long_function(statements: usize) -> String {
        let mut source = String::from("def busy():\n");
        for i in 0..statements {
            source.push_str(&format!("    value_{} = {}\n", i, i));
        }
        source
    }

    #[test]
    fn test_trivial_unit_has_no_smells() {
        let tree = parse("def f(): pass").unwrap();
        assert_eq!(max_nesting_depth(&tree), 0);
        assert!(detect(&tree, &SmellConfig::default()).is_empty());
    }

    #[test]
    fn test_long_function_threshold_is_exclusive() {
        let at_limit = parse(&long_function(20)).unwrap();
        assert!(detect(&at_limit, &SmellConfig::default()).is_empty());

        let over_limit = parse(&long_function(21)).unwrap();
        let smells = detect(&over_limit, &SmellConfig::default());
        assert_eq!(smells.len(), 1);
        assert_eq!(smells[0].to_string(), "Long method detected: busy");
        assert!(matches!(
            smells[0],
            Smell::LongFunction { statements: 21, line: 1, .. }
        ));
    }

    #[test]
    fn test_long_async_function_is_not_flagged() {
        let source = format!("async {}", long_function(25));
        let tree = parse(&source).unwrap();
        assert!(detect(&tree, &SmellConfig::default()).is_empty());
    }

    #[test]
    fn test_nesting_depth_counts_only_conditionals_and_loops() {
        let source = r#"
for row in rows:
    with open(row) as fh:
        while fh:
            try:
                if ready:
                    pass
            except Exception:
                pass
"#;
        let tree = parse(source).unwrap();
        // `with` is not descended into
        assert_eq!(max_nesting_depth(&tree), 1);
        assert!(detect(&tree, &SmellConfig::default()).is_empty());
    }

    #[test]
    fn test_deep_nesting_reports_depth() {
        let source = r#"
if a:
    if b:
        if c:
            if d:
                pass
"#;
        let tree = parse(source).unwrap();
        let smells = detect(&tree, &SmellConfig::default());
        assert_eq!(smells, vec![Smell::DeepNesting { depth: 4 }]);
        assert_eq!(smells[0].to_string(), "High nested complexity: 4 levels");
    }

    #[test]
    fn test_nesting_inside_function_is_not_counted() {
        let source = r#"
def f():
    if a:
        if b:
            if c:
                if d:
                    pass
"#;
        let tree = parse(source).unwrap();
        assert_eq!(max_nesting_depth(&tree), 0);
        assert!(detect(&tree, &SmellConfig::default()).is_empty());
    }

    #[test]
    fn test_nesting_stops_at_non_nesting_nodes() {
        let tree = SyntaxTree::new(node(
            NodeKind::Module,
            vec![node(
                NodeKind::For,
                vec![node(
                    NodeKind::With,
                    vec![node(NodeKind::If, vec![leaf(NodeKind::Simple)])],
                )],
            )],
        ));
        assert_eq!(max_nesting_depth(&tree), 1);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = SmellConfig {
            max_function_statements: 2,
            max_nesting_depth: 1,
        };
        let source = r#"
def handler(x):
    print(x)
    return x
    pass

if x:
    for i in x:
        print(i)
"#;
        let tree = parse(source).unwrap();
        let messages: Vec<String> = detect(&tree, &config).iter().map(|s| s.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Long method detected: handler".to_string(),
                "High nested complexity: 2 levels".to_string(),
            ]
        );
    }

    #[test]
    fn test_smell_serializes_as_message() {
        let json = serde_json::to_string(&Smell::DeepNesting { depth: 5 }).unwrap();
        assert_eq!(json, "\"High nested complexity: 5 levels\"");
    }
}
