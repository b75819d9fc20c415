//! Owned syntax tree produced by the structural parser.
//!
//! The tree-sitter concrete syntax tree is lowered into this representation
//! once per analysis call. Only statements are kept: Python expressions
//! cannot contain statements, so nothing the analyzers look for is lost.

use std::fmt;

/// Start position of a lowered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        Self {
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
        }
    }
}

/// Syntactic category of a lowered node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of every tree.
    Module,
    /// `def`. `body_len` is the number of top-level body statements.
    FunctionDef { name: String, body_len: usize },
    /// `async def`. Not counted as a function.
    AsyncFunctionDef { name: String, body_len: usize },
    /// `class`.
    ClassDef { name: String },
    /// `if`, and every `elif` (nested inside the preceding `If`).
    If,
    For,
    /// `async for`. Neither a branch point nor a nesting level.
    AsyncFor,
    While,
    Try,
    /// `try` with `except*` handlers. Only its handlers are branch points.
    TryStar,
    /// `except` / `except*` clause.
    ExceptHandler,
    With,
    Match,
    MatchCase,
    /// Any statement without nested statements.
    Simple,
}

impl NodeKind {
    /// Whether this construct adds an execution path to the cyclomatic count.
    pub fn is_branch_point(&self) -> bool {
        matches!(
            self,
            NodeKind::If | NodeKind::While | NodeKind::For | NodeKind::Try | NodeKind::ExceptHandler
        )
    }

    /// Whether descending into this construct increases nesting depth.
    pub fn is_nesting_construct(&self) -> bool {
        matches!(self, NodeKind::If | NodeKind::For | NodeKind::While)
    }

    /// Short label used in debug output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::FunctionDef { .. } => "function",
            NodeKind::AsyncFunctionDef { .. } => "async function",
            NodeKind::ClassDef { .. } => "class",
            NodeKind::If => "if",
            NodeKind::For => "for",
            NodeKind::AsyncFor => "async for",
            NodeKind::While => "while",
            NodeKind::Try => "try",
            NodeKind::TryStar => "try star",
            NodeKind::ExceptHandler => "except",
            NodeKind::With => "with",
            NodeKind::Match => "match",
            NodeKind::MatchCase => "case",
            NodeKind::Simple => "statement",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::FunctionDef { name, .. }
            | NodeKind::AsyncFunctionDef { name, .. }
            | NodeKind::ClassDef { name } => {
                write!(f, "{} {}", self.as_str(), name)
            }
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

/// A node in the lowered tree. Parents own their children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, span: Span, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            span,
            children,
        }
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }
}

/// A parsed source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    /// Wrap a root node. The root is expected to be a `Module`.
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Pre-order iterator over every node in the tree, root included.
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }

    /// Number of function definitions anywhere in the tree.
    pub fn function_count(&self) -> usize {
        self.walk()
            .filter(|n| matches!(n.kind, NodeKind::FunctionDef { .. }))
            .count()
    }

    /// Number of class definitions anywhere in the tree.
    pub fn class_count(&self) -> usize {
        self.walk()
            .filter(|n| matches!(n.kind, NodeKind::ClassDef { .. }))
            .count()
    }
}

/// Pre-order traversal, see [`SyntaxTree::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the leftmost child is visited first.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
