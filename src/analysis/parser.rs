//! Structural parser: Python source text to [`SyntaxTree`].
//!
//! tree-sitter recovers from malformed input by inserting `ERROR` and
//! `MISSING` nodes. Any such node makes the whole unit a syntax error; the
//! first one in pre-order supplies the reported location.
//!
//! Indentation mistakes are recovered silently by the grammar's scanner, so
//! blocks are checked separately: every block needs at least one indented
//! statement, and statements that start a line must line up.

use once_cell::sync::OnceCell;
use tree_sitter::{Language, Node, Parser, Point};

use super::tree::{NodeKind, Span, SyntaxNode, SyntaxTree};
use crate::error::{AnalysisError, SyntaxError};

/// Shared parser configuration. `tree_sitter::Parser` itself is not `Sync`,
/// so a fresh one is created per parse.
static PYTHON_PARSER: OnceCell<PythonParser> = OnceCell::new();

/// Parse Python source with the shared parser configuration.
pub fn parse(source: &str) -> Result<SyntaxTree, AnalysisError> {
    PYTHON_PARSER.get_or_init(PythonParser::new).parse(source)
}

pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, AnalysisError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| AnalysisError::Parser(e.to_string()))?;
        Ok(parser)
    }

    /// Parse `source` into a lowered syntax tree, or report the first syntax error.
    pub fn parse(&self, source: &str) -> Result<SyntaxTree, AnalysisError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or_else(|| AnalysisError::Parser("parsing was aborted".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root).into());
        }
        if let Some(err) = indentation_error(root) {
            return Err(err.into());
        }

        let lowering = Lowering {
            source: source.as_bytes(),
        };
        Ok(SyntaxTree::new(SyntaxNode::new(
            NodeKind::Module,
            Span::from_node(root),
            lowering.block(root),
        )))
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

fn syntax_error(root: Node) -> SyntaxError {
    match first_error(root) {
        Some(node) if node.is_missing() => {
            located(format!("expected `{}`", node.kind()), node.start_position())
        }
        Some(node) => located("invalid syntax", node.start_position()),
        None => located("invalid syntax", Point::new(0, 0)),
    }
}

fn located(message: impl Into<String>, position: Point) -> SyntaxError {
    SyntaxError {
        message: message.into(),
        line: position.row + 1,
        column: position.column + 1,
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// First indentation problem in pre-order, if any.
fn indentation_error(node: Node) -> Option<SyntaxError> {
    let found = match node.kind() {
        "module" => misaligned_statement(node, Some(0)),
        "block" => unindented_block(node).or_else(|| misaligned_statement(node, None)),
        _ => None,
    };
    if found.is_some() {
        return found;
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(indentation_error)
}

/// A block with no statements, or whose body sits on the following line
/// without being indented past its header.
fn unindented_block(block: Node) -> Option<SyntaxError> {
    let statements = statements(block);
    let Some(first) = statements.first() else {
        return Some(located("expected an indented block", block.end_position()));
    };

    let header = block.parent()?.start_position();
    let start = first.start_position();
    if start.row > header.row && start.column <= header.column {
        return Some(located("expected an indented block", start));
    }
    None
}

/// A statement that starts its own line at a different column than the
/// first statement of its block (or than `column`, when given).
fn misaligned_statement(container: Node, column: Option<usize>) -> Option<SyntaxError> {
    let statements = statements(container);
    let first = statements.first()?;
    let column = column.unwrap_or(first.start_position().column);

    let mut previous_end: Option<Point> = None;
    for statement in &statements {
        let start = statement.start_position();
        // `a = 1; b = 2` shares a line and is not checked
        let starts_line = previous_end.map_or(true, |end| start.row > end.row);
        if starts_line && start.column != column {
            return Some(located("unexpected indent", start));
        }
        previous_end = Some(statement.end_position());
    }
    None
}

fn statements(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let found: Vec<Node> = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();
    found
}

/// Lowers tree-sitter statements into owned [`SyntaxNode`]s.
struct Lowering<'a> {
    source: &'a [u8],
}

impl<'a> Lowering<'a> {
    /// Lower every statement directly inside `node` (a `module` or `block`).
    fn block(&self, node: Node) -> Vec<SyntaxNode> {
        statements(node)
            .into_iter()
            .map(|n| self.statement(n))
            .collect()
    }

    /// Statements of the first `block` child of `node`, if any.
    fn body(&self, node: Node) -> Vec<SyntaxNode> {
        first_block(node)
            .map(|b| self.block(b))
            .unwrap_or_default()
    }

    fn statement(&self, node: Node) -> SyntaxNode {
        let span = Span::from_node(node);
        match node.kind() {
            "function_definition" => {
                let children = self.body(node);
                let name = self.name(node);
                let body_len = children.len();
                let kind = if is_async(node) {
                    NodeKind::AsyncFunctionDef { name, body_len }
                } else {
                    NodeKind::FunctionDef { name, body_len }
                };
                SyntaxNode::new(kind, span, children)
            }
            "class_definition" => SyntaxNode::new(
                NodeKind::ClassDef {
                    name: self.name(node),
                },
                span,
                self.body(node),
            ),
            "decorated_definition" => match node.child_by_field_name("definition") {
                Some(def) => self.statement(def),
                None => SyntaxNode::new(NodeKind::Simple, span, Vec::new()),
            },
            "if_statement" => {
                let mut children = self.body(node);
                children.extend(self.alternatives(&clauses(node)));
                SyntaxNode::new(NodeKind::If, span, children)
            }
            "for_statement" | "while_statement" => {
                let kind = match node.kind() {
                    "while_statement" => NodeKind::While,
                    _ if is_async(node) => NodeKind::AsyncFor,
                    _ => NodeKind::For,
                };
                let mut children = self.body(node);
                children.extend(self.alternatives(&clauses(node)));
                SyntaxNode::new(kind, span, children)
            }
            "try_statement" => {
                let kind = if has_child(node, "except_group_clause") {
                    NodeKind::TryStar
                } else {
                    NodeKind::Try
                };
                SyntaxNode::new(kind, span, self.try_children(node))
            }
            "with_statement" => SyntaxNode::new(NodeKind::With, span, self.body(node)),
            "match_statement" => SyntaxNode::new(NodeKind::Match, span, self.body(node)),
            "case_clause" => SyntaxNode::new(NodeKind::MatchCase, span, self.body(node)),
            _ => SyntaxNode::new(NodeKind::Simple, span, Vec::new()),
        }
    }

    /// `elif` becomes an `If` nested in its predecessor; `else` bodies are
    /// hoisted into the owning statement.
    fn alternatives(&self, clauses: &[Node]) -> Vec<SyntaxNode> {
        match clauses.split_first() {
            None => Vec::new(),
            Some((first, rest)) if first.kind() == "elif_clause" => {
                let mut children = self.body(*first);
                children.extend(self.alternatives(rest));
                vec![SyntaxNode::new(
                    NodeKind::If,
                    Span::from_node(*first),
                    children,
                )]
            }
            Some((first, rest)) => {
                let mut children = self.body(*first);
                children.extend(self.alternatives(rest));
                children
            }
        }
    }

    fn try_children(&self, node: Node) -> Vec<SyntaxNode> {
        let mut children = self.body(node);
        let mut cursor = node.walk();
        let clauses: Vec<Node> = node.named_children(&mut cursor).collect();
        for clause in clauses {
            match clause.kind() {
                "except_clause" | "except_group_clause" => children.push(SyntaxNode::new(
                    NodeKind::ExceptHandler,
                    Span::from_node(clause),
                    self.body(clause),
                )),
                "else_clause" | "finally_clause" => children.extend(self.body(clause)),
                _ => {}
            }
        }
        children
    }

    fn name(&self, node: Node) -> String {
        node.child_by_field_name("name")
            .and_then(|n| n.utf8_text(self.source).ok())
            .unwrap_or("")
            .to_string()
    }
}

fn first_block(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|n| n.kind() == "block");
    found
}

/// `async def` / `async for` carry a leading `async` keyword token.
fn is_async(node: Node) -> bool {
    node.child(0).is_some_and(|c| c.kind() == "async")
}

fn has_child(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(|n| n.kind() == kind);
    found
}

/// `elif`/`else` clauses attached to an `if`, `for` or `while`, in source order.
fn clauses(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "elif_clause" | "else_clause"))
        .collect()
}
