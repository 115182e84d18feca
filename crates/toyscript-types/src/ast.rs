//! Region-backed AST for ToyScript.
//!
//! Nodes and list cells live in two [`Region`]s owned by an [`Ast`], and
//! refer to each other by index. Ordered lists ([`AstList`]) are singly
//! linked through [`Cell`]s and only ever grow at the tail.

use std::fmt;
use std::rc::Rc;

use crate::region::{Handle, Mark, Region, RegionStats};

pub type NodeId = Handle<Node>;
pub type CellId = Handle<Cell>;

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    /// `!`
    Not,
    /// `-`
    Negate,
}

impl PrefixOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Negate => "-",
        }
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Greater,
    Less,
}

impl InfixOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Greater => ">",
            Self::Less => "<",
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Nodes
// ══════════════════════════════════════════════════════════════════════════════

/// One AST node. Children are [`NodeId`]s into the same [`Ast`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // ── Statements ──────────────────────────────────────────────────────────
    Program {
        statements: AstList,
    },
    /// `val name = value`
    ValBinding {
        name: String,
        value: NodeId,
    },
    /// `var name = value`
    VarBinding {
        name: String,
        value: NodeId,
    },
    Return {
        value: NodeId,
    },
    /// `while (condition) { body }`
    While {
        condition: NodeId,
        body: AstList,
    },

    // ── Expressions ─────────────────────────────────────────────────────────
    /// `target = value`; the target is an `Identifier` or an `Index`.
    Assign {
        target: NodeId,
        value: NodeId,
    },
    Identifier(String),
    IntLiteral(i64),
    BoolLiteral(bool),
    StringLiteral(String),
    NullLiteral,
    ListLiteral {
        items: AstList,
    },
    /// `fn(params) { body }`; every param is an `Identifier` node.
    FunctionLiteral {
        params: AstList,
        body: AstList,
    },
    PrefixOp {
        op: PrefixOperator,
        operand: NodeId,
    },
    InfixOp {
        left: NodeId,
        op: InfixOperator,
        right: NodeId,
    },
    /// `if (condition) { consequence } else { alternative }`
    Conditional {
        condition: NodeId,
        consequence: AstList,
        alternative: Option<AstList>,
    },
    Call {
        callee: NodeId,
        args: AstList,
    },
    Index {
        base: NodeId,
        index: NodeId,
    },
}

impl Node {
    /// Short tag name, used in logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Program { .. } => "Program",
            Node::ValBinding { .. } => "ValBinding",
            Node::VarBinding { .. } => "VarBinding",
            Node::Return { .. } => "Return",
            Node::While { .. } => "While",
            Node::Assign { .. } => "Assign",
            Node::Identifier(_) => "Identifier",
            Node::IntLiteral(_) => "IntLiteral",
            Node::BoolLiteral(_) => "BoolLiteral",
            Node::StringLiteral(_) => "StringLiteral",
            Node::NullLiteral => "NullLiteral",
            Node::ListLiteral { .. } => "ListLiteral",
            Node::FunctionLiteral { .. } => "FunctionLiteral",
            Node::PrefixOp { .. } => "PrefixOp",
            Node::InfixOp { .. } => "InfixOp",
            Node::Conditional { .. } => "Conditional",
            Node::Call { .. } => "Call",
            Node::Index { .. } => "Index",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Lists
// ══════════════════════════════════════════════════════════════════════════════

/// A link in an [`AstList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub node: NodeId,
    pub next: Option<CellId>,
}

/// Ordered, append-only list of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AstList {
    head: Option<CellId>,
    tail: Option<CellId>,
    len: usize,
}

impl AstList {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Iterator over the nodes of an [`AstList`].
pub struct ListIter<'a> {
    ast: &'a Ast,
    next: Option<CellId>,
    remaining: usize,
}

impl Iterator for ListIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cell = self.ast.cells[self.next?];
        self.next = cell.next;
        self.remaining -= 1;
        Some(cell.node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ListIter<'_> {}

// ══════════════════════════════════════════════════════════════════════════════
// Arena
// ══════════════════════════════════════════════════════════════════════════════

/// Offsets of both regions of an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstMark {
    nodes: Mark,
    cells: Mark,
}

/// Owner of every node and list cell built by one parse.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Region<Node>,
    cells: Region<Cell>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.nodes.alloc(node)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Append `node` to the tail of `list`.
    pub fn push(&mut self, list: &mut AstList, node: NodeId) {
        let cell = self.cells.alloc(Cell { node, next: None });
        match list.tail {
            Some(tail) => self.cells[tail].next = Some(cell),
            None => list.head = Some(cell),
        }
        list.tail = Some(cell);
        list.len += 1;
    }

    pub fn iter(&self, list: AstList) -> ListIter<'_> {
        ListIter {
            ast: self,
            next: list.head,
            remaining: list.len,
        }
    }

    /// The last node of `list`, if any.
    pub fn last(&self, list: AstList) -> Option<NodeId> {
        list.tail.map(|cell| self.cells[cell].node)
    }

    pub fn checkpoint(&self) -> AstMark {
        AstMark {
            nodes: self.nodes.checkpoint(),
            cells: self.cells.checkpoint(),
        }
    }

    /// Discard every node and cell allocated since `mark`.
    pub fn rollback(&mut self, mark: AstMark) {
        self.nodes.rollback(mark.nodes);
        self.cells.rollback(mark.cells);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn stats(&self) -> (RegionStats, RegionStats) {
        (self.nodes.stats(), self.cells.stats())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Program
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed program: the arena it lives in plus its root `Program` node.
///
/// The arena is shared so function values built from it can keep it alive.
#[derive(Debug, Clone)]
pub struct Program {
    ast: Rc<Ast>,
    root: NodeId,
}

impl Program {
    pub fn new(ast: Ast, root: NodeId) -> Self {
        Self {
            ast: Rc::new(ast),
            root,
        }
    }

    pub fn ast(&self) -> &Rc<Ast> {
        &self.ast
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Top-level statements in source order.
    pub fn statements(&self) -> AstList {
        match self.ast.node(self.root) {
            Node::Program { statements } => *statements,
            _ => AstList::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_preserves_order() {
        let mut ast = Ast::new();
        let mut list = AstList::default();
        for value in [1, 2, 3] {
            let node = ast.alloc(Node::IntLiteral(value));
            ast.push(&mut list, node);
        }
        let values: Vec<i64> = ast
            .iter(list)
            .map(|id| match ast.node(id) {
                Node::IntLiteral(v) => *v,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert_eq!(list.len(), 3);
        assert_eq!(ast.iter(list).len(), 3);
        assert_eq!(ast.last(list).map(|id| ast.node(id).clone()), Some(Node::IntLiteral(3)));
    }

    #[test]
    fn test_rollback_discards_nodes_and_cells() {
        let mut ast = Ast::new();
        let keep = ast.alloc(Node::NullLiteral);
        let mark = ast.checkpoint();
        let mut list = AstList::default();
        let tmp = ast.alloc(Node::BoolLiteral(true));
        ast.push(&mut list, tmp);
        assert_eq!((ast.node_count(), ast.cell_count()), (2, 1));

        ast.rollback(mark);
        assert_eq!((ast.node_count(), ast.cell_count()), (1, 0));
        assert_eq!(ast.node(keep), &Node::NullLiteral);
    }

    #[test]
    fn test_program_statements() {
        let mut ast = Ast::new();
        let mut statements = AstList::default();
        let stmt = ast.alloc(Node::Identifier("x".into()));
        ast.push(&mut statements, stmt);
        let root = ast.alloc(Node::Program { statements });
        let program = Program::new(ast, root);
        assert_eq!(program.statements().len(), 1);
        assert_eq!(program.ast().node(program.root()).kind_name(), "Program");
    }
}
