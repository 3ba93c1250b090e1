use crate::{Logical, Operand, Operator};

/// One comparison inside a `WHERE` or `HAVING` section.
///
/// The connector relates the clause to the sibling preceding it and is
/// ignored for the first rendered element of its level.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub left: Operand,
    pub operator: Operator,
    pub right: Operand,
    pub connector: Logical,
}

impl Clause {
    pub fn new(
        left: impl Into<Operand>,
        operator: Operator,
        right: impl Into<Operand>,
        connector: Logical,
    ) -> Self {
        Self {
            left: left.into(),
            operator,
            right: right.into(),
            connector,
        }
    }
}

/// Node of the clause forest: a leaf comparison or a parenthesized group
/// of further nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseNode {
    Clause(Clause),
    Group(Vec<ClauseNode>),
}

impl ClauseNode {
    /// Connector that joins this node to the one before it. A group
    /// carries the connector of its first non-empty descendant.
    pub fn connector(&self) -> Logical {
        match self {
            ClauseNode::Clause(clause) => clause.connector,
            ClauseNode::Group(children) => children
                .iter()
                .find(|node| !node.is_empty())
                .map(ClauseNode::connector)
                .unwrap_or_default(),
        }
    }

    /// Empty nodes render to nothing and are skipped during compilation.
    pub fn is_empty(&self) -> bool {
        match self {
            ClauseNode::Clause(..) => false,
            ClauseNode::Group(children) => children.iter().all(ClauseNode::is_empty),
        }
    }
}

impl From<Clause> for ClauseNode {
    fn from(value: Clause) -> Self {
        ClauseNode::Clause(value)
    }
}
