use crate::{Binding, Operator};
use std::fmt::{self, Display};

/// Join flavor keyword, `None` on the [`Join`] meaning a plain `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    LeftOuter,
    Right,
    RightOuter,
    Cross,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::LeftOuter => "LEFT OUTER",
            JoinType::Right => "RIGHT",
            JoinType::RightOuter => "RIGHT OUTER",
            JoinType::Cross => "CROSS",
        }
    }
}

/// Joined table and its `ON` condition. A subquery source keeps its
/// parenthesized SQL in `table` and owns the bindings that subquery
/// produced, emitted before any `WHERE` bindings of the outer statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub left: String,
    pub right: String,
    pub operator: Operator,
    pub join_type: Option<JoinType>,
    pub alias: Option<String>,
    pub bindings: Vec<Binding>,
}

impl Display for Join {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.join_type {
            Some(join_type) => write!(f, "{} JOIN ", join_type.as_str())?,
            None => f.write_str("JOIN ")?,
        }
        match &self.alias {
            Some(alias) => write!(f, "{} AS {}", self.table, alias)?,
            None => f.write_str(&self.table)?,
        }
        write!(f, " ON {} {} {}", self.left, self.operator.as_str(), self.right)
    }
}
