/// Comparison operator of a single clause.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    #[default]
    Equals,
    NotEquals,
    Greater,
    GreaterEquals,
    Less,
    LessEquals,
    In,
    NotIn,
    Is,
    IsNot,
    Like,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::Greater => ">",
            Operator::GreaterEquals => ">=",
            Operator::Less => "<",
            Operator::LessEquals => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
            Operator::Like => "LIKE",
        }
    }

    /// Operators whose right-hand side is a parenthesized value list,
    /// rendered as one placeholder per element.
    pub fn expects_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

/// Boolean connector between a clause and its preceding sibling.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logical {
    #[default]
    And,
    Or,
    Xor,
}

impl Logical {
    pub fn as_str(&self) -> &'static str {
        match self {
            Logical::And => "AND",
            Logical::Or => "OR",
            Logical::Xor => "XOR",
        }
    }
}

/// `ORDER BY` direction. Descending unless asked otherwise.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}
