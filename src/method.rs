use crate::{AsValue, JoinType, Logical, Operator, QuarryError, Value};

/// Loosely-typed argument of a [`crate::Builder::call`] invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Value(Value),
    Operator(Operator),
}

impl Argument {
    pub(crate) fn into_value(self) -> Option<Value> {
        match self {
            Argument::Value(value) => Some(value),
            Argument::Operator(..) => None,
        }
    }

    pub(crate) fn as_operator(&self) -> Option<Operator> {
        match self {
            Argument::Operator(operator) => Some(*operator),
            Argument::Value(..) => None,
        }
    }

    pub(crate) fn as_text(&self) -> Option<&str> {
        match self {
            Argument::Value(Value::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl From<Value> for Argument {
    fn from(value: Value) -> Self {
        Argument::Value(value)
    }
}

impl From<Operator> for Argument {
    fn from(value: Operator) -> Self {
        Argument::Operator(value)
    }
}

macro_rules! impl_argument_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Argument {
                fn from(value: $source) -> Self {
                    Argument::Value(value.as_value())
                }
            }
        )*
    };
}
impl_argument_from!(
    bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, serde_json::Value
);

impl<T: AsValue> From<Option<T>> for Argument {
    fn from(value: Option<T>) -> Self {
        Argument::Value(value.as_value())
    }
}

impl<T: AsValue> From<Vec<T>> for Argument {
    fn from(value: Vec<T>) -> Self {
        Argument::Value(value.as_value())
    }
}

/// Family a dynamic method name belongs to, decided before any finer
/// decomposition. `having` wins over `where` when both substrings occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
    Where,
    Having,
    Join,
}

impl Family {
    pub(crate) fn verb(&self) -> &'static str {
        match self {
            Family::Where => "Where",
            Family::Having => "Having",
            Family::Join => "Join",
        }
    }
}

pub(crate) fn family(name: &str) -> Result<Family, QuarryError> {
    let lower = name.to_lowercase();
    if lower.contains("having") {
        Ok(Family::Having)
    } else if lower.contains("where") {
        Ok(Family::Where)
    } else if name.ends_with("Join") {
        Ok(Family::Join)
    } else {
        Err(QuarryError::UnknownMethod(name.into()))
    }
}

/// Outcome of decomposing a `where`/`having` convenience name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClausePattern {
    pub connector: Logical,
    /// `None` means the operator comes from an explicit argument,
    /// defaulting to equality.
    pub operator: Option<Operator>,
    /// `Null`-suffixed names discard the value argument.
    pub null_value: bool,
}

/// Splits a convenience name into connector prefix, verb and operator
/// suffix. The suffixes are tried longest-match-sensitive in a fixed
/// order so that `IsNot` is recognized before `Not` and `Is`.
pub(crate) fn decompose_clause(family: Family, name: &str) -> Result<ClausePattern, QuarryError> {
    let (stem, null_value) = match name.strip_suffix("Null") {
        Some(stem) => (stem, true),
        None => (name, false),
    };
    let connector = if stem.starts_with("xor") {
        Logical::Xor
    } else if stem.starts_with("or") {
        Logical::Or
    } else {
        Logical::And
    };
    let operator = if stem.ends_with("IsNot") {
        Some(Operator::IsNot)
    } else if stem.ends_with("Not") {
        Some(Operator::NotEquals)
    } else if stem.ends_with("Is") {
        Some(Operator::Is)
    } else if stem.ends_with("NotIn") {
        Some(Operator::NotIn)
    } else if stem.ends_with("In") {
        Some(Operator::In)
    } else if stem.ends_with("Like") {
        Some(Operator::Like)
    } else if stem.ends_with("Less") {
        Some(Operator::Less)
    } else if stem.ends_with("Greater") {
        Some(Operator::Greater)
    } else if stem.ends_with(family.verb()) || stem.eq_ignore_ascii_case(family.verb()) {
        None
    } else {
        return Err(QuarryError::UnknownMethod(name.into()));
    };
    Ok(ClausePattern {
        connector,
        operator,
        null_value,
    })
}

/// Maps a `*Join` convenience name to its join flavor. Plain `join` is a
/// first-class method and never reaches this point.
pub(crate) fn decompose_join(name: &str) -> Result<JoinType, QuarryError> {
    if name.starts_with("cross") {
        Ok(JoinType::Cross)
    } else if name.starts_with("leftOuter") {
        Ok(JoinType::LeftOuter)
    } else if name.starts_with("left") {
        Ok(JoinType::Left)
    } else if name.starts_with("rightOuter") {
        Ok(JoinType::RightOuter)
    } else if name.starts_with("right") {
        Ok(JoinType::Right)
    } else {
        Err(QuarryError::UnknownMethod(name.into()))
    }
}
