use crate::{AsValue, Binding, QuarryError, Value};
use std::fmt::{self, Display};

/// Raw SQL fragment spliced verbatim into the generated statement.
///
/// Expressions carry no bindings, the text is emitted as-is and never
/// replaced by a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    text: String,
}

impl Expression {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// SQL function call over raw fragments, `crc32(name)` style.
    pub fn function(name: &str, args: &[&str]) -> Self {
        Self {
            text: format!("{}({})", name, args.join(", ")),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// SQL fragment containing placeholders together with the bindings that
/// fill them, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpression {
    text: String,
    bindings: Vec<Binding>,
}

impl VariableExpression {
    pub fn new(text: impl Into<String>, bindings: Vec<Binding>) -> Self {
        Self {
            text: text.into(),
            bindings,
        }
    }

    /// SQL function call where each plain value argument becomes a `?`
    /// placeholder and nested expressions are spliced in place, their
    /// bindings following the same left-to-right order as the text.
    pub fn function(
        name: &str,
        args: impl IntoIterator<Item = impl Into<Operand>>,
    ) -> Result<Self, QuarryError> {
        let mut pieces = Vec::<String>::new();
        let mut bindings = Vec::new();
        for arg in args {
            match arg.into() {
                Operand::Value(value) => {
                    bindings.push(Binding::try_from(value)?);
                    pieces.push("?".into());
                }
                Operand::Expression(expression) => {
                    pieces.push(expression.text().into());
                }
                Operand::Variable(variable) => {
                    pieces.push(variable.text.clone());
                    bindings.extend(variable.bindings);
                }
            }
        }
        Ok(Self {
            text: format!("{}({})", name, pieces.join(", ")),
            bindings,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn into_parts(self) -> (String, Vec<Binding>) {
        (self.text, self.bindings)
    }
}

/// Right-hand side of a clause: a plain value bound through a
/// placeholder, or an expression spliced into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Expression(Expression),
    Variable(VariableExpression),
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Expression> for Operand {
    fn from(value: Expression) -> Self {
        Operand::Expression(value)
    }
}

impl From<VariableExpression> for Operand {
    fn from(value: VariableExpression) -> Self {
        Operand::Variable(value)
    }
}

macro_rules! impl_operand_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Operand {
                fn from(value: $source) -> Self {
                    Operand::Value(value.as_value())
                }
            }
        )*
    };
}
impl_operand_from!(
    bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String, serde_json::Value
);

impl<T: AsValue> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        Operand::Value(value.as_value())
    }
}

impl<T: AsValue> From<Vec<T>> for Operand {
    fn from(value: Vec<T>) -> Self {
        Operand::Value(value.as_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BindType;

    #[test]
    fn expression_function_splices_raw_arguments() {
        let expression = Expression::function("crc32", &["name"]);
        assert_eq!(expression.text(), "crc32(name)");
    }

    #[test]
    fn variable_expression_binds_plain_values() {
        let expression = VariableExpression::function("crc32", ["duck"]).unwrap();
        assert_eq!(expression.text(), "crc32(?)");
        assert_eq!(expression.bindings().len(), 1);
        assert_eq!(expression.bindings()[0].bind_type, BindType::Str);
        assert_eq!(expression.bindings()[0].value, Value::Text("duck".into()));
    }

    #[test]
    fn variable_expression_nests() {
        let inner = VariableExpression::function("floor", [7.55]).unwrap();
        let outer = VariableExpression::function("crc32", [inner]).unwrap();
        assert_eq!(outer.text(), "crc32(floor(?))");
        assert_eq!(outer.bindings().len(), 1);
        assert_eq!(outer.bindings()[0].value, Value::Float(7.55));
        assert_eq!(outer.bindings()[0].bind_type, BindType::Str);
    }

    #[test]
    fn variable_expression_separates_arguments() {
        let expression =
            VariableExpression::function("ifnull", [Operand::from("a"), Operand::from(1)])
                .unwrap();
        assert_eq!(expression.text(), "ifnull(?, ?)");
        assert_eq!(expression.bindings().len(), 2);
    }
}
