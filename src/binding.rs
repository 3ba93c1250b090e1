use crate::{QuarryError, Value};

/// Parameter type tag handed to the driver alongside the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindType {
    Null,
    Bool,
    Int,
    Str,
}

/// One positional statement parameter: the value plus its inferred type tag.
///
/// The tag is inferred once, when the binding is created; composite values
/// (lists, maps) fall back to their JSON text with the string tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub bind_type: BindType,
}

impl Binding {
    pub fn new(value: Value, bind_type: BindType) -> Self {
        Self { value, bind_type }
    }
}

impl TryFrom<Value> for Binding {
    type Error = QuarryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let bind_type = match &value {
            Value::Null => BindType::Null,
            Value::Bool(..) => BindType::Bool,
            Value::Int(..) => BindType::Int,
            Value::Float(..) | Value::Text(..) => BindType::Str,
            Value::List(..) | Value::Map(..) => {
                return Ok(Binding::new(Value::Text(value.to_json()), BindType::Str));
            }
            Value::Blob(..) => {
                return Err(QuarryError::UnrecognizedBindingType(value.type_name()));
            }
        };
        Ok(Binding::new(value, bind_type))
    }
}
