use crate::Value;
use std::collections::BTreeMap;

/// Conversion of plain Rust values into the [`Value`] binding domain.
pub trait AsValue {
    fn as_value(self) -> Value;
}

macro_rules! impl_as_value {
    ($source:ty, $into:path) => {
        impl AsValue for $source {
            fn as_value(self) -> Value {
                $into(self.into())
            }
        }
    };
}

impl_as_value!(bool, Value::Bool);
impl_as_value!(i8, Value::Int);
impl_as_value!(i16, Value::Int);
impl_as_value!(i32, Value::Int);
impl_as_value!(i64, Value::Int);
impl_as_value!(u8, Value::Int);
impl_as_value!(u16, Value::Int);
impl_as_value!(u32, Value::Int);
impl_as_value!(f32, Value::Float);
impl_as_value!(f64, Value::Float);
impl_as_value!(&str, Value::Text);
impl_as_value!(String, Value::Text);

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(self) -> Value {
        Value::List(self.into_iter().map(AsValue::as_value).collect())
    }
}

impl AsValue for BTreeMap<String, Value> {
    fn as_value(self) -> Value {
        Value::Map(self)
    }
}

impl AsValue for serde_json::Value {
    fn as_value(self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(v) => {
                Value::List(v.into_iter().map(AsValue::as_value).collect())
            }
            serde_json::Value::Object(m) => {
                Value::Map(m.into_iter().map(|(k, v)| (k, v.as_value())).collect())
            }
        }
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}
