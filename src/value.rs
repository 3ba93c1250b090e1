use std::collections::BTreeMap;

/// Runtime value carried by a parameter binding or a result row cell.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(..) => "bool",
            Value::Int(..) => "int",
            Value::Float(..) => "float",
            Value::Text(..) => "text",
            Value::Blob(..) => "blob",
            Value::List(..) => "list",
            Value::Map(..) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// JSON text representation, used as the fallback encoding when a
    /// composite value is bound as a statement parameter.
    pub fn to_json(&self) -> String {
        serde_json::Value::from(self).to_string()
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => (*v).into(),
            Value::Int(v) => (*v).into(),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(Into::into)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(v) => v.clone().into(),
            Value::Blob(v) => v.iter().map(|b| serde_json::Value::from(*b)).collect(),
            Value::List(v) => v.iter().map(serde_json::Value::from).collect(),
            Value::Map(v) => serde_json::Value::Object(
                v.iter().map(|(k, v)| (k.clone(), v.into())).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AsValue;

    #[test]
    fn value_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(25), Value::Int(25));
        assert_eq!(Value::from(13.5), Value::Float(13.5));
        assert_eq!(Value::from("tech"), Value::Text("tech".into()));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(7_i64)), Value::Int(7));
        assert_eq!(
            Value::from(vec![19, 29]),
            Value::List(vec![Value::Int(19), Value::Int(29)])
        );
    }

    #[test]
    fn value_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"key":"value","nested":{"something":true},"ttl":123}"#)
                .unwrap();
        let value = json.clone().as_value();
        let Value::Map(map) = &value else {
            panic!("expected a map, got {value:?}");
        };
        assert_eq!(map.get("key"), Some(&Value::Text("value".into())));
        assert_eq!(map.get("ttl"), Some(&Value::Int(123)));
        assert_eq!(serde_json::Value::from(&value), json);
    }

    #[test]
    fn json_text_round_trip() {
        let value = Value::Map(
            [
                ("key".to_string(), Value::Text("value".into())),
                (
                    "nested".to_string(),
                    Value::Map([("something".to_string(), Value::Bool(true))].into()),
                ),
                ("ttl".to_string(), Value::Int(123)),
            ]
            .into(),
        );
        let decoded: serde_json::Value = serde_json::from_str(&value.to_json()).unwrap();
        assert_eq!(decoded.as_value(), value);
    }
}
