//! Convert serde_json::Value to scalars that sqlx can bind for MySQL.

use crate::error::AppError;
use serde_json::Value;

/// A value that can be bound to a MySQL query.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl BindValue {
    /// Arrays and objects have no column representation and are rejected.
    pub fn from_json(key: &str, v: &Value) -> Result<Self, AppError> {
        Ok(match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => BindValue::I64(i),
                None => BindValue::F64(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => BindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => {
                return Err(AppError::BadRequest(format!("Invalid data type for: {}", key)))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_convert() {
        assert_eq!(BindValue::from_json("a", &json!(7)).unwrap(), BindValue::I64(7));
        assert_eq!(BindValue::from_json("a", &json!(1.5)).unwrap(), BindValue::F64(1.5));
        assert_eq!(BindValue::from_json("a", &json!("x")).unwrap(), BindValue::String("x".into()));
        assert_eq!(BindValue::from_json("a", &json!(null)).unwrap(), BindValue::Null);
        assert_eq!(BindValue::from_json("a", &json!(true)).unwrap(), BindValue::Bool(true));
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = BindValue::from_json("tags", &json!(["a"])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Invalid data type for: tags"));
        assert!(BindValue::from_json("meta", &json!({"k": 1})).is_err());
    }
}
