//! # Document Shape Validation
//!
//! Minimal structural checks applied before a document is persisted.
//!
//! | Document       | Rule                                              |
//! |----------------|---------------------------------------------------|
//! | `environments` | object containing an `environments` key           |
//! | `releases`     | object (keyed by environment name)                |
//! | `holidays`     | object containing a `holidays` key                |
//! | anything else  | always passes                                     |
//!
//! The checks are deliberately shallow: entry-level fields (dates, status
//! values, ...) are the client's business.

use relcal_core::DocumentName;
use serde_json::Value;
use thiserror::Error;

/// A document failed its shape check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The top-level value is not a JSON object.
    #[error("{document} must be an object{hint}")]
    NotAnObject {
        /// File name of the document, e.g. `releases.json`.
        document: String,
        /// Extra description appended to the message.
        hint: &'static str,
    },

    /// A required top-level key is missing.
    #[error("{document} is missing the {key} array")]
    MissingKey {
        /// File name of the document.
        document: String,
        /// The missing key.
        key: &'static str,
    },
}

/// Validate a parsed document against the rule for its name.
pub fn validate(name: &DocumentName, value: &Value) -> Result<(), SchemaError> {
    match name.as_str() {
        DocumentName::ENVIRONMENTS => require_key(name, value, "environments"),
        DocumentName::HOLIDAYS => require_key(name, value, "holidays"),
        DocumentName::RELEASES => {
            require_object(name, value, " keyed by environment")?;
            Ok(())
        }
        _ => Ok(()),
    }
}

fn require_object<'v>(
    name: &DocumentName,
    value: &'v Value,
    hint: &'static str,
) -> Result<&'v serde_json::Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| SchemaError::NotAnObject {
        document: name.file_name(),
        hint,
    })
}

fn require_key(name: &DocumentName, value: &Value, key: &'static str) -> Result<(), SchemaError> {
    let object = require_object(name, value, "")?;
    if !object.contains_key(key) {
        return Err(SchemaError::MissingKey {
            document: name.file_name(),
            key,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(n: &str) -> DocumentName {
        DocumentName::new(n).unwrap()
    }

    #[test]
    fn environments_requires_object_with_key() {
        let name = DocumentName::environments();
        assert!(validate(&name, &json!({"environments": []})).is_ok());
        assert_eq!(
            validate(&name, &json!({"notEnvironments": []})),
            Err(SchemaError::MissingKey {
                document: "environments.json".into(),
                key: "environments"
            })
        );
        assert!(matches!(
            validate(&name, &json!([])),
            Err(SchemaError::NotAnObject { .. })
        ));
    }

    #[test]
    fn environments_key_content_is_not_inspected() {
        let name = DocumentName::environments();
        assert!(validate(&name, &json!({"environments": "anything"})).is_ok());
    }

    #[test]
    fn releases_requires_object_only() {
        let name = DocumentName::releases();
        assert!(validate(&name, &json!({})).is_ok());
        assert!(validate(&name, &json!({"staging": [{"date": "2025-04-15"}]})).is_ok());
        let err = validate(&name, &json!(["staging"])).unwrap_err();
        assert_eq!(err.to_string(), "releases.json must be an object keyed by environment");
    }

    #[test]
    fn holidays_requires_object_with_key() {
        let name = DocumentName::holidays();
        assert!(validate(&name, &json!({"holidays": []})).is_ok());
        let err = validate(&name, &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "holidays.json is missing the holidays array");
        assert!(validate(&name, &json!("holidays")).is_err());
    }

    #[test]
    fn unknown_documents_always_pass() {
        let name = named("notes");
        for v in [json!(null), json!(1), json!([]), json!({})] {
            assert!(validate(&name, &v).is_ok());
        }
    }
}
