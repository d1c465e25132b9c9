//! Optional-field access over untyped JSON documents
//!
//! The College Scorecard API returns deeply nested objects where any level may
//! be missing or `null`. Instead of chaining `get` calls and guard clauses at
//! every use site, callers resolve a dotted path once and match on a [`Field`]
//! that distinguishes the three states that matter downstream:
//!
//! - [`Field::Value`]: the key exists and holds a non-null value
//! - [`Field::Null`]: the key exists and holds `null`
//! - [`Field::Absent`]: the key (or one of its parents) is missing
//!
//! A `null` parent is treated the same as a missing one. A parent that holds a
//! scalar or an array where an object is expected is a type mismatch and is
//! reported as [`ShapeError::UnexpectedType`].

use serde_json::{Number, Value};

use crate::results::ShapeError;

static NULL: Value = Value::Null;

/// Resolution of a dotted path inside a JSON document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Value(&'a Value),
    Null,
    Absent,
}

/// Resolve `path` (segments separated by `.`) starting at `doc`
///
/// An empty path resolves to `doc` itself.
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Result<Field<'a>, ShapeError> {
    let mut current = doc;
    let mut walked = String::new();

    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let object = match current {
            Value::Object(map) => map,
            Value::Null => return Ok(Field::Absent),
            _ => {
                return Err(ShapeError::UnexpectedType {
                    path: if walked.is_empty() {
                        "<root>".to_string()
                    } else {
                        walked
                    },
                    expected: "object",
                })
            }
        };

        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        match object.get(segment) {
            Some(next) => current = next,
            None => return Ok(Field::Absent),
        }
    }

    Ok(match current {
        Value::Null => Field::Null,
        value => Field::Value(value),
    })
}

impl<'a> Field<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    /// The value, or `None` for both `null` and a missing key
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Field::Value(value) => Some(value),
            Field::Null | Field::Absent => None,
        }
    }

    /// Require a non-null value
    pub fn required(self, path: &str) -> Result<&'a Value, ShapeError> {
        self.value().ok_or_else(|| ShapeError::MissingField {
            path: path.to_string(),
        })
    }

    /// Require a key to exist, passing `null` through untouched
    pub fn present(self, path: &str) -> Result<&'a Value, ShapeError> {
        match self {
            Field::Value(value) => Ok(value),
            Field::Null => Ok(&NULL),
            Field::Absent => Err(ShapeError::MissingField {
                path: path.to_string(),
            }),
        }
    }

    /// Require a non-null string
    pub fn required_str(self, path: &str) -> Result<&'a str, ShapeError> {
        self.required(path)?
            .as_str()
            .ok_or_else(|| ShapeError::UnexpectedType {
                path: path.to_string(),
                expected: "string",
            })
    }

    /// A number when present, `None` for `null` or a missing key
    pub fn optional_number(self, path: &str) -> Result<Option<&'a Number>, ShapeError> {
        match self {
            Field::Value(Value::Number(n)) => Ok(Some(n)),
            Field::Value(_) => Err(ShapeError::UnexpectedType {
                path: path.to_string(),
                expected: "number",
            }),
            Field::Null | Field::Absent => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_value() {
        let doc = json!({"latest": {"cost": {"tuition": {"in_state": 12076}}}});
        let field = lookup(&doc, "latest.cost.tuition.in_state").unwrap();
        assert_eq!(field, Field::Value(&json!(12076)));
    }

    #[test]
    fn test_lookup_explicit_null() {
        let doc = json!({"earnings": {"1_yr": {"overall_median_earnings": null}}});
        let field = lookup(&doc, "earnings.1_yr.overall_median_earnings").unwrap();
        assert_eq!(field, Field::Null);
    }

    #[test]
    fn test_lookup_missing_leaf() {
        let doc = json!({"earnings": {"1_yr": {}}});
        let field = lookup(&doc, "earnings.1_yr.overall_median_earnings").unwrap();
        assert!(field.is_absent());
    }

    #[test]
    fn test_lookup_missing_parent() {
        let doc = json!({"latest": {}});
        let field = lookup(&doc, "latest.cost.tuition.out_of_state").unwrap();
        assert!(field.is_absent());
    }

    #[test]
    fn test_lookup_null_parent_is_absent() {
        let doc = json!({"latest": {"cost": null}});
        let field = lookup(&doc, "latest.cost.tuition.in_state").unwrap();
        assert!(field.is_absent());
    }

    #[test]
    fn test_lookup_scalar_parent_is_type_error() {
        let doc = json!({"latest": {"cost": "unknown"}});
        let err = lookup(&doc, "latest.cost.tuition").unwrap_err();
        assert_eq!(
            err,
            ShapeError::UnexpectedType {
                path: "latest.cost".to_string(),
                expected: "object",
            }
        );
    }

    #[test]
    fn test_lookup_empty_path_returns_root() {
        let doc = json!({"a": 1});
        assert_eq!(lookup(&doc, "").unwrap(), Field::Value(&doc));
    }

    #[test]
    fn test_present_passes_null_through() {
        let doc = json!({"sat_scores": null});
        let value = lookup(&doc, "sat_scores")
            .unwrap()
            .present("sat_scores")
            .unwrap();
        assert_eq!(value, &Value::Null);
    }

    #[test]
    fn test_required_rejects_null() {
        let doc = json!({"admissions": null});
        let err = lookup(&doc, "admissions")
            .unwrap()
            .required("latest.admissions")
            .unwrap_err();
        assert_eq!(
            err,
            ShapeError::MissingField {
                path: "latest.admissions".to_string()
            }
        );
    }

    #[test]
    fn test_required_str_type_mismatch() {
        let doc = json!({"title": 42});
        let err = lookup(&doc, "title")
            .unwrap()
            .required_str("title")
            .unwrap_err();
        assert!(matches!(err, ShapeError::UnexpectedType { expected: "string", .. }));
    }

    #[test]
    fn test_optional_number() {
        let doc = json!({"a": 10, "b": null, "c": "ten"});
        assert_eq!(
            lookup(&doc, "a").unwrap().optional_number("a").unwrap(),
            Some(&Number::from(10))
        );
        assert_eq!(lookup(&doc, "b").unwrap().optional_number("b").unwrap(), None);
        assert_eq!(lookup(&doc, "z").unwrap().optional_number("z").unwrap(), None);
        assert!(lookup(&doc, "c").unwrap().optional_number("c").is_err());
    }
}
