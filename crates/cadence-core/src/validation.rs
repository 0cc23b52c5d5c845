//! # Parameter Validation
//!
//! Checks a model-issued argument object against a [`ToolSpecification`]
//! and produces a [`ValidatedCall`] with every declared argument coerced to
//! its primitive type.
//!
//! Validation is fail-fast: required fields are checked in declared order
//! and the first one missing is reported (an integer `page` is never
//! missing, it defaults to `0`), then properties are coerced in
//! declared order and the first one that does not fit is reported. The same
//! input therefore always yields the same error.
//!
//! Arguments a tool does not declare are dropped without error,
//! so a model that over-specifies a call is still served.

use crate::call::{Arguments, ValidatedCall};
use crate::error::{ExpectedType, ValidationError};
use crate::schema::{HEARTBEAT_FIELD, PAGE_FIELD, PropertyType, ToolSpecification};
use serde_json::{Number, Value};

/// Validate `raw` against `spec`.
///
/// # Example
///
/// ```rust
/// use cadence_core::{PropertyType, ToolSpecification, validate};
/// use serde_json::json;
///
/// let spec = ToolSpecification::builder("archival_memory_search", "Search archival memory")
///     .property("query", PropertyType::String, "String to search for.")
///     .property("page", PropertyType::Integer, "Page of results.")
///     .required("query")
///     .with_heartbeat()
///     .build();
///
/// let call = validate(&spec, &json!({"query": "sprint goals", "request_heartbeat": "true"}))
///     .expect("valid call");
///
/// assert_eq!(call.arguments()["page"], 0);
/// assert!(call.requests_heartbeat());
/// ```
pub fn validate(spec: &ToolSpecification, raw: &Value) -> Result<ValidatedCall, ValidationError> {
    let raw = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    if let Some(missing) = spec
        .required()
        .iter()
        .find(|field| !is_paging(spec, field) && is_absent(raw.get(field.as_str())))
    {
        return Err(ValidationError::MissingRequiredField {
            field: missing.clone(),
        });
    }

    let mut arguments = Arguments::new();
    for property in spec.properties() {
        let is_page = is_paging(spec, &property.name);

        let value = match raw.get(&property.name) {
            Some(value) if !value.is_null() => value,
            _ => {
                if is_page {
                    arguments.insert(property.name.clone(), Value::from(0));
                }
                continue;
            }
        };

        let coerced = coerce(property.kind, value).ok_or_else(|| ValidationError::InvalidType {
            field: property.name.clone(),
            expected: expected_for(property.kind),
        })?;

        if is_page && coerced.as_i64().is_some_and(|page| page < 0) {
            return Err(ValidationError::InvalidType {
                field: property.name.clone(),
                expected: ExpectedType::NonNegativeInteger,
            });
        }

        arguments.insert(property.name.clone(), coerced);
    }

    let request_heartbeat = match arguments.shift_remove(HEARTBEAT_FIELD) {
        Some(flag) => flag.as_bool().unwrap_or(false),
        None => false,
    };

    let dropped = spec.unrecognized(raw);
    if !dropped.is_empty() {
        tracing::trace!(tool = %spec.name(), ?dropped, "Dropping undeclared arguments");
    }

    Ok(ValidatedCall::new(
        spec.name().to_string(),
        arguments,
        request_heartbeat,
    ))
}

/// Coerce a JSON value to `kind`, or `None` if it does not fit.
pub fn coerce(kind: PropertyType, value: &Value) -> Option<Value> {
    match kind {
        PropertyType::String => coerce_string(value),
        PropertyType::Integer => coerce_integer(value).map(Value::from),
        PropertyType::Boolean => coerce_boolean(value).map(Value::Bool),
    }
}

fn coerce_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => integral(n),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    if n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn expected_for(kind: PropertyType) -> ExpectedType {
    match kind {
        PropertyType::String => ExpectedType::String,
        PropertyType::Integer => ExpectedType::Integer,
        PropertyType::Boolean => ExpectedType::Boolean,
    }
}

fn is_paging(spec: &ToolSpecification, field: &str) -> bool {
    field == PAGE_FIELD
        && spec
            .property(field)
            .is_some_and(|property| property.kind == PropertyType::Integer)
}

fn is_absent(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn two_required() -> ToolSpecification {
        ToolSpecification::builder("pair", "Needs a and b")
            .property("a", PropertyType::String, "")
            .property("b", PropertyType::String, "")
            .required_all(["a", "b"])
            .build()
    }

    fn paged_search() -> ToolSpecification {
        ToolSpecification::builder("conversation_search", "Search prior conversation history")
            .property("query", PropertyType::String, "String to search for.")
            .property("page", PropertyType::Integer, "Page of results.")
            .required("query")
            .with_heartbeat()
            .build()
    }

    fn send_message() -> ToolSpecification {
        ToolSpecification::builder("send_message", "Sends a message to the human user.")
            .property("message", PropertyType::String, "Message contents.")
            .required("message")
            .build()
    }

    #[test]
    fn first_missing_required_field_is_reported() {
        let err = validate(&two_required(), &json!({})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField { field: "a".into() }
        );
    }

    #[test]
    fn later_missing_field_reported_when_earlier_present() {
        let err = validate(&two_required(), &json!({ "a": "x" })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField { field: "b".into() }
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let err = validate(&two_required(), &json!({ "a": null, "b": "y" })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField { field: "a".into() }
        );
    }

    #[test]
    fn missing_field_wins_over_type_error() {
        let spec = ToolSpecification::builder("t", "")
            .property("n", PropertyType::Integer, "")
            .property("s", PropertyType::String, "")
            .required("s")
            .build();
        let err = validate(&spec, &json!({ "n": "not a number" })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField { field: "s".into() }
        );
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        assert_eq!(
            validate(&two_required(), &json!(["a", "b"])).unwrap_err(),
            ValidationError::NotAnObject
        );
    }

    #[test]
    fn page_defaults_to_zero() {
        let call = validate(
            &paged_search(),
            &json!({ "query": "standup", "request_heartbeat": true }),
        )
        .expect("valid");
        assert_eq!(call.arguments()["page"], json!(0));
    }

    #[test]
    fn negative_page_is_rejected() {
        let err = validate(
            &paged_search(),
            &json!({ "query": "standup", "page": -1, "request_heartbeat": true }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidType {
                field: "page".into(),
                expected: ExpectedType::NonNegativeInteger,
            }
        );
    }

    #[test]
    fn required_page_still_defaults_to_zero() {
        let spec = ToolSpecification::builder(
            "recall_memory_search",
            "Search prior conversation history",
        )
        .property("query", PropertyType::String, "String to search for.")
        .property("page", PropertyType::Integer, "Page of results.")
        .required_all(["query", "page"])
        .with_heartbeat()
        .build();

        let call = validate(&spec, &json!({ "query": "q", "request_heartbeat": true }))
            .expect("page is optional in practice");
        assert_eq!(call.arguments()["page"], json!(0));
    }

    #[test]
    fn required_string_page_is_not_defaulted() {
        let spec = ToolSpecification::builder("lookup", "")
            .property("page", PropertyType::String, "Wiki page title.")
            .required("page")
            .build();

        assert_eq!(
            validate(&spec, &json!({})).unwrap_err(),
            ValidationError::MissingRequiredField {
                field: "page".into()
            }
        );
    }

    #[test]
    fn heartbeat_declared_first_keeps_argument_order() {
        let spec = ToolSpecification::builder("t", "")
            .property("request_heartbeat", PropertyType::Boolean, "")
            .property("a", PropertyType::String, "")
            .property("b", PropertyType::String, "")
            .property("c", PropertyType::String, "")
            .build();

        let call = validate(
            &spec,
            &json!({ "request_heartbeat": true, "a": "1", "b": "2", "c": "3" }),
        )
        .expect("valid");

        let order: Vec<&str> = call.arguments().keys().map(String::as_str).collect();
        assert_eq!(order, ["a", "b", "c"]);
        assert!(call.requests_heartbeat());
    }

    #[test]
    fn page_from_string_is_coerced() {
        let call = validate(
            &paged_search(),
            &json!({ "query": "q", "page": "2", "request_heartbeat": false }),
        )
        .expect("valid");
        assert_eq!(call.arguments()["page"], json!(2));
    }

    #[test]
    fn undeclared_arguments_are_dropped() {
        let call = validate(
            &send_message(),
            &json!({ "message": "hi", "mood": "cheerful", "request_heartbeat": true }),
        )
        .expect("valid");

        assert_eq!(call.arguments().len(), 1);
        assert!(call.arguments().get("mood").is_none());
    }

    #[test]
    fn heartbeat_ignored_for_tools_without_the_property() {
        let call = validate(
            &send_message(),
            &json!({ "message": "hi", "request_heartbeat": true }),
        )
        .expect("valid");
        assert!(!call.requests_heartbeat());
    }

    #[test]
    fn heartbeat_is_required_when_declared_required() {
        let err = validate(&paged_search(), &json!({ "query": "q" })).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField {
                field: "request_heartbeat".into()
            }
        );
    }

    #[test]
    fn heartbeat_is_stripped_from_arguments() {
        let call = validate(
            &paged_search(),
            &json!({ "query": "q", "request_heartbeat": "TRUE" }),
        )
        .expect("valid");
        assert!(call.requests_heartbeat());
        assert!(!call.arguments().contains_key("request_heartbeat"));
    }

    #[test]
    fn wrong_heartbeat_type_is_rejected() {
        let err = validate(
            &paged_search(),
            &json!({ "query": "q", "request_heartbeat": "maybe" }),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidType {
                field: "request_heartbeat".into(),
                expected: ExpectedType::Boolean,
            }
        );
    }

    #[rstest]
    #[case(PropertyType::String, json!("KMS-1"), Some(json!("KMS-1")))]
    #[case(PropertyType::String, json!(42), Some(json!("42")))]
    #[case(PropertyType::String, json!(true), Some(json!("true")))]
    #[case(PropertyType::String, json!({"k": 1}), None)]
    #[case(PropertyType::Integer, json!(7), Some(json!(7)))]
    #[case(PropertyType::Integer, json!(7.0), Some(json!(7)))]
    #[case(PropertyType::Integer, json!(7.5), None)]
    #[case(PropertyType::Integer, json!(" 12 "), Some(json!(12)))]
    #[case(PropertyType::Integer, json!("twelve"), None)]
    #[case(PropertyType::Integer, json!(u64::MAX), None)]
    #[case(PropertyType::Integer, json!(false), None)]
    #[case(PropertyType::Boolean, json!(false), Some(json!(false)))]
    #[case(PropertyType::Boolean, json!("True"), Some(json!(true)))]
    #[case(PropertyType::Boolean, json!(1), None)]
    #[case(PropertyType::Boolean, json!([true]), None)]
    fn coercion_table(
        #[case] kind: PropertyType,
        #[case] input: Value,
        #[case] expected: Option<Value>,
    ) {
        assert_eq!(coerce(kind, &input), expected);
    }

    proptest! {
        /// Whatever subset of required fields is present, the error names the
        /// first absent one in declared order.
        #[test]
        fn prop_missing_field_is_first_absent(mask in prop::collection::vec(any::<bool>(), 1..8)) {
            let names: Vec<String> = (0..mask.len()).map(|i| format!("f{i}")).collect();
            let mut builder = ToolSpecification::builder("generated", "");
            for name in &names {
                builder = builder.property(name.clone(), PropertyType::String, "");
            }
            let spec = builder.required_all(names.clone()).build();

            let mut raw = serde_json::Map::new();
            for (name, present) in names.iter().zip(&mask) {
                if *present {
                    raw.insert(name.clone(), json!("v"));
                }
            }

            let result = validate(&spec, &Value::Object(raw));
            match mask.iter().position(|present| !present) {
                Some(first) => prop_assert_eq!(
                    result.unwrap_err(),
                    ValidationError::MissingRequiredField { field: names[first].clone() }
                ),
                None => prop_assert!(result.is_ok()),
            }
        }

        /// Any non-negative page is accepted and preserved.
        #[test]
        fn prop_non_negative_pages_pass(page in 0i64..i64::MAX) {
            let call = validate(
                &paged_search(),
                &json!({ "query": "q", "page": page, "request_heartbeat": false }),
            );
            prop_assert_eq!(call.unwrap().arguments()["page"].as_i64(), Some(page));
        }
    }
}
