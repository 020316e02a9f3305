//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialise every field as optional so a missing field
//! yields the endpoint's own message instead of a serde error.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes carried in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for wire field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Whether a request field carries a usable value.
///
/// Text is trimmed before the blank check; numbers and booleans only count
/// as missing when absent.
pub(crate) trait Provided {
    fn is_provided(&self) -> bool;
}

impl Provided for Option<String> {
    fn is_provided(&self) -> bool {
        self.as_deref().is_some_and(|value| !value.trim().is_empty())
    }
}

impl Provided for Option<i64> {
    fn is_provided(&self) -> bool {
        self.is_some()
    }
}

/// Collects the names of missing request fields.
///
/// # Examples
/// ```ignore
/// RequiredFields::default()
///     .check(EMAIL, &payload.email)
///     .check(PASSWORD, &payload.password)
///     .finish("Please provide email and password")?;
/// ```
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn check(mut self, field: FieldName, value: &impl Provided) -> Self {
        if !value.is_provided() {
            self.missing.push(field.as_str());
        }
        self
    }

    /// Fail with `message` when any checked field was missing.
    pub(crate) fn finish(self, message: &'static str) -> Result<(), Error> {
        if self.missing.is_empty() {
            return Ok(());
        }
        Err(Error::invalid_request(message).with_details(json!({
            "fields": self.missing,
            "code": ErrorCode::MissingField.as_str(),
        })))
    }
}

/// Wrap a domain validation failure, naming the offending field.
pub(crate) fn invalid_field_error(field: FieldName, err: impl std::fmt::Display) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

/// Treat blank query parameters as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode as DomainCode;

    const EMAIL: FieldName = FieldName::new("email");
    const PASSWORD: FieldName = FieldName::new("password");

    #[rstest]
    fn blank_and_absent_fields_are_listed() {
        let email = Some("  ".to_owned());
        let password: Option<String> = None;
        let err = RequiredFields::default()
            .check(EMAIL, &email)
            .check(PASSWORD, &password)
            .finish("Please provide email and password")
            .expect_err("missing fields");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(err.message(), "Please provide email and password");
        assert_eq!(
            err.details(),
            Some(&json!({"fields": ["email", "password"], "code": "missing_field"}))
        );
    }

    #[rstest]
    fn provided_fields_pass() {
        let email = Some("ada@example.com".to_owned());
        let rating = Some(0_i64);
        let checked = RequiredFields::default()
            .check(EMAIL, &email)
            .check(FieldName::new("rating"), &rating)
            .finish("unused");
        assert!(checked.is_ok());
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ", true)]
    #[case("swap-1", false)]
    fn uuids_are_parsed_with_field_context(#[case] raw: &str, #[case] ok: bool) {
        let result = parse_uuid(raw, FieldName::new("id"));
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert_eq!(err.message(), "id must be a valid UUID");
        }
    }

    #[rstest]
    fn blank_query_values_are_dropped() {
        assert_eq!(non_blank(Some("   ".to_owned())), None);
        assert_eq!(non_blank(Some("ada".to_owned())), Some("ada".to_owned()));
    }
}
