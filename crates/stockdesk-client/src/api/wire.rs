//! Response envelopes and error bodies as the backend sends them.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use stockdesk_core::{FieldErrors, User};

/// Body of a successful `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

/// What `POST /transaksi` answers with once unwrapped.
#[derive(Debug, Deserialize)]
pub struct CreatedTransaction {
    pub id: i64,
}

/// Error body: `{ message, errors: { field: [messages] } }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    /// Parses an error body, tolerating non-JSON responses.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.errors.clone().map(FieldErrors::from).unwrap_or_default()
    }
}

/// Strips `{ "data": ... }` wrappers.
///
/// Paginated lists arrive as `{ data: { data: [...] } }`, so unwrapping
/// repeats while the value is an object carrying a `data` key.
pub fn unwrap_data(mut value: Value) -> Value {
    loop {
        match value {
            Value::Object(mut map) if map.contains_key("data") => {
                value = map.remove("data").unwrap_or(Value::Null);
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_data_shapes() {
        assert_eq!(unwrap_data(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_data(json!({"data": {"id": 3}})), json!({"id": 3}));
        assert_eq!(
            unwrap_data(json!({"data": {"current_page": 1, "data": [{"id": 1}]}})),
            json!([{"id": 1}])
        );
    }

    #[test]
    fn test_error_body_tolerates_html() {
        let body = ErrorBody::parse("<html>502 Bad Gateway</html>");
        assert!(body.message().is_none());
        assert!(body.field_errors().is_empty());

        let body = ErrorBody::parse(r#"{"message":"Invalid login","errors":{"email":["wrong"]}}"#);
        assert_eq!(body.message(), Some("Invalid login"));
        assert_eq!(body.field_errors().get("email"), Some(&["wrong".to_string()][..]));
    }
}
