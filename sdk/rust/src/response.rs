//! Response envelope handling.
//!
//! Turns a status and raw body into either the `data` payload or a typed
//! [`SdkError`].

use gqlmap_core::RESULT_ALIAS;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{SdkError, SdkResult};

/// Top-level response object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQLError>>,
}

/// A GraphQL error reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<HashMap<String, Value>>,
}

/// Reads the response and returns its `data` member.
///
/// Server errors take precedence over any data that came with them.
pub(crate) fn read_data(status: StatusCode, body: &[u8]) -> SdkResult<Option<Value>> {
    if !status.is_success() {
        if let Ok(response) = serde_json::from_slice::<Response>(body) {
            if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
                return Err(server_error(errors));
            }
        }

        let text = String::from_utf8_lossy(body);
        return Err(SdkError::transport(format!(
            "received unexpected response status: {status}\nResponse body: {text}"
        ))
        .with_extension("status", status.as_u16())
        .with_extension("body", text.as_ref()));
    }

    let response: Response = serde_json::from_slice(body)
        .map_err(|err| SdkError::decode("failed to decode response body").with_source(err))?;

    if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
        return Err(server_error(errors));
    }

    Ok(response.data)
}

/// Decodes the whole `data` member.
pub(crate) fn decode_data<D: DeserializeOwned>(data: Option<Value>) -> SdkResult<D> {
    decode(data.unwrap_or(Value::Null))
}

/// Decodes `data.result`, where operation payloads are aliased.
pub(crate) fn decode_result<D: DeserializeOwned>(data: Option<Value>) -> SdkResult<D> {
    let result = match data {
        Some(Value::Object(mut fields)) => fields.remove(RESULT_ALIAS).unwrap_or(Value::Null),
        _ => Value::Null,
    };
    decode(result)
}

fn decode<D: DeserializeOwned>(value: Value) -> SdkResult<D> {
    serde_json::from_value(value)
        .map_err(|err| SdkError::decode("failed to decode response data").with_source(err))
}

fn server_error(errors: Vec<GraphQLError>) -> SdkError {
    let message = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    SdkError::server(message).with_extension("errors", &errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Dog {
        name: String,
    }

    #[test]
    fn test_success_returns_data() {
        let data = read_data(StatusCode::OK, br#"{"data":{"result":{"name":"rex"}}}"#).unwrap();
        let dog: Dog = decode_result(data).unwrap();
        assert_eq!(dog, Dog { name: "rex".into() });
    }

    #[test]
    fn test_errors_override_data() {
        let body = br#"{"data":{"result":{"name":"rex"}},"errors":[{"message":"first"},{"message":"second","path":["dog"]}]}"#;
        let err = read_data(StatusCode::OK, body).unwrap_err();
        assert_eq!(err.code, ErrorCode::Server);
        assert_eq!(err.message, "first\nsecond");
        assert_eq!(
            err.extension("errors").unwrap()[1]["path"],
            serde_json::json!(["dog"])
        );
    }

    #[test]
    fn test_error_without_message() {
        let err = read_data(StatusCode::OK, br#"{"errors":[{"msg":"boom"}]}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::Server);
        assert_eq!(err.message, "");
        assert!(err.extension("errors").is_some());
    }

    #[test]
    fn test_empty_errors_are_ignored() {
        let data = read_data(StatusCode::OK, br#"{"data":{"result":1},"errors":[]}"#).unwrap();
        assert_eq!(decode_result::<i32>(data).unwrap(), 1);
    }

    #[test]
    fn test_bad_status_with_envelope() {
        let err = read_data(
            StatusCode::BAD_REQUEST,
            br#"{"errors":[{"message":"Cannot query field \"x\""}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Server);
        assert_eq!(err.message, r#"Cannot query field "x""#);
    }

    #[test]
    fn test_bad_status_without_envelope() {
        let err = read_data(StatusCode::BAD_GATEWAY, b"upstream down").unwrap_err();
        assert_eq!(err.code, ErrorCode::Transport);
        assert_eq!(
            err.message,
            "received unexpected response status: 502 Bad Gateway\nResponse body: upstream down"
        );
        assert_eq!(err.extension("status"), Some(&serde_json::json!(502)));
        assert_eq!(err.extension("body"), Some(&serde_json::json!("upstream down")));
    }

    #[test]
    fn test_malformed_body() {
        let err = read_data(StatusCode::OK, b"<html>").unwrap_err();
        assert_eq!(err.code, ErrorCode::Decode);
        assert_eq!(err.message, "failed to decode response body");
        assert!(err.source.is_some());
    }

    #[test]
    fn test_decode_data_and_result() {
        let raw: HashMap<String, i32> = decode_data(Some(serde_json::json!({"a": 1}))).unwrap();
        assert_eq!(raw["a"], 1);

        let missing: Option<Dog> = decode_result(Some(serde_json::json!({}))).unwrap();
        assert!(missing.is_none());

        let err = decode_result::<Dog>(None).unwrap_err();
        assert_eq!(err.code, ErrorCode::Decode);
    }
}
