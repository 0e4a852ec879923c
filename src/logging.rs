//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::Error;

/// The number of characters of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";
const PASSWORD_FIELDS: [&str; 2] = ["password", "confirm_password"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and logged in full at the `debug` level.
///
/// Bearer tokens in the `Authorization` header and password fields in JSON
/// or form bodies are redacted before logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body_text) = match read_body(request.into_parts()).await {
        Ok(parts_and_body) => parts_and_body,
        Err(error) => return error.into_response(),
    };

    log_request(
        &parts.method,
        &parts.uri,
        &redact_headers(&parts.headers),
        &redact_body(&parts.headers, &body_text),
    );

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body_text) = match read_body(response.into_parts()).await {
        Ok(parts_and_body) => parts_and_body,
        Err(error) => return error.into_response(),
    };
    log_response(parts.status, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn read_body<P>((parts, body): (P, Body)) -> Result<(P, String), Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("could not read body for logging: {error}"))
        .map_err(|error| Error::InvalidRequest(error.to_string()))?;

    Ok((parts, String::from_utf8_lossy(&body_bytes).to_string()))
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut headers = headers.clone();

    if headers.contains_key(AUTHORIZATION) {
        headers.insert(AUTHORIZATION, HeaderValue::from_static(REDACTED));
    }

    headers
}

fn redact_body(headers: &HeaderMap, body_text: &str) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        match serde_json::from_str::<serde_json::Value>(body_text) {
            Ok(mut json) => {
                redact_json_passwords(&mut json);
                json.to_string()
            }
            Err(_) => body_text.to_owned(),
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        PASSWORD_FIELDS
            .iter()
            .fold(body_text.to_owned(), |text, field| {
                redact_form_field(&text, field)
            })
    } else {
        body_text.to_owned()
    }
}

fn redact_json_passwords(json: &mut serde_json::Value) {
    match json {
        serde_json::Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if PASSWORD_FIELDS.contains(&key.as_str()) {
                    *value = serde_json::Value::String(REDACTED.to_owned());
                } else {
                    redact_json_passwords(value);
                }
            }
        }
        serde_json::Value::Array(values) => values.iter_mut().for_each(redact_json_passwords),
        _ => {}
    }
}

fn redact_form_field(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == field_name => format!("{key}={REDACTED}"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if the
/// body is short enough to log in full.
fn truncate_body(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(index, _)| &body[..index])
}

fn log_request(
    method: &axum::http::Method,
    uri: &axum::http::Uri,
    headers: &HeaderMap,
    body: &str,
) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Received request: {method} {uri} {headers:?}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {method} {uri} {headers:?}\nbody: {body:?}"),
    }
}

fn log_response(status: axum::http::StatusCode, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {status}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {status}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{
        HeaderMap, HeaderValue,
        header::{AUTHORIZATION, CONTENT_TYPE},
    };

    use super::{LOG_BODY_LENGTH_LIMIT, redact_body, redact_form_field, redact_headers, truncate_body};

    fn headers_with_content_type(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn redacts_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));

        let redacted = redact_headers(&headers);

        assert_eq!(redacted.get(AUTHORIZATION).unwrap(), "********");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc.def");
    }

    #[test]
    fn redacts_nested_json_passwords() {
        let headers = headers_with_content_type("application/json");
        let body = r#"{"user":{"email":"a@b.c","password":"hunter2"}}"#;

        let redacted = redact_body(&headers, body);

        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("a@b.c"));
    }

    #[test]
    fn redacts_form_passwords() {
        let headers = headers_with_content_type("application/x-www-form-urlencoded");
        let body = "email=a%40b.c&password=hunter2&confirm_password=hunter2";

        let redacted = redact_body(&headers, body);

        assert_eq!(
            redacted,
            "email=a%40b.c&password=********&confirm_password=********"
        );
    }

    #[test]
    fn form_redaction_only_matches_whole_field_names() {
        let redacted = redact_form_field("old_password=x&password=y", "password");

        assert_eq!(redacted, "old_password=x&password=********");
    }

    #[test]
    fn leaves_other_bodies_alone() {
        let headers = headers_with_content_type("text/plain");

        assert_eq!(redact_body(&headers, "password=x"), "password=x");
    }

    #[test]
    fn truncates_long_bodies_on_char_boundaries() {
        let short = "a".repeat(LOG_BODY_LENGTH_LIMIT);
        let long = "é".repeat(LOG_BODY_LENGTH_LIMIT + 1);

        assert_eq!(truncate_body(&short), None);
        assert_eq!(
            truncate_body(&long).map(|text| text.chars().count()),
            Some(LOG_BODY_LENGTH_LIMIT)
        );
    }
}
