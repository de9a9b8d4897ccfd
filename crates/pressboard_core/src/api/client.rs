//! Blocking JSON client.

use crate::api::{ApiError, ApiResult};
use crate::config::ApiConfig;
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

const MAX_ERROR_BODY_CHARS: usize = 200;
const ERROR_MESSAGE_FIELDS: [&str; 3] = ["message", "detail", "error"];

/// Shared handle to the press API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    /// Builds a client from config.
    ///
    /// # Errors
    /// - Returns `ApiError::Http` when the TLS backend cannot be initialized.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {path}?{query}` decoded as `T`.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let request = self.http.get(self.endpoint(path)).query(query);
        decode(self.send("GET", path, request)?)
    }

    /// `PUT {path}` with a JSON body, decoded as `T`.
    pub fn put_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.endpoint(path)).json(body);
        decode(self.send("PUT", path, request)?)
    }

    /// `POST {path}` with a JSON body, decoded as `T`.
    pub fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.endpoint(path)).json(body);
        decode(self.send("POST", path, request)?)
    }

    /// `DELETE {path}`; any 2xx body is ignored.
    pub fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.http.delete(self.endpoint(path));
        self.send("DELETE", path, request).map(|_| ())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, method: &str, path: &str, request: RequestBuilder) -> ApiResult<Response> {
        let request = match self.auth_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().map_err(|err| {
            warn!(
                "event=api_request module=api status=error method={method} path={path} kind=transport timeout={}",
                err.is_timeout()
            );
            ApiError::from(err)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(
                "event=api_request module=api status=ok method={method} path={path} http_status={}",
                status.as_u16()
            );
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        warn!(
            "event=api_request module=api status=error method={method} path={path} http_status={}",
            status.as_u16()
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message_from_body(status, &body),
        })
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let body = response.text()?;
    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Picks the message shown to the user for a failed request.
///
/// Order: first non-blank `message|detail|error` string in a JSON object
/// body, then the raw body (single line, capped), then the status reason.
pub fn error_message_from_body(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(body) {
        for key in ERROR_MESSAGE_FIELDS {
            if let Some(text) = fields.get(key).and_then(|value| value.as_str()) {
                if !text.trim().is_empty() {
                    return text.trim().to_string();
                }
            }
        }
    }

    let single_line = body.replace(['\n', '\r'], " ");
    let trimmed = single_line.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<') {
        let mut message = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>();
        if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
            message.push_str("...");
        }
        return message;
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::error_message_from_body;
    use reqwest::StatusCode;

    #[test]
    fn prefers_structured_message_fields() {
        let body = r#"{"statusCode":400,"message":"  Ciclo inválido ","error":"Bad Request"}"#;
        assert_eq!(
            error_message_from_body(StatusCode::BAD_REQUEST, body),
            "Ciclo inválido"
        );
        assert_eq!(
            error_message_from_body(StatusCode::BAD_REQUEST, r#"{"detail":"nope"}"#),
            "nope"
        );
    }

    #[test]
    fn falls_back_to_plain_body_then_reason() {
        assert_eq!(
            error_message_from_body(StatusCode::BAD_GATEWAY, "upstream\ndown"),
            "upstream down"
        );
        assert_eq!(
            error_message_from_body(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
        assert_eq!(
            error_message_from_body(StatusCode::NOT_FOUND, "<html>404</html>"),
            "Not Found"
        );
        assert_eq!(
            error_message_from_body(StatusCode::CONFLICT, r#"{"code":7}"#),
            "Conflict"
        );
    }

    #[test]
    fn caps_long_plain_bodies() {
        let body = "x".repeat(500);
        let message = error_message_from_body(StatusCode::BAD_REQUEST, &body);
        assert!(message.ends_with("..."));
        assert_eq!(message.chars().count(), 203);
    }
}
