/*============================================================
  Synavera Project: Syn-Get
  Module: synget_core::response
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Build JSON responses: the `Data` envelope, the error
    envelope, and the header set every response carries.

  Security / Safety Notes:
    Error messages are produced by Syn-Get itself; request
    content is never reflected into headers.

  Dependencies:
    serde + serde_json for body encoding.

  Operational Scope:
    Used by the dispatcher; converted to HTTP responses by the
    server boundary.

  Revision History:
    2026-10-17 COD  Authored response envelopes.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Every response is well-formed JSON
    - Header precedence is explicit and ordered
============================================================*/

use serde::Serialize;

use crate::error::ApiErrorCode;

pub type Headers = Vec<(String, String)>;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const FALLBACK_BODY: &str =
    r#"{"ErrorCode":"ServerError","Message":"Failed to encode response body"}"#;

/// Transport-neutral response produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Case-insensitive header lookup.
    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DataEnvelope<'a, T: Serialize> {
    data: &'a T,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorEnvelope<'a> {
    error_code: &'a str,
    message: &'a str,
}

/// Merge `overrides` into `base`. Base order is kept; an override replaces
/// a base header of the same name in place, new names are appended.
pub fn merge_headers(base: &[(String, String)], overrides: &[(String, String)]) -> Headers {
    let mut merged: Headers = base.to_vec();
    for (name, value) in overrides {
        match merged
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.1 = value.clone(),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

/// Response factory carrying the headers shared by every response.
#[derive(Debug, Clone)]
pub struct Envelope {
    base_headers: Headers,
}

impl Envelope {
    pub fn new(cache_max_age: u64) -> Self {
        Self {
            base_headers: vec![
                ("content-type".into(), JSON_CONTENT_TYPE.into()),
                (
                    "cache-control".into(),
                    format!("public, max-age={cache_max_age}"),
                ),
            ],
        }
    }

    /// Serialize `body` with the given status and header overrides.
    pub fn json<T: Serialize>(
        &self,
        body: &T,
        status: u16,
        overrides: &[(String, String)],
    ) -> ApiResponse {
        let headers = merge_headers(&self.base_headers, overrides);
        match serde_json::to_vec(body) {
            Ok(bytes) => ApiResponse {
                status,
                headers,
                body: bytes,
            },
            Err(_) => ApiResponse {
                status: ApiErrorCode::ServerError.status(),
                headers,
                body: FALLBACK_BODY.as_bytes().to_vec(),
            },
        }
    }

    /// `200` with `{"Data": payload}`.
    pub fn data<T: Serialize>(&self, payload: &T) -> ApiResponse {
        self.json(&DataEnvelope { data: payload }, 200, &[])
    }

    pub fn error(&self, code: ApiErrorCode, message: &str) -> ApiResponse {
        self.json(
            &ErrorEnvelope {
                error_code: code.as_str(),
                message,
            },
            code.status(),
            &[],
        )
    }

    pub fn not_found(&self, message: &str) -> ApiResponse {
        self.error(ApiErrorCode::NotFound, message)
    }

    #[cfg(test)]
    pub fn server_error(&self, message: &str) -> ApiResponse {
        self.error(ApiErrorCode::ServerError, message)
    }
}
