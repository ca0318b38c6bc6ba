//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network — the caller (host) is responsible for executing
//! the actual I/O. Auth headers, TLS, timeouts, and retries all belong to the
//! host's transport, which keeps the core deterministic and easy to test.
//!
//! Query parameters are kept structured rather than baked into the path so
//! tests can assert on them individually; `HttpRequest::url` renders the
//! final form for executors.

use std::fmt;

/// HTTP method for a request. The Bamboo surface in scope uses no others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `BambooClient::build_*` methods. The caller is responsible for
/// executing this request against the network and returning the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Render the full request URL, appending the query string when present.
    ///
    /// Query values here are fixed tokens (`10000`, `branches`) and resource
    /// keys are part of `path`, so no percent-encoding is applied.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// to `BambooClient::parse_*` methods for status interpretation and
/// deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Status line text for error messages, e.g. `404 Not Found`.
    ///
    /// Codes outside the small set this API emits fall back to the bare
    /// number.
    pub fn status_text(&self) -> String {
        let reason = match self.status {
            200 => "OK",
            204 => "No Content",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => return self.status.to_string(),
        };
        format!("{} {}", self.status, reason)
    }
}
