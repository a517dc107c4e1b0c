//! Origin-facing request formatting.

use super::OriginRequest;

/// Build the request sent to the origin.
///
/// Exactly a request line and a `HOST` header; nothing else is added.
pub fn format_request(host: &str, path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nHOST: {host}\r\n\r\n")
}

impl OriginRequest {
    /// Request text for this origin request.
    pub fn to_request_text(&self) -> String {
        format_request(&self.host, &self.path)
    }
}
