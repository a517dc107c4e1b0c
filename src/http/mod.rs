//! HTTP surface of the proxy.
//!
//! # Data Flow
//! ```text
//! URL text from client
//!     → url.rs (split into host + path)
//!     → request.rs (minimal GET request for the origin)
//!     → [transport sends, receives raw response]
//!     → response.rs (framing check, failure replies)
//! ```
//!
//! # Design Decisions
//! - No header parsing on the relay path; origin bytes pass through untouched
//! - The only request the proxy ever emits is a bare GET with a HOST header

pub mod request;
pub mod response;
pub mod url;

pub use request::format_request;
pub use response::{failure_reply, is_complete_response, FailureReason, MAX_HEADER_BYTES};
pub use url::{parse_url, OriginRequest, UrlError};
