//! Origin response framing and client-facing failure replies.
//!
//! # Responsibilities
//! - Detect a complete response from its `Content-Length` header
//! - Build the reply a client receives when its transaction fails
//!
//! # Design Decisions
//! - Framing never rewrites bytes; it only decides when reading may stop
//! - The default failure reply is empty so clients cannot tell failures apart

use std::fmt;

use crate::config::FailureReporting;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Why a transaction ended without relaying an origin response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The client sent nothing within the idle window.
    EmptyRequest,
    /// The client's URL could not be split into host and path.
    MalformedUrl,
    /// The origin could not be reached.
    OriginUnreachable,
    /// The request could not be written to the origin.
    OriginSendFailed,
    /// The origin sent nothing within the idle window.
    EmptyOriginResponse,
}

impl FailureReason {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::EmptyRequest => "empty_request",
            FailureReason::MalformedUrl => "malformed_url",
            FailureReason::OriginUnreachable => "origin_unreachable",
            FailureReason::OriginSendFailed => "origin_send_failed",
            FailureReason::EmptyOriginResponse => "empty_origin_response",
        }
    }

    /// Status line parts used when failures are reported with a status.
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            FailureReason::EmptyRequest | FailureReason::MalformedUrl => (400, "Bad Request"),
            FailureReason::OriginUnreachable | FailureReason::OriginSendFailed => {
                (502, "Bad Gateway")
            }
            FailureReason::EmptyOriginResponse => (504, "Gateway Timeout"),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            FailureReason::EmptyRequest => "No URL was received",
            FailureReason::MalformedUrl => "The requested URL is malformed",
            FailureReason::OriginUnreachable => "Couldn't connect to the origin",
            FailureReason::OriginSendFailed => "Couldn't send the request to the origin",
            FailureReason::EmptyOriginResponse => "The origin sent no response",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Bytes sent to a client whose transaction failed.
pub fn failure_reply(reporting: FailureReporting, reason: FailureReason) -> Vec<u8> {
    match reporting {
        FailureReporting::Empty => Vec::new(),
        FailureReporting::Status => {
            let (code, text) = reason.status();
            let body = reason.to_string();
            format!(
                "HTTP/1.1 {code} {text}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .into_bytes()
        }
    }
}

/// Longest header block searched for a `Content-Length`.
pub const MAX_HEADER_BYTES: usize = 16 * 1024;

/// Whether `buf` holds a full response according to its `Content-Length`.
///
/// Returns `false` when the header block is incomplete, longer than
/// [`MAX_HEADER_BYTES`], or carries no usable `Content-Length`, leaving the
/// caller to fall back on idle framing.
pub fn is_complete_response(buf: &[u8]) -> bool {
    let scanned = &buf[..buf.len().min(MAX_HEADER_BYTES)];
    let Some(header_end) = scanned
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
    else {
        return false;
    };

    let Ok(head) = std::str::from_utf8(&buf[..header_end]) else {
        return false;
    };

    let content_length = head.split("\r\n").skip(1).find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse::<usize>().ok()
        } else {
            None
        }
    });

    match content_length {
        Some(length) => buf.len() >= header_end + HEADER_TERMINATOR.len() + length,
        None => false,
    }
}
