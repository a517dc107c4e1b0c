//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap outbound calls with a deadline
//! - Turn an elapsed deadline into an ordinary `TimedOut` I/O error
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors by their `ErrorKind`

use std::future::Future;
use std::io;
use std::time::Duration;

/// Run `operation`, failing with `ErrorKind::TimedOut` after `deadline`.
pub async fn with_deadline<F, T>(deadline: Duration, operation: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("operation timed out after {:?}", deadline),
        )),
    }
}
