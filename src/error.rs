//! Shared error classification.
//!
//! Every module error implements [`ErrorCode`] so handlers and logs can
//! report a stable code alongside the human-readable message, and so the
//! generation pipeline can decide whether a failure is worth retrying.

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
