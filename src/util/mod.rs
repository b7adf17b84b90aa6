//! Utility modules: retry policy, timeout.

pub mod retry;
pub mod timeout;
