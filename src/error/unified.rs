//! Unified error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connect failure, DNS, reset connection.
    Unreachable,
    /// The remote answered with a non-success status.
    Rejected,
    /// A payload that could not be parsed.
    Malformed,
    /// Well-formed response that lacked the identifier we asked for.
    MissingIdentifier,
    Timeout,
    Stream,
    Configuration,
    Exhausted,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    SkipAndContinue,
    CheckCredentials,
    CheckConfiguration,
    IncreaseTimeout,
    GiveUp,
}
