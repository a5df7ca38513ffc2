//! Error types for the Factora client.
//!
//! Every fallible operation in this crate returns a [`ClientError`]. The
//! variants are deliberately aligned with the retry policy described in the
//! module docs of [`crate::transaction::confirm`]: only `TransientQuery` is
//! ever retried, and only inside the confirmation tracker. Everything else
//! is surfaced to the caller on first occurrence, because blind retries of
//! non-idempotent ledger operations risk double submission.

use thiserror::Error;

/// Errors that can occur while orchestrating protocol operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed local input detected before anything was submitted.
    /// Fatal, never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The matching application has not completed its setup call yet,
    /// so token ids required for escrow derivation do not exist.
    #[error("application is not configured: no created assets")]
    NotConfigured,

    /// The ledger or the external program rejected a submitted group.
    /// The whole group is void; nothing was partially applied.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// Confirmation was not observed within the round budget. Whether to
    /// resubmit is the caller's decision, not ours.
    #[error("transaction {txn_id} not confirmed after {rounds} rounds")]
    Timeout {
        /// The transaction id that was being tracked.
        txn_id: String,
        /// The round budget that was exhausted.
        rounds: u64,
    },

    /// An RPC query kept failing after the internal retry budget was spent.
    #[error("query failed after {attempts} attempts: {last}")]
    TransientQuery {
        /// Number of attempts made before giving up.
        attempts: usize,
        /// The last error message observed.
        last: String,
    },

    /// An expected global or local state key was absent. Call sites must
    /// decide whether absence is a fault or an expected protocol stage
    /// (see [`crate::state::StateReader::try_global`]).
    #[error("state key not found: {0}")]
    KeyNotFound(String),

    /// Template compilation failed. Fatal, never retried.
    #[error("template compilation failed: {0}")]
    Compile(String),

    /// A transport-level RPC failure outside the confirmation tracker.
    #[error("ledger rpc error: {0}")]
    Rpc(String),

    /// An on-ledger value could not be decoded as the requested type.
    #[error("malformed on-ledger state: {0}")]
    MalformedState(String),

    /// An address string or byte slice could not be parsed.
    #[error("invalid address: {0}")]
    AddressParse(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;
