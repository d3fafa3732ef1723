//! Error types for `cophy-core`.
//!
//! Every error carries a stable machine-readable code for programmatic
//! handling (e.g. a `--json` CLI surface) in addition to a human message.
//!
//! # Error Code Ranges
//!
//! | Range | Category                          |
//! |-------|-----------------------------------|
//! | E1xxx | Input validation (host/associate) |
//! | E2xxx | History validation                |
//! | E3xxx | Internal                          |

use std::fmt;

/// Failure while validating a [`crate::event::Reconciliation`] before the
/// recurrence is allowed to run.
///
/// `InvalidInput` fails fast: the recurrence itself never raises errors,
/// it represents impossible subproblems with the semiring's `null`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CophyError {
    /// The host tree has a node with neither 0 nor 2 children.
    #[error("[E1001] host tree is not binary (at host {host:?})")]
    HostTreeNotBinary {
        /// Name of the offending host node.
        host: String,
    },

    /// The associate tree has an internal node with neither 0 nor 2 children
    /// after the caller opted out of binarization.
    #[error("[E1002] associate tree is not binary (at associate {node:?})")]
    AssociateTreeNotBinary {
        /// Label of the offending associate node.
        node: String,
    },

    /// A leaf of the associate tree has no `Associate` annotation.
    #[error("[E1003] associate leaf {node:?} is missing host/contents annotation")]
    MissingLeafAssociate {
        /// Label of the offending leaf.
        node: String,
    },

    /// An associate names a host that does not exist in the host tree.
    #[error("[E1004] associate {node:?} references unknown host {host:?}")]
    UnknownHost {
        /// Label of the offending associate node.
        node: String,
        /// The unrecognized host name.
        host: String,
    },

    /// A leaf associate's host is not a terminal (leaf) node of the host tree.
    #[error("[E1005] leaf associate {node:?} host {host:?} is not terminal")]
    LeafHostNotTerminal {
        /// Label of the offending leaf.
        node: String,
        /// The non-terminal host name.
        host: String,
    },

    /// An event-tree node fails an arity, contents, or host-consistency check.
    #[error("[E2001] invalid history at {node:?}: {message}")]
    InvalidHistory {
        /// Label or description of the offending event node.
        node: String,
        /// Human-readable explanation.
        message: String,
    },

    /// Internal invariant violation (a bug, not a user input error).
    #[error("[E3001] internal error: {0}")]
    Internal(String),
}

impl CophyError {
    /// Stable `E####` code for this error, for machine parsing.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::HostTreeNotBinary { .. } => "E1001",
            Self::AssociateTreeNotBinary { .. } => "E1002",
            Self::MissingLeafAssociate { .. } => "E1003",
            Self::UnknownHost { .. } => "E1004",
            Self::LeafHostNotTerminal { .. } => "E1005",
            Self::InvalidHistory { .. } => "E2001",
            Self::Internal(_) => "E3001",
        }
    }
}

/// Convenience result alias used throughout `cophy-core`.
pub type Result<T> = std::result::Result<T, CophyError>;

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InputValidation => "input validation",
            Self::HistoryValidation => "history validation",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

/// Coarse category an error code falls into, derived from its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// E1xxx
    InputValidation,
    /// E2xxx
    HistoryValidation,
    /// E3xxx
    Internal,
}

impl CophyError {
    /// The coarse category this error's code falls into.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self.code().as_bytes()[1] {
            b'1' => ErrorCategory::InputValidation,
            b'2' => ErrorCategory::HistoryValidation,
            _ => ErrorCategory::Internal,
        }
    }
}
