use thiserror::Error;

/// Which remote call failed; selects the generic message shown for transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOperation {
    Search,
    Detail,
}

impl LookupOperation {
    pub fn failure_message(&self) -> &'static str {
        match self {
            LookupOperation::Search => "Failed to fetch movies",
            LookupOperation::Detail => "Failed to fetch movie details",
        }
    }

    /// Used when the remote reports failure without an `Error` text
    pub fn not_found_message(&self) -> &'static str {
        match self {
            LookupOperation::Search => "No movies found",
            LookupOperation::Detail => "Movie not found",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// Application-level failure (`Response: "False"`); the message is shown verbatim
    #[error("{message}")]
    Remote { message: String },

    /// Network failure, non-2xx status or undecodable body. Only the generic
    /// message is displayed; `detail` is for logs.
    #[error("{}", .operation.failure_message())]
    Transport {
        operation: LookupOperation,
        detail: String,
    },
}

impl LookupError {
    pub fn remote(message: impl Into<String>) -> Self {
        LookupError::Remote { message: message.into() }
    }

    pub fn transport(operation: LookupOperation, detail: impl Into<String>) -> Self {
        LookupError::Transport {
            operation,
            detail: detail.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport { .. })
    }
}
