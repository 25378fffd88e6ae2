//! Error types for the remote clients.

use crate::model::UserId;
use thiserror::Error;

/// Why a single HTTP exchange failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// Connection, DNS or timeout failure; no response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status}")]
    Http { status: u16 },

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RequestError::Http {
                status: status.as_u16(),
            }
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

/// Errors from the users REST resource, one variant per operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to fetch users: {0}")]
    Fetch(#[source] RequestError),

    #[error("failed to create user: {0}")]
    Create(#[source] RequestError),

    #[error("failed to update user {id}: {source}")]
    Update {
        id: UserId,
        #[source]
        source: RequestError,
    },

    #[error("failed to delete user {id}: {source}")]
    Delete {
        id: UserId,
        #[source]
        source: RequestError,
    },
}

impl StoreError {
    pub fn cause(&self) -> &RequestError {
        match self {
            StoreError::Fetch(source) | StoreError::Create(source) => source,
            StoreError::Update { source, .. } | StoreError::Delete { source, .. } => source,
        }
    }
}

/// Errors from the random profile generator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("failed to fetch random profile: {0}")]
    Request(#[from] RequestError),

    #[error("random profile response contained no results")]
    Empty,
}
