use thiserror::Error;

/// Errors a [`RosterClient`](super::RosterClient) can hit talking to the controller.
///
/// Remote failures never show up here: the controller turns those into notices.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("controller is closed")]
    Closed,

    #[error("controller dropped the request")]
    Dropped,
}
