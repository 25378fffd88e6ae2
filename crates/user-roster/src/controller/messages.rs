//! Messages exchanged with the controller actor: commands in, notices out, and the
//! settlements remote tasks hand back to the loop.

use crate::clients::{ProfileError, StoreError};
use crate::model::{User, UserDraft, UserId};
use crate::render::Screen;
use crate::state::AppState;
use std::fmt::Display;
use tokio::sync::oneshot;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        })
    }
}

/// A transient message for the user. Dismissal timing is up to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Reply channel for a transition: the notice it produced, if any.
pub type Reply = oneshot::Sender<Option<Notice>>;

/// Read-only copy of the controller's state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub editing: Option<UserId>,
    pub deleting: Option<UserId>,
    pub in_flight: Vec<UserId>,
    pub screen: Screen,
}

impl Snapshot {
    pub(crate) fn capture(state: &AppState, in_flight: Vec<UserId>, screen: Screen) -> Self {
        Self {
            users: state.users().to_vec(),
            editing: state.editing.clone(),
            deleting: state.deleting.clone(),
            in_flight,
            screen,
        }
    }
}

/// User interactions, one variant per transition.
#[derive(Debug)]
pub enum Command {
    Load { respond_to: Reply },
    SetCreateForm { form: UserDraft, respond_to: Reply },
    AutoFill { respond_to: Reply },
    ClearForm { respond_to: Reply },
    SubmitCreate { respond_to: Reply },
    OpenEdit { id: UserId, respond_to: Reply },
    SetEditForm { form: UserDraft, respond_to: Reply },
    SaveEdit { respond_to: Reply },
    CancelEdit { respond_to: Reply },
    OpenDelete { id: UserId, respond_to: Reply },
    ConfirmDelete { respond_to: Reply },
    CancelDelete { respond_to: Reply },
    ToggleFavorite { id: UserId, respond_to: Reply },
    Filter { query: Option<String>, respond_to: Reply },
    Snapshot { respond_to: oneshot::Sender<Snapshot> },
}

/// Result of a spawned remote call, handed back to the actor loop.
#[derive(Debug)]
pub(crate) enum Settlement {
    Loaded {
        result: Result<Vec<User>, StoreError>,
        respond_to: Reply,
    },
    AutoFilled {
        result: Result<UserDraft, ProfileError>,
        respond_to: Reply,
    },
    Created {
        result: Result<User, StoreError>,
        respond_to: Reply,
    },
    Edited {
        id: UserId,
        result: Result<User, StoreError>,
        respond_to: Reply,
    },
    Deleted {
        id: UserId,
        deleted: bool,
        respond_to: Reply,
    },
    FavoriteToggled {
        id: UserId,
        result: Result<User, StoreError>,
        respond_to: Reply,
    },
}
