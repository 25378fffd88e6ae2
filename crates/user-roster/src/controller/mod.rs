//! # Controller
//!
//! The event wiring between a front end and the remote collaborators, as an actor.
//!
//! [`RosterActor`] owns the [`AppState`](crate::state::AppState), both forms, the modal
//! selections and the list filter. A front end drives it through a cloneable
//! [`RosterClient`] and listens on two channels:
//!
//! - an unbounded stream of [`Notice`]s (toasts), and
//! - a `watch` channel carrying the latest rendered [`Screen`](crate::render::Screen).
//!
//! ```rust,ignore
//! let (actor, client, mut notices) = RosterActor::new(32);
//! let handle = tokio::spawn(actor.run(RosterContext { store, profiles }));
//!
//! client.load().await?;
//! client.set_create_form(UserDraft::new("Jo", "jo@example.com", "555 1234")).await?;
//! let notice = client.submit_create().await?; // Some([success] User added)
//!
//! drop(client);
//! handle.await?; // pending remote calls settle first
//! ```
//!
//! Remote calls are spawned off the loop and settle back into it, so a slow server
//! never blocks other commands. Mutations on the same record are serialized by an
//! in-flight guard instead: a second save, delete or favorite toggle on a record with
//! one pending is answered with a warning and dropped.

mod actor;
mod client;
mod error;
mod messages;

pub use actor::{RosterActor, RosterContext};
pub use client::RosterClient;
pub use error::ControllerError;
pub use messages::{Command, Notice, Reply, Severity, Snapshot};
