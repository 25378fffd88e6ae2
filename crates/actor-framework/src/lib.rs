//! # Actor Framework
//!
//! Building blocks for resource-oriented actors on Tokio: a collection resource
//! (`GET/POST /items`, `GET/PUT/DELETE /items/{id}`) whose state lives inside one task and
//! is reached only through messages.
//!
//! ## Resource-Oriented Architecture + Actor Model
//!
//! - Each resource type gets its own actor with isolated state.
//! - Requests map onto the verbs of a REST collection (Create, Get, List, Replace, Delete).
//! - Messages are processed **sequentially** within an actor, so the store needs no locks.
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Contact {
//!     id: u32,
//!     name: String,
//! }
//!
//! #[derive(Debug)]
//! struct ContactDraft {
//!     name: String,
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("contact error")]
//! struct ContactError;
//!
//! #[async_trait]
//! impl ActorEntity for Contact {
//!     type Id = u32;
//!     type Create = ContactDraft;
//!     type Replace = ContactDraft;
//!     type Error = ContactError;
//!
//!     fn from_create_params(id: u32, params: ContactDraft) -> Result<Self, Self::Error> {
//!         Ok(Self { id, name: params.name })
//!     }
//!
//!     fn from_replace_params(id: u32, params: ContactDraft) -> Result<Self, Self::Error> {
//!         Ok(Self { id, name: params.name })
//!     }
//!
//!     fn id(&self) -> &u32 {
//!         &self.id
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Contact>::new(10);
//!     tokio::spawn(actor.run());
//!
//!     let alice = client.create(ContactDraft { name: "Alice".into() }).await.unwrap();
//!     let renamed = client
//!         .replace(alice.id, ContactDraft { name: "Alicia".into() })
//!         .await
//!         .unwrap();
//!     assert_eq!(renamed.name, "Alicia");
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Clients are cheap clones of an `mpsc::Sender`; replies come back on `oneshot` channels
//! - Dropping every client closes the channel and ends the actor loop
//!
//! ## Observability
//!
//! Every request is logged with the entity type and id as structured fields. Call
//! [`tracing::setup_tracing`] once at startup to install the subscriber.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
