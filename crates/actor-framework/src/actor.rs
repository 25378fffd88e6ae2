//! # Generic Actor Server
//!
//! `ResourceActor` owns an ordered in-memory collection and processes requests one at a
//! time, so the store needs no locking.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// **Concurrency Model**:
/// Each actor runs in its own Tokio task and handles its messages sequentially, which
/// gives it exclusive ownership of `store` without `Mutex` or `RwLock`.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the actor (server) and a client.
/// 2.  **Seed** (optional): `actor.seed(items)` before the loop starts.
/// 3.  **Run**: spawn `actor.run()` in a background task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Note { id: u32, text: String }
/// #[derive(Debug)] struct NoteDraft { text: String }
/// #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
///
/// #[async_trait]
/// impl ActorEntity for Note {
///     type Id = u32;
///     type Create = NoteDraft;
///     type Replace = NoteDraft;
///     type Error = NoteError;
///
///     fn from_create_params(id: u32, p: NoteDraft) -> Result<Self, NoteError> { Ok(Self { id, text: p.text }) }
///     fn from_replace_params(id: u32, p: NoteDraft) -> Result<Self, NoteError> { Ok(Self { id, text: p.text }) }
///     fn id(&self) -> &u32 { &self.id }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Note>::new(10);
///     tokio::spawn(actor.run());
///
///     let note = client.create(NoteDraft { text: "hello".into() }).await.unwrap();
///     assert_eq!(note.id, 1);
///     assert_eq!(client.list().await.unwrap().len(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create** mints the next id from the `next_id` counter, builds the entity with
///   `T::from_create_params` and appends it.
/// * **List** returns clones in insertion order.
/// * **Replace** hands the payload to `on_replace`; the position in the list is kept.
/// * **Delete** removes the entity and returns it.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Vec<T>,
    /// `None` once `u32::MAX` has been handed out.
    next_id: Option<u32>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; when it is full, client calls
    /// wait for space.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Vec::new(),
            next_id: Some(1),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Preloads entities before the loop starts.
    ///
    /// Entities whose id is already present are skipped. `next_id_hint` moves the id
    /// counter past the largest numeric id in the seed so minted ids never collide.
    pub fn seed(&mut self, items: impl IntoIterator<Item = T>, next_id_hint: u32) {
        for item in items {
            if self.position(item.id()).is_some() {
                warn!(id = %item.id(), "Duplicate id in seed, skipped");
                continue;
            }
            self.store.push(item);
        }
        self.next_id = self.next_id.map(|next| next.max(next_id_hint));
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.store.iter().position(|item| item.id() == id)
    }

    /// Next free id, or `None` when the counter has run out.
    fn mint_id(&mut self) -> Option<T::Id> {
        loop {
            let raw = self.next_id?;
            self.next_id = raw.checked_add(1);
            let id = T::Id::from(raw);
            if self.position(&id).is_none() {
                return Some(id);
            }
        }
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "User" instead of "user_roster::model::user::User")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let Some(id) = self.mint_id() else {
                        warn!(entity_type, "Create failed, ids exhausted");
                        let _ = respond_to.send(Err(FrameworkError::IdsExhausted));
                        continue;
                    };
                    match T::from_create_params(id.clone(), params) {
                        Ok(item) => {
                            self.store.push(item.clone());
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.position(&id).map(|idx| self.store[idx].clone());
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.clone()));
                }
                ResourceRequest::Replace {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?params, "Replace");
                    let Some(idx) = self.position(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    // Work on a copy so a failing hook leaves the stored entity untouched
                    let mut item = self.store[idx].clone();
                    if let Err(e) = item.on_replace(params).await {
                        warn!(entity_type, %id, error = %e, "Replace failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store[idx] = item.clone();
                    info!(entity_type, %id, "Replaced");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    match self.position(&id) {
                        Some(idx) => {
                            let removed = self.store.remove(idx);
                            info!(entity_type, %id, size = self.store.len(), "Deleted");
                            let _ = respond_to.send(Ok(removed));
                        }
                        None => {
                            warn!(entity_type, %id, "Not found");
                            let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        }
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
