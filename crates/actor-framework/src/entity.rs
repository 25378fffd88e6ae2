//! # ActorEntity Trait
//!
//! The contract a record type implements to be held by a [`ResourceActor`](crate::ResourceActor).
//! Associated types fix the identifier, the create payload and the replace payload, so a
//! client for one resource cannot send another resource's payload.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Identifiers
/// The actor mints identifiers from a sequential `u32` counter, so `Id` must be
/// constructible from `u32`. Ids are never reused within one actor.
///
/// # Hooks
/// [`ActorEntity::on_replace`] is called when a full replacement arrives. The default
/// implementation overwrites the stored entity with the result of
/// [`ActorEntity::from_replace_params`]; override it when a replacement must preserve
/// server-owned fields or reject certain inputs.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to replace an existing instance.
    type Replace: Send + Sync + Debug;

    /// The error type for this entity.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the minted id and the payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Construct the replacement entity. The stored id always wins over any id in the payload.
    fn from_replace_params(id: Self::Id, params: Self::Replace) -> Result<Self, Self::Error>;

    /// Returns the entity's identifier.
    fn id(&self) -> &Self::Id;

    /// Called when a replace request is received for this entity.
    async fn on_replace(&mut self, params: Self::Replace) -> Result<(), Self::Error> {
        *self = Self::from_replace_params(self.id().clone(), params)?;
        Ok(())
    }
}
