//! # Generic Messages
//!
//! Requests sent from a [`ResourceClient`](crate::ResourceClient) to a
//! [`ResourceActor`](crate::ResourceActor), each carrying a oneshot reply channel.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to the actor.
///
/// The variants map onto the REST verbs of a collection resource:
///
/// - **Create**: `POST /items`. Mints an id and stores the new entity.
/// - **Get**: `GET /items/{id}`.
/// - **List**: `GET /items`, in insertion order.
/// - **Replace**: `PUT /items/{id}`. Full replacement through [`ActorEntity::on_replace`].
/// - **Delete**: `DELETE /items/{id}`. Responds with the removed entity.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Replace {
        id: T::Id,
        params: T::Replace,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
}
