//! [`ActorEntity`] implementation that lets [`User`] live in a
//! [`ResourceActor`](actor_framework::ResourceActor).

use crate::model::{User, UserCreate, UserId};
use actor_framework::ActorEntity;
use std::convert::Infallible;

/// The mock server stores whatever it is sent, like json-server does.
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Replace = UserCreate;
    type Error = Infallible;

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        Ok(User::from_payload(id, params))
    }

    /// A `PUT` body may carry an `id`; it is ignored in favor of the one in the path.
    fn from_replace_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        Ok(User::from_payload(id, params))
    }

    fn id(&self) -> &UserId {
        &self.id
    }
}
