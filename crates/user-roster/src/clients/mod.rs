//! Remote collaborators of the controller: the users REST resource and the random
//! profile generator, each behind a trait so tests can script them.

pub mod error;
pub mod mock;
pub mod random_profile;
pub mod store;

pub use error::*;
pub use random_profile::*;
pub use store::*;
