//! Plain data: the stored user record, form drafts and request payloads.

pub mod user;

pub use user::*;
