//! # User Roster
//!
//! Create, edit, delete and favorite user profiles stored behind a json-server style
//! REST API, with forms that can be auto-filled from a random profile generator.
//!
//! ## Layout
//!
//! - **[model]**: the [`User`](model::User) record, form drafts and ids.
//! - **[validation]**: name, email and phone rules.
//! - **[clients]**: the REST store and the random profile client, each behind a trait,
//!   plus scripted mocks for tests.
//! - **[state]** and **[render]**: the in-memory list and its projection onto a screen.
//! - **[controller]**: the actor that applies every user interaction.
//! - **[lifecycle]**: starts and stops the controller.
//! - **[terminal]**: the line-oriented front end.
//! - **[mock_server]**: an `axum` stand-in for json-server built on
//!   [`actor_framework::ResourceActor`].
//! - **[config]**: command line and environment settings.

pub mod clients;
pub mod config;
pub mod controller;
pub mod lifecycle;
pub mod mock_server;
pub mod model;
pub mod render;
pub mod state;
pub mod terminal;
pub mod validation;
