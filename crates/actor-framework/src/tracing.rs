//! # Observability & Tracing
//!
//! Structured logging for every actor built on this crate.
//!
//! The compact format hides the module prefix (`with_target(false)`); actors already tag
//! their lines with `entity_type`.
//!
//! ```bash
//! # Lifecycle and completed operations
//! RUST_LOG=info cargo run
//!
//! # Full payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the resource actors
//! RUST_LOG=actor_framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a create followed by a delete reads:
//!
//! ```text
//! INFO Actor started entity_type="User" size=0
//! INFO Created entity_type="User" id=1 size=1
//! INFO Deleted entity_type="User" id=1 size=0
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `default_directive` when the variable
/// is unset or unparsable. Calling it twice is harmless: the second install is ignored.
pub fn setup_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact()
        .try_init();
}
