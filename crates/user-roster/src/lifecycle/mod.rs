//! # System Lifecycle
//!
//! Starts the controller with its remote collaborators injected and stops it cleanly.
//!
//! ## Wiring
//!
//! The controller is created first and receives its dependencies only when it starts
//! running, through [`RosterContext`]:
//!
//! ```rust,ignore
//! let store = Arc::new(HttpUserStore::new(&config.api_url, timeout)?);
//! let profiles = Arc::new(RandomUserClient::new(&config.random_user_url, timeout)?);
//!
//! let system = RosterSystem::start(store, profiles);
//! system.client.load().await?;
//! // ...
//! system.shutdown().await;
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the client** - closes the command channel
//! 2. **Controller drains** - remote calls already in flight still settle
//! 3. **Await completion** - the controller task finishes
//!
//! Clones of the client handed to other tasks keep the controller alive; drop them first.

use crate::clients::{ProfileSource, UserStore};
use crate::controller::{Notice, RosterActor, RosterClient, RosterContext};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// A running controller and its channels.
pub struct RosterSystem {
    /// Handle for driving the controller.
    pub client: RosterClient,

    /// Every notice the controller emits, in order.
    pub notices: mpsc::UnboundedReceiver<Notice>,

    handle: JoinHandle<()>,
}

impl RosterSystem {
    /// Spawns the controller on the current runtime.
    pub fn start(store: Arc<dyn UserStore>, profiles: Arc<dyn ProfileSource>) -> Self {
        let (actor, client, notices) = RosterActor::new(32);
        let handle = tokio::spawn(actor.run(RosterContext { store, profiles }));
        info!("Roster system started");
        Self {
            client,
            notices,
            handle,
        }
    }

    /// Drops the client and waits for the controller to finish.
    pub async fn shutdown(self) {
        drop(self.client);
        if let Err(e) = self.handle.await {
            error!(error = %e, "Controller task failed");
        }
        info!("Roster system stopped");
    }
}
