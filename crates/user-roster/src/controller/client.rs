use super::error::ControllerError;
use super::messages::{Command, Notice, Reply, Snapshot};
use crate::model::{UserDraft, UserId};
use crate::render::Screen;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

/// Front-end handle to the [`RosterActor`](super::RosterActor).
///
/// Every call resolves once its transition is complete, including any remote call it
/// started, and yields the notice the transition produced. The same notices also go
/// out on the stream returned by [`RosterActor::new`](super::RosterActor::new).
#[derive(Clone)]
pub struct RosterClient {
    sender: mpsc::Sender<Command>,
    screen: watch::Receiver<Screen>,
}

type Outcome = Result<Option<Notice>, ControllerError>;

impl RosterClient {
    pub fn new(sender: mpsc::Sender<Command>, screen: watch::Receiver<Screen>) -> Self {
        Self { sender, screen }
    }

    async fn enqueue<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> Command,
    ) -> Result<oneshot::Receiver<R>, ControllerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ControllerError::Closed)?;
        Ok(response)
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> Command,
    ) -> Result<R, ControllerError> {
        let response = self.enqueue(build).await?;
        response.await.map_err(|_| ControllerError::Dropped)
    }

    /// Queues a command and returns as soon as the controller has it.
    ///
    /// Commands are handled in the order they are queued. The receiver yields the
    /// transition's notice once it is complete; it errors if the transition died.
    pub async fn dispatch(
        &self,
        build: impl FnOnce(Reply) -> Command,
    ) -> Result<oneshot::Receiver<Option<Notice>>, ControllerError> {
        self.enqueue(build).await
    }

    /// The latest rendered screen; `changed()` on the receiver wakes on every render.
    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.screen.clone()
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Outcome {
        debug!("Sending request");
        self.request(|respond_to| Command::Load { respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn set_create_form(&self, form: UserDraft) -> Outcome {
        self.request(|respond_to| Command::SetCreateForm { form, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn auto_fill(&self) -> Outcome {
        debug!("Sending request");
        self.request(|respond_to| Command::AutoFill { respond_to })
            .await
    }

    pub async fn clear_form(&self) -> Outcome {
        self.request(|respond_to| Command::ClearForm { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn submit_create(&self) -> Outcome {
        debug!("Sending request");
        self.request(|respond_to| Command::SubmitCreate { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn open_edit(&self, id: UserId) -> Outcome {
        self.request(|respond_to| Command::OpenEdit { id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_edit_form(&self, form: UserDraft) -> Outcome {
        self.request(|respond_to| Command::SetEditForm { form, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn save_edit(&self) -> Outcome {
        debug!("Sending request");
        self.request(|respond_to| Command::SaveEdit { respond_to })
            .await
    }

    pub async fn cancel_edit(&self) -> Outcome {
        self.request(|respond_to| Command::CancelEdit { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn open_delete(&self, id: UserId) -> Outcome {
        self.request(|respond_to| Command::OpenDelete { id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn confirm_delete(&self) -> Outcome {
        debug!("Sending request");
        self.request(|respond_to| Command::ConfirmDelete { respond_to })
            .await
    }

    pub async fn cancel_delete(&self) -> Outcome {
        self.request(|respond_to| Command::CancelDelete { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: UserId) -> Outcome {
        debug!("Sending request");
        self.request(|respond_to| Command::ToggleFavorite { id, respond_to })
            .await
    }

    /// Sets the list filter; `None` or a blank query shows everyone.
    pub async fn filter(&self, query: Option<String>) -> Outcome {
        self.request(|respond_to| Command::Filter { query, respond_to })
            .await
    }

    pub async fn snapshot(&self) -> Result<Snapshot, ControllerError> {
        self.request(|respond_to| Command::Snapshot { respond_to })
            .await
    }
}
