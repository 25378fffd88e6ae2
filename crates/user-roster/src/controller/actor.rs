use super::client::RosterClient;
use super::messages::{Command, Notice, Reply, Settlement, Severity, Snapshot};
use crate::clients::{ProfileSource, UserStore};
use crate::model::{UserCreate, UserDraft, UserId, UserPatch};
use crate::render::{render_state, DeleteModal, EditModal, Screen};
use crate::state::AppState;
use crate::validation::validate_user;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinSet};
use tracing::{debug, error, info, warn};

const BUSY: &str = "Another change to this user is still in progress";

/// Remote collaborators injected when the actor starts.
#[derive(Clone)]
pub struct RosterContext {
    pub store: Arc<dyn UserStore>,
    pub profiles: Arc<dyn ProfileSource>,
}

/// Owns the application state and applies every transition.
///
/// Commands are handled one at a time. Remote calls run as separate tasks and come back
/// as [`Settlement`]s, so the loop keeps accepting commands while a call is pending.
/// A record with a pending save, delete or favorite toggle rejects a second one.
pub struct RosterActor {
    receiver: mpsc::Receiver<Command>,
    tasks: JoinSet<Settlement>,
    state: AppState,
    create_form: UserDraft,
    edit_form: UserDraft,
    filter: Option<String>,
    in_flight: HashSet<UserId>,
    /// Record each guarded task holds, so a task that dies still releases it.
    guarded: HashMap<task::Id, UserId>,
    notices: mpsc::UnboundedSender<Notice>,
    screen: watch::Sender<Screen>,
}

impl RosterActor {
    /// Creates the actor, its client, and the receiving end of the notice stream.
    pub fn new(buffer_size: usize) -> (Self, RosterClient, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (notices, notice_rx) = mpsc::unbounded_channel();
        let (screen, screen_rx) = watch::channel(Screen::default());
        let actor = Self {
            receiver,
            tasks: JoinSet::new(),
            state: AppState::new(),
            create_form: UserDraft::default(),
            edit_form: UserDraft::default(),
            filter: None,
            in_flight: HashSet::new(),
            guarded: HashMap::new(),
            notices,
            screen,
        };
        (actor, RosterClient::new(sender, screen_rx), notice_rx)
    }

    /// Runs until every client is dropped and the pending remote calls have settled.
    pub async fn run(mut self, ctx: RosterContext) {
        info!("Controller started");
        let mut closing = false;

        loop {
            tokio::select! {
                cmd = self.receiver.recv(), if !closing => match cmd {
                    Some(cmd) => self.handle(cmd, &ctx),
                    None => {
                        closing = true;
                        debug!(pending = self.tasks.len(), "Draining");
                    }
                },
                Some(joined) = self.tasks.join_next_with_id(), if !self.tasks.is_empty() => match joined {
                    Ok((task_id, settlement)) => {
                        self.guarded.remove(&task_id);
                        self.settle(settlement);
                    }
                    Err(e) => self.release_failed(e),
                },
                else => break,
            }
            if closing && self.tasks.is_empty() {
                break;
            }
        }

        info!(users = self.state.len(), "Shutdown");
    }

    fn handle(&mut self, cmd: Command, ctx: &RosterContext) {
        match cmd {
            Command::Load { respond_to } => {
                let store = ctx.store.clone();
                self.tasks.spawn(async move {
                    let result = store.list_all().await;
                    Settlement::Loaded { result, respond_to }
                });
            }
            Command::SetCreateForm { form, respond_to } => {
                self.create_form = form;
                self.publish();
                let _ = respond_to.send(None);
            }
            Command::AutoFill { respond_to } => {
                let profiles = ctx.profiles.clone();
                self.tasks.spawn(async move {
                    let result = profiles.fetch_random_profile().await;
                    Settlement::AutoFilled { result, respond_to }
                });
            }
            Command::ClearForm { respond_to } => {
                self.create_form = UserDraft::default();
                self.publish();
                let _ = respond_to.send(None);
            }
            Command::SubmitCreate { respond_to } => {
                let draft = self.create_form.trimmed();
                if let Err(e) = validate_user(&draft) {
                    debug!(field = e.field(), "Create rejected");
                    self.answer(respond_to, Severity::Danger, e.to_string());
                    return;
                }
                let store = ctx.store.clone();
                let payload = UserCreate::from(draft);
                self.tasks.spawn(async move {
                    let result = store.create(payload).await;
                    Settlement::Created { result, respond_to }
                });
            }
            Command::OpenEdit { id, respond_to } => {
                let Some(user) = self.state.find_by_id(&id) else {
                    warn!(%id, "Edit requested for unknown user");
                    self.answer(respond_to, Severity::Danger, "User not found for editing");
                    return;
                };
                self.edit_form = user.draft();
                self.state.editing = Some(id);
                self.publish();
                let _ = respond_to.send(None);
            }
            Command::SetEditForm { form, respond_to } => {
                if self.state.editing.is_some() {
                    self.edit_form = form;
                    self.publish();
                }
                let _ = respond_to.send(None);
            }
            Command::SaveEdit { respond_to } => self.save_edit(respond_to, ctx),
            Command::CancelEdit { respond_to } => {
                self.state.editing = None;
                self.edit_form = UserDraft::default();
                self.publish();
                let _ = respond_to.send(None);
            }
            Command::OpenDelete { id, respond_to } => {
                if self.state.find_by_id(&id).is_none() {
                    warn!(%id, "Delete requested for unknown user");
                    self.answer(respond_to, Severity::Danger, "User not found for deletion");
                    return;
                }
                self.state.deleting = Some(id);
                self.publish();
                let _ = respond_to.send(None);
            }
            Command::ConfirmDelete { respond_to } => {
                let Some(id) = self.state.deleting.clone() else {
                    let _ = respond_to.send(None);
                    return;
                };
                if !self.in_flight.insert(id.clone()) {
                    self.answer(respond_to, Severity::Warning, BUSY);
                    return;
                }
                let store = ctx.store.clone();
                self.spawn_guarded(id.clone(), async move {
                    let deleted = store.delete(id.clone()).await;
                    Settlement::Deleted {
                        id,
                        deleted,
                        respond_to,
                    }
                });
            }
            Command::CancelDelete { respond_to } => {
                self.state.deleting = None;
                self.publish();
                let _ = respond_to.send(None);
            }
            Command::ToggleFavorite { id, respond_to } => {
                let Some(user) = self.state.find_by_id(&id) else {
                    warn!(%id, "Favorite toggle for unknown user");
                    self.answer(respond_to, Severity::Danger, "User not found");
                    return;
                };
                let record = user.with_favorite_toggled();
                if !self.in_flight.insert(id.clone()) {
                    self.answer(respond_to, Severity::Warning, BUSY);
                    return;
                }
                let store = ctx.store.clone();
                self.spawn_guarded(id.clone(), async move {
                    let result = store.update(id.clone(), record).await;
                    Settlement::FavoriteToggled {
                        id,
                        result,
                        respond_to,
                    }
                });
            }
            Command::Filter { query, respond_to } => {
                self.filter = query.filter(|q| !q.trim().is_empty());
                self.publish();
                let _ = respond_to.send(None);
            }
            Command::Snapshot { respond_to } => {
                let in_flight = self.in_flight.iter().cloned().collect();
                let _ = respond_to.send(Snapshot::capture(&self.state, in_flight, self.render()));
            }
        }
    }

    fn save_edit(&mut self, respond_to: Reply, ctx: &RosterContext) {
        let Some(id) = self.state.editing.clone() else {
            let _ = respond_to.send(None);
            return;
        };
        let draft = self.edit_form.trimmed();
        if let Err(e) = validate_user(&draft) {
            debug!(%id, field = e.field(), "Edit rejected");
            self.answer(respond_to, Severity::Danger, e.to_string());
            return;
        }
        let Some(current) = self.state.find_by_id(&id) else {
            warn!(%id, "Edited user is no longer in the list");
            self.answer(respond_to, Severity::Danger, "User to edit is no longer in the list");
            return;
        };
        let record = current.merged_with(&draft);
        if !self.in_flight.insert(id.clone()) {
            self.answer(respond_to, Severity::Warning, BUSY);
            return;
        }
        let store = ctx.store.clone();
        self.spawn_guarded(id.clone(), async move {
            let result = store.update(id.clone(), record).await;
            Settlement::Edited {
                id,
                result,
                respond_to,
            }
        });
    }

    /// Spawns a remote call that holds `id` in the in-flight set until it settles.
    fn spawn_guarded<F>(&mut self, id: UserId, call: F)
    where
        F: Future<Output = Settlement> + Send + 'static,
    {
        let handle = self.tasks.spawn(call);
        self.guarded.insert(handle.id(), id);
    }

    /// A task that panicked or was cancelled never settles; its caller sees
    /// [`ControllerError::Dropped`](super::ControllerError::Dropped).
    fn release_failed(&mut self, e: task::JoinError) {
        match self.guarded.remove(&e.id()) {
            Some(id) => {
                error!(%id, error = %e, "Remote task failed");
                self.in_flight.remove(&id);
                self.publish();
            }
            None => error!(error = %e, "Remote task failed"),
        }
    }

    fn settle(&mut self, settlement: Settlement) {
        match settlement {
            Settlement::Loaded { result, respond_to } => match result {
                Ok(users) => {
                    self.state.replace_all(users);
                    info!(users = self.state.len(), "Users loaded");
                    self.publish();
                    let _ = respond_to.send(None);
                }
                Err(e) => {
                    warn!(error = %e, "Load failed");
                    self.answer(respond_to, Severity::Danger, "Could not load users");
                }
            },
            Settlement::AutoFilled { result, respond_to } => match result {
                Ok(draft) => {
                    debug!(?draft, "Random profile");
                    self.create_form = draft;
                    self.publish();
                    self.answer(
                        respond_to,
                        Severity::Success,
                        "Form auto-filled with a random profile",
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Auto-fill failed");
                    self.answer(respond_to, Severity::Danger, "Could not fetch a random profile");
                }
            },
            Settlement::Created { result, respond_to } => match result {
                Ok(user) => {
                    let id = user.id.clone();
                    if !self.state.append(user) {
                        warn!(%id, "Server returned an id already in the list");
                    }
                    self.create_form = UserDraft::default();
                    info!(%id, users = self.state.len(), "User added");
                    self.publish();
                    self.answer(respond_to, Severity::Success, "User added");
                }
                Err(e) => {
                    warn!(error = %e, "Create failed");
                    self.answer(respond_to, Severity::Danger, "Could not add the user");
                }
            },
            Settlement::Edited {
                id,
                result,
                respond_to,
            } => {
                self.in_flight.remove(&id);
                match result {
                    Ok(user) => {
                        if self.state.update_by_id(&id, UserPatch::from(&user)).is_none() {
                            warn!(%id, "Updated user is no longer in the list");
                        }
                        if self.state.editing.as_ref() == Some(&id) {
                            self.state.editing = None;
                            self.edit_form = UserDraft::default();
                        }
                        info!(%id, "User updated");
                        self.publish();
                        self.answer(respond_to, Severity::Success, "User updated");
                    }
                    Err(e) => {
                        warn!(%id, error = %e, "Update failed");
                        self.answer(respond_to, Severity::Danger, "Could not update the user");
                    }
                }
            }
            Settlement::Deleted {
                id,
                deleted,
                respond_to,
            } => {
                self.in_flight.remove(&id);
                if !deleted {
                    self.answer(respond_to, Severity::Danger, "Could not delete the user");
                    return;
                }
                self.state.remove_by_id(&id);
                if self.state.deleting.as_ref() == Some(&id) {
                    self.state.deleting = None;
                }
                if self.state.editing.as_ref() == Some(&id) {
                    self.state.editing = None;
                    self.edit_form = UserDraft::default();
                }
                info!(%id, users = self.state.len(), "User deleted");
                self.publish();
                self.answer(respond_to, Severity::Warning, "User deleted");
            }
            Settlement::FavoriteToggled {
                id,
                result,
                respond_to,
            } => {
                self.in_flight.remove(&id);
                let (severity, message) = match result {
                    Ok(user) => {
                        let favorite = user.favorite;
                        self.state.update_by_id(&id, UserPatch::from(&user));
                        info!(%id, favorite, favorites = self.state.favorite_count(), "Favorite toggled");
                        if favorite {
                            (Severity::Info, "Added to favorites")
                        } else {
                            (Severity::Info, "Removed from favorites")
                        }
                    }
                    Err(e) => {
                        warn!(%id, error = %e, "Favorite toggle failed");
                        (Severity::Danger, "Could not update favorite")
                    }
                };
                self.publish();
                self.answer(respond_to, severity, message);
            }
        }
    }

    /// Emits a notice on the stream and hands the same notice back to the caller.
    fn answer(&self, respond_to: Reply, severity: Severity, message: impl Into<String>) {
        let notice = Notice::new(severity, message);
        let _ = self.notices.send(notice.clone());
        let _ = respond_to.send(Some(notice));
    }

    fn publish(&self) {
        self.screen.send_replace(self.render());
    }

    fn render(&self) -> Screen {
        let edit_modal = self.state.editing.clone().map(|id| EditModal {
            id,
            form: self.edit_form.clone(),
        });
        let delete_modal = self
            .state
            .deleting
            .as_ref()
            .and_then(|id| self.state.find_by_id(id))
            .map(|user| DeleteModal {
                id: user.id.clone(),
                full_name: user.full_name.clone(),
            });
        Screen {
            list: render_state(&self.state, self.filter.as_deref()),
            create_form: self.create_form.clone(),
            edit_modal,
            delete_modal,
            filter: self.filter.clone(),
        }
    }
}
