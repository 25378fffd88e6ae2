//! # Terminal Front End
//!
//! A line-oriented front end for the controller. Each line is one interaction; after
//! every command the pending notices are printed, then the current screen.
//!
//! Commands that reach a server (`autofill`, `submit`, `save`, `confirm`, `fav`) are
//! queued and finish in the background, so the prompt keeps reading while a slow call
//! is pending. Their notices and a fresh screen are printed when they settle. `wait`
//! holds until everything queued has settled, as do `quit` and end of input.
//!
//! ```text
//! > name Ada Lovelace
//! > email ada@example.com
//! > phone +44 20 7946 0000
//! > submit
//! [success] User added
//! 1 users | ★ 0
//! ...
//! ```

use crate::controller::{Command, ControllerError, Notice, RosterClient};
use crate::model::{UserDraft, UserId};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

pub const HELP: &str = "\
Commands:
  list                          show the users
  name|email|phone|image <v>    fill in the new user form
  autofill                      fill the form with a random profile
  clear                         reset the form
  submit                        create the user
  edit <id>                     open the edit form
  edit-name|edit-email|edit-phone <v>
                                change the edit form
  save                          save the edit form
  delete <id>                   ask to delete a user
  confirm                       confirm the deletion
  cancel                        close the edit form or the delete prompt
  fav <id>                      toggle favorite
  filter [text]                 filter by name or email; no text clears it
  wait                          wait for queued changes to finish
  help                          this text
  quit                          leave";

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Controller(#[from] ControllerError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{0}` needs a value")]
    MissingValue(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Image,
}

impl Field {
    fn set(self, form: &mut UserDraft, value: String) {
        match self {
            Field::Name => form.full_name = value,
            Field::Email => form.email = value,
            Field::Phone => form.phone = value,
            Field::Image => form.profile_image = value,
        }
    }
}

/// One parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    List,
    SetField(Field, String),
    AutoFill,
    Clear,
    Submit,
    Edit(UserId),
    SetEditField(Field, String),
    Save,
    Delete(UserId),
    Confirm,
    Cancel,
    Favorite(UserId),
    Filter(Option<String>),
    Wait,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Input, ParseError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let value = |name: &'static str| {
        if rest.is_empty() {
            Err(ParseError::MissingValue(name))
        } else {
            Ok(rest.to_string())
        }
    };
    let id = |name: &'static str| {
        value(name).map(|v| v.parse::<UserId>().unwrap_or_else(|never| match never {}))
    };

    Ok(match word {
        "" | "list" | "ls" => Input::List,
        "name" => Input::SetField(Field::Name, value("name")?),
        "email" => Input::SetField(Field::Email, value("email")?),
        "phone" => Input::SetField(Field::Phone, value("phone")?),
        "image" => Input::SetField(Field::Image, value("image")?),
        "autofill" => Input::AutoFill,
        "clear" => Input::Clear,
        "submit" | "add" => Input::Submit,
        "edit" => Input::Edit(id("edit")?),
        "edit-name" => Input::SetEditField(Field::Name, value("edit-name")?),
        "edit-email" => Input::SetEditField(Field::Email, value("edit-email")?),
        "edit-phone" => Input::SetEditField(Field::Phone, value("edit-phone")?),
        "save" => Input::Save,
        "delete" | "rm" => Input::Delete(id("delete")?),
        "confirm" => Input::Confirm,
        "cancel" => Input::Cancel,
        "fav" => Input::Favorite(id("fav")?),
        "filter" => Input::Filter((!rest.is_empty()).then(|| rest.to_string())),
        "wait" => Input::Wait,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    })
}

/// Outcome of a queued command, as its reply channel delivers it.
type Settled = Result<Option<Notice>, oneshot::error::RecvError>;

/// Reads commands from `input` until `quit` or end of input, then waits for queued
/// commands to settle.
pub async fn run<R, W>(
    client: &RosterClient,
    notices: &mut mpsc::UnboundedReceiver<Notice>,
    input: R,
    mut output: W,
) -> Result<(), TerminalError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut queued: JoinSet<Settled> = JoinSet::new();
    client.load().await?;
    flush_notices(notices, &mut output).await?;
    write_screen(client, &mut output).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => output.write_all(format!("{HELP}\n").as_bytes()).await?,
                    Ok(Input::Wait) => {
                        settle_all(&mut queued, &mut output).await?;
                        flush_notices(notices, &mut output).await?;
                        write_screen(client, &mut output).await?;
                    }
                    Ok(input) => {
                        debug!(?input, "Command");
                        if let Some(reply) = execute(client, input, &mut output).await? {
                            queued.spawn(reply);
                        }
                        flush_notices(notices, &mut output).await?;
                        write_screen(client, &mut output).await?;
                    }
                    Err(e) => output.write_all(format!("{e}\n").as_bytes()).await?,
                }
            }
            Some(done) = queued.join_next(), if !queued.is_empty() => {
                report(done, &mut output).await?;
                flush_notices(notices, &mut output).await?;
                write_screen(client, &mut output).await?;
            }
            Some(notice) = notices.recv() => {
                output.write_all(format!("{notice}\n").as_bytes()).await?;
            }
        }
        output.flush().await?;
    }

    if !queued.is_empty() {
        debug!(queued = queued.len(), "Waiting for queued commands");
        settle_all(&mut queued, &mut output).await?;
        flush_notices(notices, &mut output).await?;
        write_screen(client, &mut output).await?;
    }
    output.flush().await?;
    Ok(())
}

/// Runs one command. Commands that start a remote call are only queued; their reply
/// channel is handed back for the caller to await.
async fn execute<W: AsyncWrite + Unpin>(
    client: &RosterClient,
    input: Input,
    output: &mut W,
) -> Result<Option<oneshot::Receiver<Option<Notice>>>, TerminalError> {
    match input {
        Input::List | Input::Wait | Input::Help | Input::Quit => {}
        Input::SetField(field, value) => {
            let mut form = client.subscribe().borrow().create_form.clone();
            field.set(&mut form, value);
            client.set_create_form(form).await?;
        }
        Input::AutoFill => {
            let reply = client
                .dispatch(|respond_to| Command::AutoFill { respond_to })
                .await?;
            return Ok(Some(reply));
        }
        Input::Clear => {
            client.clear_form().await?;
        }
        Input::Submit => {
            let reply = client
                .dispatch(|respond_to| Command::SubmitCreate { respond_to })
                .await?;
            return Ok(Some(reply));
        }
        Input::Edit(id) => {
            client.open_edit(id).await?;
        }
        Input::SetEditField(field, value) => {
            let modal = client.subscribe().borrow().edit_modal.clone();
            let Some(modal) = modal else {
                output.write_all(b"No user is being edited\n").await?;
                return Ok(None);
            };
            let mut form = modal.form;
            field.set(&mut form, value);
            client.set_edit_form(form).await?;
        }
        Input::Save => {
            let reply = client
                .dispatch(|respond_to| Command::SaveEdit { respond_to })
                .await?;
            return Ok(Some(reply));
        }
        Input::Delete(id) => {
            client.open_delete(id).await?;
        }
        Input::Confirm => {
            let reply = client
                .dispatch(|respond_to| Command::ConfirmDelete { respond_to })
                .await?;
            return Ok(Some(reply));
        }
        Input::Cancel => {
            let (editing, deleting) = {
                let screen = client.subscribe();
                let screen = screen.borrow();
                (screen.edit_modal.is_some(), screen.delete_modal.is_some())
            };
            if editing {
                client.cancel_edit().await?;
            } else if deleting {
                client.cancel_delete().await?;
            }
        }
        Input::Favorite(id) => {
            let reply = client
                .dispatch(|respond_to| Command::ToggleFavorite { id, respond_to })
                .await?;
            return Ok(Some(reply));
        }
        Input::Filter(query) => {
            client.filter(query).await?;
        }
    }
    Ok(None)
}

async fn settle_all<W: AsyncWrite + Unpin>(
    queued: &mut JoinSet<Settled>,
    output: &mut W,
) -> std::io::Result<()> {
    while let Some(done) = queued.join_next().await {
        report(done, output).await?;
    }
    Ok(())
}

/// The notice itself arrives on the notice stream; only a lost reply is reported here.
async fn report<W: AsyncWrite + Unpin>(
    done: Result<Settled, JoinError>,
    output: &mut W,
) -> std::io::Result<()> {
    if matches!(done, Ok(Ok(_))) {
        return Ok(());
    }
    warn!("Queued command ended without a reply");
    output
        .write_all(b"A change ended without an answer; run `list` to see the current state\n")
        .await
}

async fn flush_notices<W: AsyncWrite + Unpin>(
    notices: &mut mpsc::UnboundedReceiver<Notice>,
    output: &mut W,
) -> std::io::Result<()> {
    while let Ok(notice) = notices.try_recv() {
        output.write_all(format!("{notice}\n").as_bytes()).await?;
    }
    Ok(())
}

async fn write_screen<W: AsyncWrite + Unpin>(
    client: &RosterClient,
    output: &mut W,
) -> std::io::Result<()> {
    let screen = client.subscribe().borrow().to_string();
    output.write_all(format!("\n{screen}\n\n").as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("name  Ada Lovelace "),
            Ok(Input::SetField(Field::Name, "Ada Lovelace".into()))
        );
        assert_eq!(parse_line("fav 3"), Ok(Input::Favorite(UserId::from(3))));
        assert_eq!(parse_line("filter"), Ok(Input::Filter(None)));
        assert_eq!(parse_line("filter ann"), Ok(Input::Filter(Some("ann".into()))));
        assert_eq!(parse_line(""), Ok(Input::List));
        assert_eq!(parse_line("quit"), Ok(Input::Quit));
        assert_eq!(parse_line("wait"), Ok(Input::Wait));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_line("edit"), Err(ParseError::MissingValue("edit")));
        assert_eq!(parse_line("email   "), Err(ParseError::MissingValue("email")));
        assert_eq!(parse_line("frobnicate"), Err(ParseError::Unknown("frobnicate".into())));
    }
}
