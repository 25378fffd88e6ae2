//! # Mock REST Server
//!
//! A json-server stand-in for local runs and tests: the `/users` collection served by
//! `axum` on top of a [`ResourceActor<User>`].
//!
//! | Route                | Success                      | Failure                    |
//! |----------------------|------------------------------|----------------------------|
//! | `GET /users`         | `200`, every user in order   |                            |
//! | `POST /users`        | `201`, the stored record     | `400` on a bad body, `507` once ids run out |
//! | `GET /users/{id}`    | `200`, the record            | `404`                      |
//! | `PUT /users/{id}`    | `200`, the replaced record   | `404`, `400` on a bad body |
//! | `DELETE /users/{id}` | `200`, the removed record    | `404`                      |
//!
//! Ids are minted sequentially from 1, or from one past the largest numeric id in the
//! seed.

pub mod entity;

use crate::model::{User, UserCreate, UserId};
use actor_framework::{FrameworkError, ResourceActor, ResourceClient};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::path::Path as FsPath;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

/// Failure answered to an HTTP caller.
#[derive(Debug)]
enum ApiError {
    BadBody(String),
    Backend(FrameworkError),
}

impl From<FrameworkError> for ApiError {
    fn from(e: FrameworkError) -> Self {
        ApiError::Backend(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadBody(message) => {
                debug!(%message, "Rejected body");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Backend(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
            }
            ApiError::Backend(FrameworkError::IdsExhausted) => {
                warn!("Create refused, no ids left");
                (
                    StatusCode::INSUFFICIENT_STORAGE,
                    Json(json!({ "error": "no ids left" })),
                )
                    .into_response()
            }
            ApiError::Backend(e) => {
                warn!(error = %e, "Store unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}

fn user_id(raw: String) -> UserId {
    raw.parse().unwrap_or_else(|never| match never {})
}

async fn list_users(State(users): State<ResourceClient<User>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(users.list().await?))
}

async fn create_user(
    State(users): State<ResourceClient<User>>,
    body: Result<Json<UserCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(payload) = body?;
    let user = users.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(users): State<ResourceClient<User>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = user_id(id);
    match users.get(id.clone()).await? {
        Some(user) => Ok(Json(user)),
        None => Err(FrameworkError::NotFound(id.to_string()).into()),
    }
}

async fn replace_user(
    State(users): State<ResourceClient<User>>,
    Path(id): Path<String>,
    body: Result<Json<UserCreate>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(payload) = body?;
    Ok(Json(users.replace(user_id(id), payload).await?))
}

async fn delete_user(
    State(users): State<ResourceClient<User>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(users.delete(user_id(id)).await?))
}

/// The `/users` routes over an already running actor.
pub fn router(users: ResourceClient<User>) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(replace_user).delete(delete_user),
        )
        .with_state(users)
}

/// Counter start for a seeded store: one past the largest numeric id.
pub fn next_id_hint(users: &[User]) -> u32 {
    users
        .iter()
        .filter_map(|u| u.id.as_str().parse::<u32>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Serves the mock on `listener` until `shutdown` resolves.
///
/// The backing actor stops once the server has drained its connections.
pub async fn serve(
    listener: TcpListener,
    seed: Vec<User>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let (mut actor, users) = ResourceActor::<User>::new(64);
    let hint = next_id_hint(&seed);
    actor.seed(seed, hint);
    let handle = tokio::spawn(actor.run());

    info!(addr = %listener.local_addr()?, "Mock server listening");
    axum::serve(listener, router(users))
        .with_graceful_shutdown(shutdown)
        .await?;

    let _ = handle.await;
    info!("Mock server stopped");
    Ok(())
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    Db { users: Vec<User> },
    Bare(Vec<User>),
}

/// Reads users from a json-server `db.json` (`{ "users": [...] }`) or a bare array.
pub fn parse_seed(text: &str) -> Result<Vec<User>, SeedError> {
    Ok(match serde_json::from_str(text)? {
        SeedFile::Db { users } | SeedFile::Bare(users) => users,
    })
}

pub fn load_seed(path: &FsPath) -> Result<Vec<User>, SeedError> {
    let text = std::fs::read_to_string(path)?;
    let users = parse_seed(&text)?;
    info!(path = %path.display(), users = users.len(), "Seed loaded");
    Ok(users)
}
