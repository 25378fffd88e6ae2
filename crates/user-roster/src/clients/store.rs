//! # Users REST Client
//!
//! [`UserStore`] is the seam between the controller and the json-server style `/users`
//! resource. [`HttpUserStore`] talks to a real server; tests swap in
//! [`MockUserStore`](crate::clients::mock::MockUserStore).

use crate::clients::error::{RequestError, StoreError};
use crate::model::{User, UserCreate, UserId};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// CRUD over the users resource.
///
/// `delete` reports failure as `false` instead of an error; the cause is logged.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// `GET /users`, in server order.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// `POST /users`. Each call may mint a new id.
    async fn create(&self, payload: UserCreate) -> Result<User, StoreError>;

    /// `PUT /users/{id}` with the full record.
    async fn update(&self, id: UserId, user: User) -> Result<User, StoreError>;

    /// `DELETE /users/{id}`.
    async fn delete(&self, id: UserId) -> bool;
}

/// [`UserStore`] backed by HTTP calls through `reqwest`.
#[derive(Clone)]
pub struct HttpUserStore {
    http: Client,
    users_url: String,
}

impl HttpUserStore {
    /// `base_url` is the server root (e.g. `http://localhost:3000`); `/users` is appended.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            users_url: format!("{}/users", base_url.trim_end_matches('/')),
        })
    }

    fn user_url(&self, id: &UserId) -> String {
        format!("{}/{}", self.users_url, id)
    }
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response, RequestError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(RequestError::Http {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RequestError> {
    let response = send(request).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| RequestError::Decode(e.to_string()))
}

#[async_trait]
impl UserStore for HttpUserStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        debug!("Sending request");
        send_json(self.http.get(&self.users_url))
            .await
            .map_err(StoreError::Fetch)
    }

    #[instrument(skip(self))]
    async fn create(&self, payload: UserCreate) -> Result<User, StoreError> {
        debug!("Sending request");
        send_json(self.http.post(&self.users_url).json(&payload))
            .await
            .map_err(StoreError::Create)
    }

    #[instrument(skip(self, user))]
    async fn update(&self, id: UserId, user: User) -> Result<User, StoreError> {
        debug!(?user, "Sending request");
        send_json(self.http.put(self.user_url(&id)).json(&user))
            .await
            .map_err(|source| StoreError::Update { id, source })
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> bool {
        debug!("Sending request");
        match send(self.http.delete(self.user_url(&id))).await {
            Ok(_) => true,
            Err(source) => {
                let e = StoreError::Delete { id, source };
                warn!(error = %e, "Delete failed");
                false
            }
        }
    }
}
