//! Random profile generator used by the auto-fill button.

use crate::clients::error::{ProfileError, RequestError};
use crate::model::UserDraft;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Source of one random set of form values. No retries.
#[async_trait]
pub trait ProfileSource: Send + Sync + 'static {
    async fn fetch_random_profile(&self) -> Result<UserDraft, ProfileError>;
}

/// [`ProfileSource`] backed by the randomuser.me API.
#[derive(Clone)]
pub struct RandomUserClient {
    http: Client,
    url: String,
}

impl RandomUserClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct RandomUserResponse {
    results: Vec<RandomUserResult>,
}

#[derive(Debug, Deserialize)]
struct RandomUserResult {
    name: RandomUserName,
    email: String,
    phone: String,
    picture: RandomUserPicture,
}

#[derive(Debug, Deserialize)]
struct RandomUserName {
    first: String,
    last: String,
}

#[derive(Debug, Deserialize)]
struct RandomUserPicture {
    large: String,
}

impl RandomUserResponse {
    fn into_draft(self) -> Result<UserDraft, ProfileError> {
        let person = self.results.into_iter().next().ok_or(ProfileError::Empty)?;
        Ok(UserDraft {
            full_name: format!("{} {}", person.name.first, person.name.last),
            email: person.email,
            phone: person.phone,
            profile_image: person.picture.large,
        })
    }
}

#[async_trait]
impl ProfileSource for RandomUserClient {
    #[instrument(skip(self))]
    async fn fetch_random_profile(&self) -> Result<UserDraft, ProfileError> {
        debug!(url = %self.url, "Sending request");
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(RequestError::from)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Http {
                status: status.as_u16(),
            }
            .into());
        }
        let body: RandomUserResponse = response
            .json()
            .await
            .map_err(|e| RequestError::Decode(e.to_string()))?;
        body.into_draft()
    }
}
