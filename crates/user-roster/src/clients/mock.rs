//! # Mock Clients
//!
//! In-memory stand-ins for [`UserStore`] and [`ProfileSource`] that replay queued
//! expectations, so controller flows can be tested without any HTTP server.
//!
//! ```rust,ignore
//! let store = MockUserStore::new();
//! store.expect_list().return_ok(vec![]);
//! store.expect_create().return_err(StoreError::Create(RequestError::Http { status: 500 }));
//!
//! let system = RosterSystem::start(Arc::new(store.clone()), Arc::new(MockProfileSource::new()));
//! // ... drive the controller ...
//! store.verify(); // every expectation was consumed
//! ```
//!
//! Calls are recorded in order, so a test can also assert that a flow made *no* remote
//! call (`store.calls().is_empty()`). A call with no matching expectation panics.

use crate::clients::error::{ProfileError, StoreError};
use crate::clients::random_profile::ProfileSource;
use crate::clients::store::UserStore;
use crate::model::{User, UserCreate, UserDraft, UserId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// A call received by [`MockUserStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    ListAll,
    Create(UserCreate),
    Update(UserId, User),
    Delete(UserId),
}

enum StoreReply {
    List(Result<Vec<User>, StoreError>),
    Create(Result<User, StoreError>),
    Update(Result<User, StoreError>),
    Delete(bool),
    Panic(&'static str),
}

struct Expectation<R> {
    reply: R,
    gate: Option<Arc<Notify>>,
}

/// Scripted [`UserStore`].
#[derive(Clone, Default)]
pub struct MockUserStore {
    expectations: Arc<Mutex<VecDeque<Expectation<StoreReply>>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl MockUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_list(&self) -> StoreExpectationBuilder<Vec<User>> {
        self.builder(StoreReply::List)
    }

    pub fn expect_create(&self) -> StoreExpectationBuilder<User> {
        self.builder(StoreReply::Create)
    }

    pub fn expect_update(&self) -> StoreExpectationBuilder<User> {
        self.builder(StoreReply::Update)
    }

    /// Expects a `delete`; the reply is the boolean the store reports.
    pub fn expect_delete(&self) -> DeleteExpectationBuilder {
        DeleteExpectationBuilder {
            gate: None,
            expectations: self.expectations.clone(),
        }
    }

    fn builder<T>(
        &self,
        wrap: fn(Result<T, StoreError>) -> StoreReply,
    ) -> StoreExpectationBuilder<T> {
        StoreExpectationBuilder {
            wrap,
            gate: None,
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Panics if some expectation was never consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    async fn next(&self, call: StoreCall) -> StoreReply {
        self.calls.lock().unwrap().push(call.clone());
        let expectation = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = expectation else {
            panic!("Unexpected call with no expectation left: {call:?}");
        };
        if let Some(gate) = expectation.gate {
            gate.notified().await;
        }
        if let StoreReply::Panic(message) = expectation.reply {
            panic!("{message}");
        }
        expectation.reply
    }
}

/// Builder for list/create/update expectations.
pub struct StoreExpectationBuilder<T> {
    wrap: fn(Result<T, StoreError>) -> StoreReply,
    gate: Option<Arc<Notify>>,
    expectations: Arc<Mutex<VecDeque<Expectation<StoreReply>>>>,
}

impl<T> StoreExpectationBuilder<T> {
    /// Holds the reply until `gate.notify_one()` is called, keeping the request in flight.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    /// Panics inside the call instead of replying, like a crashing client would.
    pub fn panic_with(self, message: &'static str) {
        self.expectations.lock().unwrap().push_back(Expectation {
            reply: StoreReply::Panic(message),
            gate: self.gate,
        });
    }

    fn push(self, result: Result<T, StoreError>) {
        self.expectations.lock().unwrap().push_back(Expectation {
            reply: (self.wrap)(result),
            gate: self.gate,
        });
    }
}

/// Builder for `delete` expectations.
pub struct DeleteExpectationBuilder {
    gate: Option<Arc<Notify>>,
    expectations: Arc<Mutex<VecDeque<Expectation<StoreReply>>>>,
}

impl DeleteExpectationBuilder {
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn return_ok(self, deleted: bool) {
        self.expectations.lock().unwrap().push_back(Expectation {
            reply: StoreReply::Delete(deleted),
            gate: self.gate,
        });
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        match self.next(StoreCall::ListAll).await {
            StoreReply::List(result) => result,
            _ => panic!("Expectation mismatch: list_all"),
        }
    }

    async fn create(&self, payload: UserCreate) -> Result<User, StoreError> {
        match self.next(StoreCall::Create(payload)).await {
            StoreReply::Create(result) => result,
            _ => panic!("Expectation mismatch: create"),
        }
    }

    async fn update(&self, id: UserId, user: User) -> Result<User, StoreError> {
        match self.next(StoreCall::Update(id, user)).await {
            StoreReply::Update(result) => result,
            _ => panic!("Expectation mismatch: update"),
        }
    }

    async fn delete(&self, id: UserId) -> bool {
        match self.next(StoreCall::Delete(id)).await {
            StoreReply::Delete(deleted) => deleted,
            _ => panic!("Expectation mismatch: delete"),
        }
    }
}

/// Scripted [`ProfileSource`].
#[derive(Clone, Default)]
pub struct MockProfileSource {
    replies: Arc<Mutex<VecDeque<Result<UserDraft, ProfileError>>>>,
}

impl MockProfileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_fetch(&self, reply: Result<UserDraft, ProfileError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn verify(&self) {
        let replies = self.replies.lock().unwrap();
        if !replies.is_empty() {
            panic!("Not all expectations were met. {} remaining", replies.len());
        }
    }
}

#[async_trait]
impl ProfileSource for MockProfileSource {
    async fn fetch_random_profile(&self) -> Result<UserDraft, ProfileError> {
        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| panic!("Unexpected fetch_random_profile call"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::error::RequestError;

    #[tokio::test]
    async fn test_mock_store_replays_in_order_and_records_calls() {
        let store = MockUserStore::new();
        store.expect_list().return_ok(vec![]);
        store
            .expect_create()
            .return_err(StoreError::Create(RequestError::Http { status: 500 }));
        store.expect_delete().return_ok(true);

        assert!(store.list_all().await.unwrap().is_empty());
        let payload = UserCreate::from(UserDraft::new("Jo", "jo@example.com", "5551234"));
        assert!(store.create(payload.clone()).await.is_err());
        assert!(store.delete(UserId::from(3)).await);

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::ListAll,
                StoreCall::Create(payload),
                StoreCall::Delete(UserId::from(3)),
            ]
        );
        store.verify();
    }

    #[tokio::test]
    async fn test_gated_reply_waits_for_release() {
        let store = MockUserStore::new();
        let gate = Arc::new(Notify::new());
        store.expect_delete().gated(gate.clone()).return_ok(false);

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.delete(UserId::from(1)).await }
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        gate.notify_one();
        assert!(!pending.await.unwrap());
    }
}
