use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use user_roster::clients::mock::MockProfileSource;
use user_roster::clients::{HttpUserStore, RequestError, StoreError, UserStore};
use user_roster::controller::Severity;
use user_roster::lifecycle::RosterSystem;
use user_roster::mock_server;
use user_roster::model::{User, UserCreate, UserDraft, UserId, PLACEHOLDER_IMAGE};

struct MockServer {
    base_url: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl MockServer {
    async fn start(seed: Vec<User>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(mock_server::serve(listener, seed, async {
            let _ = stopped.await;
        }));
        Self {
            base_url: format!("http://{addr}"),
            stop,
            handle,
        }
    }

    fn store(&self) -> HttpUserStore {
        HttpUserStore::new(&self.base_url, Duration::from_secs(5)).unwrap()
    }

    async fn stop(self) {
        let _ = self.stop.send(());
        self.handle.await.unwrap().unwrap();
    }
}

fn payload(name: &str) -> UserCreate {
    UserCreate::from(UserDraft::new(
        name,
        format!("{}@example.com", name.to_lowercase()),
        "555-1234",
    ))
}

#[tokio::test]
async fn test_create_assigns_sequential_ids_and_lists_in_order() {
    let server = MockServer::start(vec![]).await;
    let store = server.store();

    assert!(store.list_all().await.unwrap().is_empty());

    let ann = store.create(payload("Ann")).await.unwrap();
    let bob = store.create(payload("Bob")).await.unwrap();
    assert_eq!(ann.id, UserId::from(1));
    assert_eq!(bob.id, UserId::from(2));
    assert!(!ann.favorite);
    assert_eq!(ann.profile_image, PLACEHOLDER_IMAGE);

    let users = store.list_all().await.unwrap();
    assert_eq!(users, vec![ann, bob]);

    server.stop().await;
}

#[tokio::test]
async fn test_update_replaces_record_and_404s_unknown_ids() {
    let server = MockServer::start(vec![]).await;
    let store = server.store();

    let ann = store.create(payload("Ann")).await.unwrap();
    let favorite = ann.with_favorite_toggled();
    let updated = store.update(ann.id.clone(), favorite.clone()).await.unwrap();
    assert_eq!(updated, favorite);
    assert_eq!(store.list_all().await.unwrap(), vec![favorite.clone()]);

    let ghost = User {
        id: UserId::from(42),
        ..favorite
    };
    let err = store.update(UserId::from(42), ghost).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Update {
            id: UserId::from(42),
            source: RequestError::Http { status: 404 },
        }
    );

    server.stop().await;
}

#[tokio::test]
async fn test_delete_reports_success_as_bool() {
    let server = MockServer::start(vec![]).await;
    let store = server.store();

    let ann = store.create(payload("Ann")).await.unwrap();
    let bob = store.create(payload("Bob")).await.unwrap();

    assert!(store.delete(ann.id.clone()).await);
    assert!(!store.delete(ann.id).await);
    assert_eq!(store.list_all().await.unwrap(), vec![bob.clone()]);

    // ids are never handed out twice
    let cid = store.create(payload("Cid")).await.unwrap();
    assert_eq!(cid.id, UserId::from(3));

    server.stop().await;
}

#[tokio::test]
async fn test_seeded_server_continues_numbering() {
    let seed = vec![User::from_payload(UserId::from(7), payload("Ann"))];
    let server = MockServer::start(seed).await;
    let store = server.store();

    let bob = store.create(payload("Bob")).await.unwrap();
    assert_eq!(bob.id, UserId::from(8));
    assert_eq!(store.list_all().await.unwrap().len(), 2);

    server.stop().await;
}

#[tokio::test]
async fn test_seed_at_largest_id_refuses_create_and_keeps_serving() {
    let seed = vec![User::from_payload(UserId::from(u32::MAX), payload("Ann"))];
    let server = MockServer::start(seed).await;
    let store = server.store();

    let err = store.create(payload("Bob")).await.unwrap_err();
    assert_eq!(err, StoreError::Create(RequestError::Http { status: 507 }));

    let users = store.list_all().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, UserId::from(u32::MAX));

    server.stop().await;
}

#[tokio::test]
async fn test_bad_body_is_rejected_with_400() {
    let server = MockServer::start(vec![]).await;

    let response = reqwest::Client::new()
        .post(format!("{}/users", server.base_url))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = reqwest::get(format!("{}/users/99", server.base_url))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpUserStore::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = store.list_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Fetch(RequestError::Transport(_))));
    assert!(!store.delete(UserId::from(1)).await);
}

#[tokio::test]
async fn test_controller_against_mock_server() {
    let server = MockServer::start(vec![]).await;
    let profiles = MockProfileSource::new();
    let system = RosterSystem::start(Arc::new(server.store()), Arc::new(profiles.clone()));
    let client = &system.client;

    assert_eq!(client.load().await.unwrap(), None);

    client
        .set_create_form(UserDraft::new("Ada Lovelace", "ada@example.com", "+44 20 7946"))
        .await
        .unwrap();
    let reply = client.submit_create().await.unwrap().unwrap();
    assert_eq!(reply.severity, Severity::Success);

    let id = client.snapshot().await.unwrap().users[0].id.clone();
    let reply = client.toggle_favorite(id.clone()).await.unwrap().unwrap();
    assert_eq!(reply.severity, Severity::Info);

    client.open_delete(id.clone()).await.unwrap();
    let reply = client.confirm_delete().await.unwrap().unwrap();
    assert_eq!(reply.severity, Severity::Warning);
    assert!(client.snapshot().await.unwrap().users.is_empty());

    // the server agrees
    assert!(server.store().list_all().await.unwrap().is_empty());

    system.shutdown().await;
    server.stop().await;
}
