use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Notify;
use user_roster::clients::mock::{MockProfileSource, MockUserStore, StoreCall};
use user_roster::lifecycle::RosterSystem;
use user_roster::model::{User, UserId, PLACEHOLDER_IMAGE};
use user_roster::terminal;

fn jo(favorite: bool) -> User {
    User {
        id: UserId::from(1),
        full_name: "Jo".to_string(),
        email: "jo@example.com".to_string(),
        phone: "555-1234".to_string(),
        profile_image: PLACEHOLDER_IMAGE.to_string(),
        favorite,
    }
}

#[tokio::test]
async fn test_scripted_session() {
    let store = MockUserStore::new();
    let profiles = MockProfileSource::new();
    store.expect_list().return_ok(vec![]);
    store.expect_create().return_ok(jo(false));
    store.expect_update().return_ok(jo(true));

    let mut system = RosterSystem::start(Arc::new(store.clone()), Arc::new(profiles));
    let script = "\
name Jo
email jo@example.com
phone 555-1234
submit
wait
fav 1
bogus
quit
submit
";
    let mut output = Vec::new();
    terminal::run(&system.client, &mut system.notices, script.as_bytes(), &mut output)
        .await
        .unwrap();
    system.shutdown().await;

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("No users registered"));
    assert!(output.contains("[success] User added"));
    assert!(output.contains("[info] Added to favorites"));
    assert!(output.contains("[1] Jo"));
    assert!(output.contains("unknown command: bogus"));

    // nothing after `quit` is executed
    assert_eq!(
        store.calls().into_iter().filter(|c| matches!(c, StoreCall::Create(_))).count(),
        1
    );
    store.verify();
}

#[tokio::test]
async fn test_edit_field_without_open_modal() {
    let store = MockUserStore::new();
    store.expect_list().return_ok(vec![jo(false)]);

    let mut system =
        RosterSystem::start(Arc::new(store.clone()), Arc::new(MockProfileSource::new()));
    let mut output = Vec::new();
    terminal::run(
        &system.client,
        &mut system.notices,
        "edit-name Joanna\nedit 1\nedit-email x\nsave\ncancel\n".as_bytes(),
        &mut output,
    )
    .await
    .unwrap();
    system.shutdown().await;

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("No user is being edited"));
    assert!(output.contains("Editing user 1"));
    assert!(output.contains("[danger] Invalid email"));
    assert_eq!(store.calls(), vec![StoreCall::ListAll]);
}

#[tokio::test]
async fn test_prompt_stays_responsive_while_a_change_is_pending() {
    let store = MockUserStore::new();
    store.expect_list().return_ok(vec![jo(false)]);
    let gate = Arc::new(Notify::new());
    store.expect_update().gated(gate.clone()).return_ok(jo(true));

    let mut system =
        RosterSystem::start(Arc::new(store.clone()), Arc::new(MockProfileSource::new()));
    let (mut keyboard, input) = tokio::io::duplex(1024);
    let (output, mut display) = tokio::io::duplex(64 * 1024);

    let session = terminal::run(
        &system.client,
        &mut system.notices,
        BufReader::new(input),
        output,
    );
    let user = async {
        keyboard.write_all(b"fav 1\nfav 1\n").await.unwrap();

        // the second toggle is answered while the first still waits on the server
        let mut seen = Vec::new();
        let mut chunk = [0u8; 1024];
        while !String::from_utf8_lossy(&seen).contains("still in progress") {
            let n = display.read(&mut chunk).await.unwrap();
            assert!(n > 0, "session ended early");
            seen.extend_from_slice(&chunk[..n]);
        }
        assert!(!String::from_utf8_lossy(&seen).contains("Added to favorites"));

        gate.notify_one();
        keyboard.write_all(b"quit\n").await.unwrap();
        display.read_to_end(&mut seen).await.unwrap();
        String::from_utf8(seen).unwrap()
    };

    let (outcome, seen) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(session, user)
    })
    .await
    .expect("terminal blocked on a pending change");
    outcome.unwrap();
    system.shutdown().await;

    assert!(seen.contains("[warning] Another change to this user is still in progress"));
    assert!(seen.contains("[info] Added to favorites"));
    assert_eq!(
        store.calls(),
        vec![StoreCall::ListAll, StoreCall::Update(UserId::from(1), jo(true))]
    );
    store.verify();
}
