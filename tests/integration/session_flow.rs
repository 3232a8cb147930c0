//! Session lifecycle against a mock backend.
//!
//! Drives the networking worker with real commands and applies the resulting
//! events to the app state, verifying:
//! - login and registration land on the task board with tasks loaded
//! - rejected credentials surface the backend's message on the login screen
//! - the token travels raw in the Authorization header on every call
//! - a 401 anywhere tears the whole session down
//! - a persisted token restores the session across restarts

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdeck::api::ApiClient;
use taskdeck::app::{App, Screen};
use taskdeck::appearance::Appearance;
use taskdeck::net::{self, NetCommand, NetEvent};
use taskdeck::session::{AuthSlot, SessionManager};
use taskdeck::storage::StateStore;
use taskdeck::tasks::Synchronizer;

// =============================================================================
// Helpers
// =============================================================================

struct Stack {
    _dir: tempfile::TempDir,
    store: StateStore,
    session: Arc<SessionManager>,
    commands: mpsc::Sender<NetCommand>,
    events: mpsc::Receiver<NetEvent>,
    app: App,
}

/// Wires storage, session custody, the REST client, and the networking
/// worker against a mock server, exactly as the binary does at startup.
fn make_stack(server: &MockServer) -> Stack {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StateStore::open(dir.path()).expect("open state store");
    let auth = AuthSlot::new();
    let session = Arc::new(SessionManager::restore(auth.clone(), store.clone()));
    let api = Arc::new(
        ApiClient::new(
            server.uri().parse().expect("mock server url"),
            auth,
            Duration::from_secs(2),
        )
        .expect("api client"),
    );
    let sync = Synchronizer::new(Arc::clone(&api), Arc::clone(&session));
    let (evt_tx, events) = mpsc::channel(32);
    let commands = net::spawn_worker(api, sync, Arc::clone(&session), evt_tx, 32);
    let app = App::new(Appearance::load(store.clone()));
    Stack {
        _dir: dir,
        store,
        session,
        commands,
        events,
        app,
    }
}

/// Applies incoming events to the app until `predicate` holds.
async fn pump_until(stack: &mut Stack, predicate: impl Fn(&App) -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_millis(500), stack.events.recv()).await {
            Ok(Some(event)) => {
                stack.app.apply_net_event(event);
                if predicate(&stack.app) {
                    return;
                }
            }
            Ok(None) => panic!("event channel closed"),
            Err(_) => {}
        }
    }
    panic!("timed out waiting for app state");
}

async fn mount_task_lists(
    server: &MockServer,
    owned: serde_json::Value,
    shared: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(owned))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(shared))
        .mount(server)
        .await;
}

// =============================================================================
// Login and registration
// =============================================================================

#[tokio::test]
async fn login_lands_on_the_task_board() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(
            serde_json::json!({"username": "ada", "password": "pw"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-1"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_lists(
        &server,
        serde_json::json!([{"_id": "t1", "title": "Ship it", "status": "Pending"}]),
        serde_json::json!([]),
    )
    .await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::LogIn {
            username: "ada".to_string(),
            password: "pw".to_string(),
        })
        .await
        .expect("send login");

    pump_until(&mut stack, |app| {
        app.screen == Screen::Tasks && !app.tasks.is_empty()
    })
    .await;

    assert!(stack.session.is_active());
    assert_eq!(stack.store.token().as_deref(), Some("tok-1"));
    assert_eq!(stack.app.tasks[0].title, "Ship it");
}

#[tokio::test]
async fn registration_opens_a_session_like_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-new"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_lists(&server, serde_json::json!([]), serde_json::json!([])).await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::Register {
            username: "newbie".to_string(),
            password: "pw".to_string(),
        })
        .await
        .expect("send register");

    pump_until(&mut stack, |app| app.screen == Screen::Tasks).await;

    assert!(stack.session.is_active());
    assert_eq!(stack.store.token().as_deref(), Some("tok-new"));
}

#[tokio::test]
async fn rejected_login_stays_on_the_login_screen() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let mut stack = make_stack(&server);
    stack.app.login.busy = true;
    stack
        .commands
        .send(NetCommand::LogIn {
            username: "ada".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect("send login");

    pump_until(&mut stack, |app| app.login.error.is_some()).await;

    assert_eq!(stack.app.screen, Screen::Login);
    assert_eq!(stack.app.login.error.as_deref(), Some("Invalid credentials"));
    assert!(!stack.app.login.busy);
    assert!(!stack.session.is_active());
    assert!(stack.store.token().is_none());
}

// =============================================================================
// Token custody
// =============================================================================

#[tokio::test]
async fn token_travels_raw_in_the_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "raw-tok-123"})),
        )
        .mount(&server)
        .await;
    // These mocks only match when the header carries the bare token,
    // no Bearer prefix.
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(header("authorization", "raw-tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([{"_id": "t1", "title": "Authorized", "status": "Pending"}]),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/shared"))
        .and(header("authorization", "raw-tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::LogIn {
            username: "ada".to_string(),
            password: "pw".to_string(),
        })
        .await
        .expect("send login");

    // The task only loads if both GETs matched the raw-header mocks.
    pump_until(&mut stack, |app| !app.tasks.is_empty()).await;
}

#[tokio::test]
async fn persisted_token_restores_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-1"})))
        .mount(&server)
        .await;
    mount_task_lists(&server, serde_json::json!([]), serde_json::json!([])).await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::LogIn {
            username: "ada".to_string(),
            password: "pw".to_string(),
        })
        .await
        .expect("send login");
    pump_until(&mut stack, |app| app.screen == Screen::Tasks).await;

    // A fresh manager over the same directory picks the token straight up.
    let auth = AuthSlot::new();
    let restored = SessionManager::restore(auth.clone(), stack.store.clone());
    assert!(restored.is_active());
    assert_eq!(auth.get().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn logout_clears_the_persisted_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-1"})))
        .mount(&server)
        .await;
    mount_task_lists(&server, serde_json::json!([]), serde_json::json!([])).await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::LogIn {
            username: "ada".to_string(),
            password: "pw".to_string(),
        })
        .await
        .expect("send login");
    pump_until(&mut stack, |app| app.screen == Screen::Tasks).await;

    stack
        .commands
        .send(NetCommand::LogOut)
        .await
        .expect("send logout");

    // LogOut emits no event; poll the store directly.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while stack.store.token().is_some() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for the token to clear"
        );
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert!(!stack.session.is_active());
}

// =============================================================================
// Forced logout on 401
// =============================================================================

#[tokio::test]
async fn expired_token_forces_logout_everywhere() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "stale"})))
        .mount(&server)
        .await;
    // The backend accepted the credentials but no longer honors the token.
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/shared"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::LogIn {
            username: "ada".to_string(),
            password: "pw".to_string(),
        })
        .await
        .expect("send login");

    // The session opens on the login response, then the first refresh hits
    // the 401 and tears everything down.
    pump_until(&mut stack, |app| {
        app.screen == Screen::Login && app.login.error.is_some()
    })
    .await;

    assert_eq!(
        stack.app.login.error.as_deref(),
        Some("Session expired, log in again")
    );
    assert!(!stack.session.is_active());
    assert!(stack.store.token().is_none());
    assert!(stack.app.tasks.is_empty());
}
