//! Snapshot refresh and mutation round trips against a mock backend.
//!
//! Covers:
//! - owned and shared lists fetched together and merged without duplicates
//! - accepted mutations re-fetching the snapshot instead of patching locally
//! - rejected creates keeping the draft and surfacing the backend message
//! - updates carrying the full task document, unknown fields included
//! - failed deletes leaving the snapshot alone
//! - a logout racing an in-flight refresh discarding the stale snapshot

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdeck::api::ApiClient;
use taskdeck::app::{App, Screen};
use taskdeck::appearance::Appearance;
use taskdeck::net::{self, NetCommand, NetEvent};
use taskdeck::session::{AuthSlot, SessionManager};
use taskdeck::storage::StateStore;
use taskdeck::tasks::Synchronizer;
use taskdeck_api::task::TaskDraft;

// =============================================================================
// Helpers
// =============================================================================

struct Stack {
    _dir: tempfile::TempDir,
    session: Arc<SessionManager>,
    commands: mpsc::Sender<NetCommand>,
    events: mpsc::Receiver<NetEvent>,
    app: App,
}

/// Wires the full networking stack against a mock server with an already
/// open session, as if the user had just logged in.
fn make_stack(server: &MockServer) -> Stack {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = StateStore::open(dir.path()).expect("open state store");
    let auth = AuthSlot::new();
    let session = Arc::new(SessionManager::restore(auth.clone(), store.clone()));
    session.login("tok".to_string());
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
    let mut app = App::new(Appearance::load(store));
    app.screen = Screen::Tasks;
    Stack {
        _dir: dir,
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

/// Applies whatever arrives for `window`, then returns.
async fn drain_for(stack: &mut Stack, window: Duration) {
    let deadline = tokio::time::Instant::now() + window;
    while tokio::time::Instant::now() < deadline {
        if let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(50), stack.events.recv()).await
        {
            stack.app.apply_net_event(event);
        }
    }
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
// Refresh and merge
// =============================================================================

#[tokio::test]
async fn refresh_merges_owned_and_shared_without_duplicates() {
    let server = MockServer::start().await;
    mount_task_lists(
        &server,
        serde_json::json!([
            {"_id": "t1", "title": "Mine", "status": "Pending"},
            {"_id": "t2", "title": "Mine, shared back", "status": "In Progress"},
        ]),
        serde_json::json!([
            {"_id": "t2", "title": "Same task seen as shared", "status": "In Progress"},
            {"_id": "t3", "title": "Theirs", "status": "Completed"},
        ]),
    )
    .await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::Refresh)
        .await
        .expect("send refresh");

    pump_until(&mut stack, |app| !app.tasks.is_empty()).await;

    let ids: Vec<&str> = stack.app.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["t1", "t2", "t3"]);
    // The owned copy of t2 wins over the shared one.
    assert_eq!(stack.app.tasks[1].title, "Mine, shared back");
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn accepted_create_refetches_and_clears_the_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_partial_json(
            serde_json::json!({"title": "Water plants", "status": "Pending"}),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    mount_task_lists(
        &server,
        serde_json::json!([{"_id": "t9", "title": "Water plants", "status": "Pending"}]),
        serde_json::json!([]),
    )
    .await;

    let mut stack = make_stack(&server);
    stack.app.form.title = "Water plants".to_string();
    stack
        .commands
        .send(NetCommand::Create {
            draft: TaskDraft {
                title: "Water plants".to_string(),
                status: taskdeck_api::task::TaskStatus::Pending,
            },
        })
        .await
        .expect("send create");

    pump_until(&mut stack, |app| {
        !app.tasks.is_empty() && app.form.title.is_empty()
    })
    .await;

    assert_eq!(stack.app.tasks[0].id, "t9");
    assert!(stack.app.form.error.is_none());
}

#[tokio::test]
async fn rejected_create_keeps_the_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"message": "Title is required"})),
        )
        .mount(&server)
        .await;
    // A rejected mutation must not trigger a refetch.
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mut stack = make_stack(&server);
    stack.app.form.title = "Water plants".to_string();
    stack
        .commands
        .send(NetCommand::Create {
            draft: TaskDraft {
                title: String::new(),
                status: taskdeck_api::task::TaskStatus::Pending,
            },
        })
        .await
        .expect("send create");

    pump_until(&mut stack, |app| app.form.error.is_some()).await;

    assert_eq!(stack.app.form.error.as_deref(), Some("Title is required"));
    assert_eq!(stack.app.form.title, "Water plants");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_sends_the_full_document() {
    let server = MockServer::start().await;
    mount_task_lists(
        &server,
        serde_json::json!([{
            "_id": "t1",
            "title": "Original",
            "status": "Pending",
            "sharedWith": ["u2"],
            "priority": "high",
        }]),
        serde_json::json!([]),
    )
    .await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::Refresh)
        .await
        .expect("send refresh");
    pump_until(&mut stack, |app| !app.tasks.is_empty()).await;

    // Fields the client does not model must ride along unchanged.
    Mock::given(method("PUT"))
        .and(path("/api/tasks/t1"))
        .and(body_partial_json(serde_json::json!({
            "title": "Renamed",
            "status": "Pending",
            "sharedWith": ["u2"],
            "priority": "high",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut task = stack.app.tasks[0].clone();
    stack.app.form.editing = Some(task.clone());
    task.title = "Renamed".to_string();
    stack
        .commands
        .send(NetCommand::Update { task })
        .await
        .expect("send update");

    // The edit target clears only once the backend confirms the update.
    pump_until(&mut stack, |app| !app.form.is_editing()).await;
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn failed_delete_leaves_the_snapshot_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([{"_id": "t1", "title": "Sticky", "status": "Pending"}]),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::Refresh)
        .await
        .expect("send refresh");
    pump_until(&mut stack, |app| !app.tasks.is_empty()).await;

    stack
        .commands
        .send(NetCommand::Delete {
            task_id: "t1".to_string(),
        })
        .await
        .expect("send delete");

    // The failure is log-only: no events, no refetch, no modal.
    drain_for(&mut stack, Duration::from_millis(400)).await;
    assert_eq!(stack.app.tasks.len(), 1);
    assert!(!stack.app.modal.is_open());
}

// =============================================================================
// Stale refresh discarded
// =============================================================================

#[tokio::test]
async fn logout_discards_an_in_flight_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(
                    serde_json::json!([{"_id": "t1", "title": "Late", "status": "Pending"}]),
                )
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let mut stack = make_stack(&server);
    stack
        .commands
        .send(NetCommand::Refresh)
        .await
        .expect("send refresh");

    // Log out while the fetch is still sleeping on the mock's delay.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let command = stack
        .app
        .handle_key_event(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL))
        .expect("ctrl-l yields a logout command");
    stack.commands.send(command).await.expect("send logout");

    // Give the delayed response time to land, then check nothing leaked.
    drain_for(&mut stack, Duration::from_millis(800)).await;
    assert_eq!(stack.app.screen, Screen::Login);
    assert!(stack.app.tasks.is_empty());
    assert!(!stack.session.is_active());
}
