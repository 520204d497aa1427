//! Client round-trips against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every operation
//! through `TodoApi` with the real ureq transport. Validates that request
//! building, transport and response parsing agree with the actual server.

use std::net::SocketAddr;

use axum::http::StatusCode;
use todo_client::{ApiError, ClientConfig, NewTodo, Todo, TodoApi, TodoId};

/// Serve `router` on a random local port from a background thread.
fn spawn_server(router: axum::Router) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_todo_server::serve(listener, router).await
        })
        .unwrap();
    });

    addr
}

fn api_for(addr: SocketAddr) -> TodoApi {
    TodoApi::new(&ClientConfig::new(format!("http://{addr}/")))
}

#[test]
fn crud_lifecycle() {
    let api = api_for(spawn_server(mock_todo_server::app()));

    // Step 1: list — should be empty.
    let todos = api.get_all_todos().unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 2: add two todos.
    let first = api.add_todo(&NewTodo::new("Integration test")).unwrap();
    assert_eq!(first.value, "Integration test");
    assert!(!first.is_completed);
    let second = api.add_todo("Second").unwrap();

    // Step 3: list returns both, in server order.
    let todos = api.get_all_todos().unwrap();
    assert_eq!(todos, vec![first.clone(), second.clone()]);

    // Step 4: toggle status; the server decides the new value.
    let body = api.update_todo_status(&first.id).unwrap();
    assert_eq!(body["id"], first.id.to_string());
    assert_eq!(body["isCompleted"], true);
    let toggled: Todo = serde_json::from_value(body).unwrap();

    // Step 5: re-adding a completed todo still creates an incomplete one.
    let copy = api.add_todo(&toggled).unwrap();
    assert_ne!(copy.id, toggled.id);
    assert!(!copy.is_completed);

    // Step 6: delete returns the server's acknowledgement.
    let deleted = api.delete_todo(&first.id).unwrap();
    assert_eq!(deleted["id"], first.id.to_string());

    // Step 7: delete again — surfaces the raw 404.
    let err = api.delete_todo(&first.id).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    // Step 8: list — the other two remain.
    let todos = api.get_all_todos().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].id, second.id);
    assert_eq!(todos[1].id, copy.id);
}

#[test]
fn update_unknown_id_surfaces_status() {
    let api = api_for(spawn_server(mock_todo_server::app()));
    let err = api.update_todo_status(&TodoId::new("nope")).unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn server_error_rejects_listing() {
    let api = api_for(spawn_server(mock_todo_server::failing_app(
        StatusCode::INTERNAL_SERVER_ERROR,
    )));
    let err = api.get_all_todos().unwrap_err();
    match err {
        ApiError::Http { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "simulated failure");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let err = api_for(addr).get_all_todos().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
