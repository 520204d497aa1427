//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use todo_client::{ApiError, HttpMethod, HttpRequest, HttpResponse, NewTodo, Todo, TodoClient, TodoId};

const BASE_URL: &str = "http://localhost:3000/api";

fn client() -> TodoClient {
    TodoClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match (&req.body, &expected["body"]) {
        (None, Value::Null) => {}
        (Some(body), expected_body) => {
            let body: Value = serde_json::from_str(body).unwrap();
            assert_eq!(&body, expected_body, "{name}: body");
        }
        (None, expected_body) => panic!("{name}: expected body {expected_body}, got none"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Check an error against `expected_error`, or return `false` if the case
/// expects success.
fn check_expected_error<T: std::fmt::Debug>(name: &str, case: &Value, result: &Result<T, ApiError>) -> bool {
    let Some(expected) = case.get("expected_error") else {
        return false;
    };
    let err = result.as_ref().unwrap_err();
    let status = expected["status"].as_u64().unwrap() as u16;
    assert_eq!(err.status(), Some(status), "{name}: status");
    true
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn get_all_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get_all.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_get_all_todos();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_all_todos(simulated(&case));
        if check_expected_error(name, &case, &result) {
            continue;
        }
        let todos = result.unwrap();
        let expected: Vec<Todo> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todos, expected, "{name}: parsed result");
        assert_eq!(serde_json::to_value(&todos).unwrap(), case["expected_result"], "{name}: re-serialized");
    }
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[test]
fn add_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/add.json")) {
        let name = case["name"].as_str().unwrap();
        let input: NewTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_add_todo(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_add_todo(simulated(&case));
        if check_expected_error(name, &case, &result) {
            continue;
        }
        let todo = result.unwrap();
        let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
        assert_eq!(serde_json::to_value(&todo).unwrap(), case["expected_result"], "{name}: re-serialized");
    }
}

// ---------------------------------------------------------------------------
// Update status
// ---------------------------------------------------------------------------

#[test]
fn update_status_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update_status.json")) {
        let name = case["name"].as_str().unwrap();
        let id = TodoId::new(case["input_id"].as_str().unwrap());

        let req = c.build_update_todo_status(&id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_update_todo_status(simulated(&case));
        if check_expected_error(name, &case, &result) {
            continue;
        }
        assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();
        let id = TodoId::new(case["input_id"].as_str().unwrap());

        let req = c.build_delete_todo(&id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_todo(simulated(&case));
        if check_expected_error(name, &case, &result) {
            continue;
        }
        assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
    }
}
