//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use serde_json::Value;

use crate::types::{AddTodoRequest, DeleteResult, Todo, TodoDraft, TodoId, UpdateResult};

/// Characters escaped when an id is placed in a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Synchronous, stateless client for the todo API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. See `TodoApi` for a version that also executes.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_all_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/get-todo", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Only the draft's text is read; `isCompleted` is always sent as `false`.
    pub fn build_add_todo<D: TodoDraft + ?Sized>(&self, todo: &D) -> Result<HttpRequest, ApiError> {
        let payload = AddTodoRequest::from_draft(todo);
        let body = serde_json::to_string(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/add-todo", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Bodiless POST. Whether the server flips or sets the flag is its own
    /// contract; the client never learns the old value.
    pub fn build_update_todo_status(&self, id: &TodoId) -> HttpRequest {
        self.bodiless_post("update-todo", id)
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        self.bodiless_post("del-todo", id)
    }

    pub fn parse_get_all_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        decode(response)
    }

    pub fn parse_add_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        decode(response)
    }

    /// The answer's shape is up to the server and comes back as raw JSON.
    pub fn parse_update_todo_status(&self, response: HttpResponse) -> Result<UpdateResult, ApiError> {
        decode_raw(response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<DeleteResult, ApiError> {
        decode_raw(response)
    }

    fn bodiless_post(&self, endpoint: &str, id: &TodoId) -> HttpRequest {
        let id = id.to_string();
        let segment = utf8_percent_encode(&id, PATH_SEGMENT);
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/{endpoint}/{segment}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// Any 2xx is success; everything else is handed back untouched.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// An empty body yields `Null`; a body that is not JSON is returned as a
/// JSON string holding the raw text.
fn decode_raw(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response)?;
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&response.body).unwrap_or(Value::String(response.body)))
}
