//! Executing side of the host-does-IO split.
//!
//! # Design
//! `Transport` is the seam between the deterministic core and the network.
//! `UreqTransport` is the blocking default; tests and embedders plug in
//! their own. `TodoApi` pairs a `TodoClient` with a transport and runs each
//! operation as build, exactly one `execute`, parse. Nothing is retried and
//! no timeout is configured.

use tracing::debug;

use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DeleteResult, Todo, TodoDraft, TodoId, UpdateResult};

/// Executes one `HttpRequest` and hands back whatever the server said.
///
/// Implementations must return non-2xx responses as `Ok` so that status
/// interpretation stays in `TodoClient::parse_*`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a ureq agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.path, "sending request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&request.path);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&request.path);
                for (key, value) in &request.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// `TodoClient` plus a `Transport`: one call per UI intent.
#[derive(Debug, Clone)]
pub struct TodoApi<T = UreqTransport> {
    client: TodoClient,
    transport: T,
}

impl TodoApi<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> TodoApi<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: TodoClient::from_config(config),
            transport,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn get_all_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_get_all_todos())?;
        self.client.parse_get_all_todos(response)
    }

    pub fn add_todo<D: TodoDraft + ?Sized>(&self, todo: &D) -> Result<Todo, ApiError> {
        let request = self.client.build_add_todo(todo)?;
        let response = self.transport.execute(request)?;
        self.client.parse_add_todo(response)
    }

    pub fn update_todo_status(&self, id: &TodoId) -> Result<UpdateResult, ApiError> {
        let response = self.transport.execute(self.client.build_update_todo_status(id))?;
        self.client.parse_update_todo_status(response)
    }

    pub fn delete_todo(&self, id: &TodoId) -> Result<DeleteResult, ApiError> {
        let response = self.transport.execute(self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(response)
    }
}
