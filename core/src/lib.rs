//! Client core for the todo service, plus the UI theme preference.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `TodoApi` wires the core to a
//! `Transport` for callers that just want the round-trip done.
//! `ThemePreference` is an unrelated light/dark flag with observers.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod theme;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use theme::{
    ClassList, ColorScheme, ColorSchemeSource, FixedColorScheme, PresentationRoot, SubscriptionId,
    SystemColorScheme, ThemePreference, DARK_CLASS,
};
pub use transport::{TodoApi, Transport, UreqTransport};
pub use types::{AddTodoRequest, DeleteResult, NewTodo, Todo, TodoDraft, TodoId, UpdateResult};
