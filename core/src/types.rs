//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Wire field names are camelCase (`isCompleted`); integration tests catch
//! any schema drift between the two crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned identifier of a todo.
///
/// Opaque to the client. The server may send it as a JSON string or a
/// number; either form is kept as sent and serializes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Text(String),
    Number(serde_json::Number),
}

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        TodoId::Text(id.into())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Text(s) => f.write_str(s),
            TodoId::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        TodoId::Text(id.to_string())
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        TodoId::Text(id)
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        TodoId::Number(id.into())
    }
}

/// A single todo item returned by the API.
///
/// Fields the server sends beyond the three known ones are kept in `extra`
/// so that re-serializing yields the server's document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub value: String,
    pub is_completed: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Todo {
    pub fn new(id: impl Into<TodoId>, value: impl Into<String>, is_completed: bool) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            is_completed,
            extra: Map::new(),
        }
    }
}

/// Caller-side input for creating a todo. Only `value` is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTodo {
    pub value: String,
}

impl NewTodo {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Anything that can be submitted as a new todo.
///
/// The create request reads nothing but the text; any completion state the
/// source carries is ignored.
pub trait TodoDraft {
    fn value(&self) -> &str;
}

impl TodoDraft for NewTodo {
    fn value(&self) -> &str {
        &self.value
    }
}

impl TodoDraft for Todo {
    fn value(&self) -> &str {
        &self.value
    }
}

impl TodoDraft for str {
    fn value(&self) -> &str {
        self
    }
}

impl TodoDraft for String {
    fn value(&self) -> &str {
        self
    }
}

/// Request payload for `POST /add-todo`. New todos always start incomplete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoRequest {
    pub value: String,
    pub is_completed: bool,
}

impl AddTodoRequest {
    pub fn from_draft<D: TodoDraft + ?Sized>(draft: &D) -> Self {
        Self {
            value: draft.value().to_string(),
            is_completed: false,
        }
    }
}

/// Body returned by `POST /update-todo/{id}`. Its shape belongs to the
/// server, so it is kept as raw JSON (`Null` when the body is empty).
pub type UpdateResult = Value;

/// Body returned by `POST /del-todo/{id}`, kept as raw JSON like
/// `UpdateResult`.
pub type DeleteResult = Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_uses_camel_case_on_the_wire() {
        let todo = Todo::new("7", "Walk dog", true);
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["value"], "Walk dog");
        assert_eq!(json["isCompleted"], true);
        assert!(json.get("is_completed").is_none());
    }

    #[test]
    fn todo_id_accepts_numbers_and_strings() {
        let numeric: Todo =
            serde_json::from_str(r#"{"id":42,"value":"a","isCompleted":false}"#).unwrap();
        assert_eq!(numeric.id, TodoId::from(42));
        assert_eq!(numeric.id.to_string(), "42");

        let textual: Todo =
            serde_json::from_str(r#"{"id":"abc","value":"b","isCompleted":true}"#).unwrap();
        assert_eq!(textual.id, TodoId::from("abc"));
    }

    #[test]
    fn server_document_survives_parse_and_serialize() {
        let raw = r#"[
            {"id":7,"value":"a","isCompleted":false,"createdAt":"2024-01-01"},
            {"id":"x-1","value":"b","isCompleted":true,"tags":["home"],"priority":2.5}
        ]"#;
        let original: Value = serde_json::from_str(raw).unwrap();
        let todos: Vec<Todo> = serde_json::from_str(raw).unwrap();
        assert_eq!(todos[0].id, TodoId::from(7));
        assert_eq!(todos[0].extra["createdAt"], "2024-01-01");
        assert_eq!(serde_json::to_value(&todos).unwrap(), original);
    }

    #[test]
    fn todo_rejects_missing_completion_flag() {
        let result: Result<Todo, _> = serde_json::from_str(r#"{"id":"1","value":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn add_request_ignores_completion_of_source() {
        let done = Todo::new("1", "Already done", true);
        let req = AddTodoRequest::from_draft(&done);
        assert_eq!(req.value, "Already done");
        assert!(!req.is_completed);
    }

    #[test]
    fn add_request_passes_empty_value_through() {
        let req = AddTodoRequest::from_draft("");
        assert_eq!(req.value, "");
    }
}
