use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub value: String,
    pub is_completed: bool,
}

/// Body of `POST /add-todo`. A missing `isCompleted` is accepted; whatever
/// arrives, new todos start incomplete.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodo {
    pub value: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Insertion-ordered so `/get-todo` lists todos oldest first.
pub type Db = Arc<RwLock<Vec<Todo>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/get-todo", get(list_todos))
        .route("/add-todo", post(add_todo))
        .route("/update-todo/{id}", post(toggle_todo))
        .route("/del-todo/{id}", post(delete_todo))
        .with_state(db)
}

/// A server that answers every request with `status`, for exercising
/// client error paths.
pub fn failing_app(status: StatusCode) -> Router {
    Router::new().fallback(move || async move { (status, "simulated failure") })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock todo server listening");
    }
    axum::serve(listener, router).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let todos = db.read().await;
    Json(todos.clone())
}

async fn add_todo(State(db): State<Db>, Json(input): Json<AddTodo>) -> Json<Todo> {
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        value: input.value,
        is_completed: false,
    };
    debug!(id = %todo.id, "todo added");
    db.write().await.push(todo.clone());
    Json(todo)
}

async fn toggle_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, StatusCode> {
    let mut todos = db.write().await;
    let todo = todos.iter_mut().find(|t| t.id == id).ok_or(StatusCode::NOT_FOUND)?;
    todo.is_completed = !todo.is_completed;
    debug!(%id, is_completed = todo.is_completed, "todo toggled");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, StatusCode> {
    let mut todos = db.write().await;
    let index = todos.iter().position(|t| t.id == id).ok_or(StatusCode::NOT_FOUND)?;
    debug!(%id, "todo deleted");
    Ok(Json(todos.remove(index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_camel_case() {
        let todo = Todo {
            id: "1".to_string(),
            value: "Test".to_string(),
            is_completed: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["value"], "Test");
        assert_eq!(json["isCompleted"], false);
    }

    #[test]
    fn add_todo_tolerates_missing_flag() {
        let input: AddTodo = serde_json::from_str(r#"{"value":"No flag"}"#).unwrap();
        assert_eq!(input.value, "No flag");
    }

    #[test]
    fn add_todo_rejects_missing_value() {
        let result: Result<AddTodo, _> = serde_json::from_str(r#"{"isCompleted":true}"#);
        assert!(result.is_err());
    }
}
