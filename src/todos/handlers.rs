//! Todo endpoint handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::http::{json_response, json_response_with_status, ApiError};
use crate::routing::{ParamRule, PathParams, RouteRequest};
use crate::todos::store::{TodoInput, TodoStore};

/// Path variable naming the todo.
pub const TODO_ID: &str = "todoId";

fn todo_id(params: &PathParams) -> Result<Uuid, ApiError> {
    params
        .get_validated(TODO_ID, &ParamRule::uuid())
        .and_then(|v| v.parse().ok())
        .ok_or(ApiError::NotFound)
}

fn parse_input(req: &RouteRequest) -> Result<TodoInput, ApiError> {
    let input: TodoInput = serde_json::from_slice(req.body())
        .map_err(|e| ApiError::BadRequest(format!("invalid todo: {}", e)))?;
    if input.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".into()));
    }
    Ok(input)
}

pub fn list(store: &TodoStore) -> Response {
    json_response(&store.list())
}

pub fn create(store: &TodoStore, req: &RouteRequest) -> Result<Response, ApiError> {
    let todo = store.create(parse_input(req)?);
    tracing::info!(todo_id = %todo.id, "Todo created");
    Ok(json_response_with_status(StatusCode::CREATED, &todo))
}

pub fn get(store: &TodoStore, params: &PathParams) -> Result<Response, ApiError> {
    let id = todo_id(params)?;
    let todo = store.get(&id).ok_or(ApiError::NotFound)?;
    Ok(json_response(&todo))
}

pub fn replace(store: &TodoStore, req: &RouteRequest, params: &PathParams) -> Result<Response, ApiError> {
    let id = todo_id(params)?;
    let input = parse_input(req)?;
    let todo = store.replace(&id, input).ok_or(ApiError::NotFound)?;
    Ok(json_response(&todo))
}

pub fn delete(store: &TodoStore, params: &PathParams) -> Result<Response, ApiError> {
    let id = todo_id(params)?;
    store.remove(&id).ok_or(ApiError::NotFound)?;
    tracing::info!(todo_id = %id, "Todo deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
