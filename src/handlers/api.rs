use axum::extract::{Path, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use crate::error::AppError;
use crate::extract::{ValidJson, ValidQuery};
use crate::models::{CreateTodoDto, StatusQuery, TodoDto, UpdateTodoDto};
use crate::AppState;

pub async fn list_all_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoDto>>, AppError> {
    let todos = state.todos.find_all().await?;
    info!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

pub async fn list_todos_by_status(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<StatusQuery>,
) -> Result<Json<Vec<TodoDto>>, AppError> {
    let todos = state.todos.find_all_by_status(query.status).await?;
    info!(status = query.status, count = todos.len(), "Listed todos by status");
    Ok(Json(todos))
}

pub async fn get_single_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoDto>, AppError> {
    Ok(Json(state.todos.find_by_id(&id).await?))
}

pub async fn create_new_todo(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateTodoDto>,
) -> Result<(StatusCode, Json<TodoDto>), AppError> {
    let todo = state.todos.create(req).await?;
    info!(id = %todo.id, title = %todo.title, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_existing_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateTodoDto>,
) -> Result<Json<TodoDto>, AppError> {
    let todo = state.todos.update(&id, req).await?;
    info!(id = %todo.id, status = todo.status, "Updated todo");
    Ok(Json(todo))
}

pub async fn delete_existing_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.todos.delete_by_id(&id).await?;
    info!(%id, "Deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
