pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod repository;
pub mod service;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use db::{DbPool, SqliteTodoStore};
use mapper::TodoMapper;
use repository::TodoRepository;
use service::TodoService;

#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<TodoService<SqliteTodoStore>>,
    pub base_path: Arc<String>,
}

impl AppState {
    pub fn new(db: DbPool, base_path: String) -> Self {
        let repository = TodoRepository::new(SqliteTodoStore::new(db));
        let todos = TodoService::new(repository, TodoMapper);

        AppState {
            todos: Arc::new(todos),
            base_path: Arc::new(base_path),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let base_path = state.base_path.clone();

    let app_routes = Router::new()
        .route("/todos", get(handlers::api::list_all_todos))
        .route("/todos", post(handlers::api::create_new_todo))
        .route("/todos/status", get(handlers::api::list_todos_by_status))
        .route("/todos/{id}", get(handlers::api::get_single_todo))
        .route("/todos/{id}", patch(handlers::api::update_existing_todo))
        .route("/todos/{id}", delete(handlers::api::delete_existing_todo))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state);

    tracing::info!("base_path: {base_path:?}");

    if base_path.is_empty() {
        app_routes
    } else {
        Router::new().nest(&*base_path, app_routes)
    }
}
