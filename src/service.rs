use crate::error::AppError;
use crate::mapper::TodoMapper;
use crate::models::{CreateTodoDto, Todo, TodoDto, UpdateTodoDto};
use crate::repository::{TodoRepository, TodoStore};

/// Todo operations exposed to the HTTP layer.
///
/// `NotFound` is raised here whenever an id-based lookup comes back empty;
/// store failures pass through unchanged.
pub struct TodoService<S> {
    repository: TodoRepository<S>,
    mapper: TodoMapper,
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(repository: TodoRepository<S>, mapper: TodoMapper) -> Self {
        Self { repository, mapper }
    }

    pub async fn find_all(&self) -> Result<Vec<TodoDto>, AppError> {
        let todos = self.repository.find_all().await?;
        Ok(self.to_dtos(todos))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<TodoDto, AppError> {
        match self.repository.find_by_id(id).await? {
            Some(todo) => Ok(self.mapper.to_dto(todo)),
            None => Err(AppError::todo_not_found(id)),
        }
    }

    pub async fn find_all_by_status(&self, done: bool) -> Result<Vec<TodoDto>, AppError> {
        let todos = self.repository.find_all_by_status(done).await?;
        Ok(self.to_dtos(todos))
    }

    pub async fn create(&self, input: CreateTodoDto) -> Result<TodoDto, AppError> {
        let patch = self.mapper.patch_from_create(input);
        let todo = self.repository.create(patch).await?;
        Ok(self.mapper.to_dto(todo))
    }

    pub async fn update(&self, id: &str, input: UpdateTodoDto) -> Result<TodoDto, AppError> {
        let patch = self.mapper.patch_from_update(input);
        match self.repository.update(id, patch).await? {
            Some(todo) => Ok(self.mapper.to_dto(todo)),
            None => Err(AppError::todo_not_found(id)),
        }
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), AppError> {
        match self.repository.delete_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::todo_not_found(id)),
        }
    }

    fn to_dtos(&self, todos: Vec<Todo>) -> Vec<TodoDto> {
        todos
            .into_iter()
            .map(|todo| self.mapper.to_dto(todo))
            .collect()
    }
}
