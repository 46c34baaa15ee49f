use std::future::Future;

use tracing::debug;

use crate::error::AppError;
use crate::models::{Todo, TodoFilter, TodoPatch};

/// A stored record addressable by a string id.
pub trait Entity {
    fn id(&self) -> &str;
}

/// CRUD over a single durable table of `Entity` records.
///
/// `create` assigns the id and creation timestamp. `update` merges a patch
/// into an existing record and yields `None` when the id is unknown. `remove`
/// yields `None` when the record was already gone.
pub trait EntityStore: Send + Sync + 'static {
    type Entity: Entity + Send + 'static;
    type Patch: Send + 'static;
    type Filter: Send + 'static;

    fn find_all(
        &self,
        filter: Option<Self::Filter>,
    ) -> impl Future<Output = Result<Vec<Self::Entity>, AppError>> + Send;

    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Self::Entity>, AppError>> + Send;

    fn create(
        &self,
        patch: Self::Patch,
    ) -> impl Future<Output = Result<Self::Entity, AppError>> + Send;

    fn update(
        &self,
        id: &str,
        patch: Self::Patch,
    ) -> impl Future<Output = Result<Option<Self::Entity>, AppError>> + Send;

    fn remove(
        &self,
        entity: Self::Entity,
    ) -> impl Future<Output = Result<Option<Self::Entity>, AppError>> + Send;
}

/// Stores that hold todos.
pub trait TodoStore: EntityStore<Entity = Todo, Patch = TodoPatch, Filter = TodoFilter> {}

impl<S> TodoStore for S where S: EntityStore<Entity = Todo, Patch = TodoPatch, Filter = TodoFilter> {}

pub struct Repository<S> {
    store: S,
}

impl<S: EntityStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn find_all(&self) -> Result<Vec<S::Entity>, AppError> {
        self.store.find_all(None).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<S::Entity>, AppError> {
        self.store.find_by_id(id).await
    }

    pub async fn create(&self, patch: S::Patch) -> Result<S::Entity, AppError> {
        let created = self.store.create(patch).await?;
        debug!(id = created.id(), "Stored entity");
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: S::Patch) -> Result<Option<S::Entity>, AppError> {
        self.store.update(id, patch).await
    }

    /// Removes the record with `id`, returning it, or `None` if nothing matched.
    pub async fn delete_by_id(&self, id: &str) -> Result<Option<S::Entity>, AppError> {
        let Some(entity) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        let removed = self.store.remove(entity).await?;
        if let Some(ref removed) = removed {
            debug!(id = removed.id(), "Removed entity");
        }
        Ok(removed)
    }
}

pub struct TodoRepository<S> {
    base: Repository<S>,
}

impl<S: TodoStore> TodoRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            base: Repository::new(store),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Todo>, AppError> {
        self.base.find_all().await
    }

    pub async fn find_all_by_status(&self, status: bool) -> Result<Vec<Todo>, AppError> {
        self.base
            .store()
            .find_all(Some(TodoFilter {
                status: Some(status),
            }))
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, AppError> {
        self.base.find_by_id(id).await
    }

    pub async fn create(&self, patch: TodoPatch) -> Result<Todo, AppError> {
        self.base.create(patch).await
    }

    pub async fn update(&self, id: &str, patch: TodoPatch) -> Result<Option<Todo>, AppError> {
        self.base.update(id, patch).await
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<Option<Todo>, AppError> {
        self.base.delete_by_id(id).await
    }
}
