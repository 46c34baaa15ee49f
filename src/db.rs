use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Todo, TodoFilter, TodoPatch};
use crate::repository::EntityStore;

pub type DbPool = Arc<Mutex<Connection>>;

struct Column {
    name: &'static str,
    definition: &'static str,
    // ALTER TABLE cannot add NOT NULL columns without a constant default.
    added: &'static str,
}

const TODO_COLUMNS: &[Column] = &[
    Column {
        name: "id",
        definition: "TEXT PRIMARY KEY NOT NULL",
        added: "TEXT",
    },
    Column {
        name: "title",
        definition: "TEXT NOT NULL",
        added: "TEXT NOT NULL DEFAULT ''",
    },
    Column {
        name: "description",
        definition: "TEXT",
        added: "TEXT",
    },
    Column {
        name: "status",
        definition: "INTEGER NOT NULL DEFAULT 0",
        added: "INTEGER NOT NULL DEFAULT 0",
    },
    Column {
        name: "date",
        definition: "TEXT",
        added: "TEXT",
    },
    Column {
        name: "created_at",
        definition: "TEXT NOT NULL",
        added: "TEXT NOT NULL DEFAULT '1970-01-01T00:00:00Z'",
    },
];

const SELECT_TODO: &str = "SELECT id, title, description, status, date, created_at FROM todos";

pub fn init_db(path: impl AsRef<Path>) -> Result<DbPool> {
    let conn = Connection::open(path)?;
    sync_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub fn open_in_memory() -> Result<DbPool> {
    let conn = Connection::open_in_memory()?;
    sync_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Brings the `todos` table in line with the entity's columns: creates it
/// when missing and adds any column an older table lacks.
pub fn sync_schema(conn: &Connection) -> Result<()> {
    let columns = TODO_COLUMNS
        .iter()
        .map(|column| format!("{} {}", column.name, column.definition))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!("CREATE TABLE IF NOT EXISTS todos ({columns});"))?;

    let existing = existing_columns(conn)?;
    for column in TODO_COLUMNS {
        if existing.contains(column.name) {
            continue;
        }
        conn.execute(
            &format!("ALTER TABLE todos ADD COLUMN {} {}", column.name, column.added),
            [],
        )?;
        info!(column = column.name, "Added missing column to todos");
    }

    Ok(())
}

fn existing_columns(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(todos)")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(names)
}

fn todo_from_row(row: &Row) -> Result<Todo> {
    let created_at: String = row.get(5)?;
    let created_at = OffsetDateTime::parse(&created_at, &Rfc3339)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(err)))?;

    Ok(Todo {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get::<_, i32>(3)? != 0,
        date: row.get(4)?,
        created_at,
    })
}

fn select_todos(conn: &Connection, status: Option<bool>) -> Result<Vec<Todo>, AppError> {
    let todos = match status {
        Some(status) => {
            let mut stmt =
                conn.prepare(&format!("{SELECT_TODO} WHERE status = ?1 ORDER BY rowid ASC"))?;
            let rows = stmt.query_map([status], todo_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!("{SELECT_TODO} ORDER BY rowid ASC"))?;
            let rows = stmt.query_map([], todo_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(todos)
}

fn select_todo(conn: &Connection, id: &str) -> Result<Option<Todo>, AppError> {
    let todo = conn
        .query_row(&format!("{SELECT_TODO} WHERE id = ?1"), [id], todo_from_row)
        .optional()?;
    Ok(todo)
}

fn insert_todo(conn: &Connection, patch: TodoPatch) -> Result<Todo, AppError> {
    let id = Uuid::new_v4().to_string();
    let created_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::Database(err.to_string()))?;

    conn.execute(
        "INSERT INTO todos (id, title, description, status, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            patch.title,
            patch.description.flatten(),
            patch.status.unwrap_or(false),
            patch.date.flatten(),
            created_at,
        ],
    )?;

    select_todo(conn, &id)?
        .ok_or_else(|| AppError::Database(format!("todo {id} missing after insert")))
}

fn write_todo(conn: &Connection, todo: &Todo) -> Result<(), AppError> {
    conn.execute(
        "UPDATE todos SET title = ?1, description = ?2, status = ?3, date = ?4 WHERE id = ?5",
        params![todo.title, todo.description, todo.status, todo.date, todo.id],
    )?;
    Ok(())
}

/// `EntityStore` for todos backed by the shared SQLite connection.
///
/// Every call runs on the blocking pool so request tasks never hold the
/// runtime while SQLite works.
#[derive(Clone)]
pub struct SqliteTodoStore {
    pool: DbPool,
}

impl SqliteTodoStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, AppError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool
                .lock()
                .map_err(|_| AppError::Database("connection lock poisoned".to_string()))?;
            f(&conn)
        })
        .await?
    }
}

impl EntityStore for SqliteTodoStore {
    type Entity = Todo;
    type Patch = TodoPatch;
    type Filter = TodoFilter;

    async fn find_all(&self, filter: Option<TodoFilter>) -> Result<Vec<Todo>, AppError> {
        let status = filter.and_then(|filter| filter.status);
        self.run(move |conn| select_todos(conn, status)).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Todo>, AppError> {
        let id = id.to_string();
        self.run(move |conn| select_todo(conn, &id)).await
    }

    async fn create(&self, patch: TodoPatch) -> Result<Todo, AppError> {
        self.run(move |conn| insert_todo(conn, patch)).await
    }

    async fn update(&self, id: &str, patch: TodoPatch) -> Result<Option<Todo>, AppError> {
        let id = id.to_string();
        self.run(move |conn| {
            let Some(mut todo) = select_todo(conn, &id)? else {
                return Ok(None);
            };
            todo.apply(patch);
            write_todo(conn, &todo)?;
            Ok(Some(todo))
        })
        .await
    }

    async fn remove(&self, entity: Todo) -> Result<Option<Todo>, AppError> {
        self.run(move |conn| {
            let rows = conn.execute("DELETE FROM todos WHERE id = ?1", [&entity.id])?;
            Ok((rows > 0).then_some(entity))
        })
        .await
    }
}
