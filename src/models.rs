use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::AppError;
use crate::extract::Validate;
use crate::repository::Entity;

/// A persisted todo record.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: bool,
    pub date: Option<Date>,
    pub created_at: OffsetDateTime,
}

impl Todo {
    /// Merges every field the patch carries into the record.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}

impl Entity for Todo {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Partial entity fields. `None` leaves a field untouched; for the nullable
/// columns `Some(None)` stores an explicit null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<bool>,
    pub date: Option<Option<Date>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TodoFilter {
    pub status: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoDto {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Option<Date>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: bool,
    pub date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: bool,
}

// Only called when the key exists, so an explicit `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("Title cannot be empty".to_string()));
    }
    Ok(())
}

impl Validate for CreateTodoDto {
    fn validate(&self) -> Result<(), AppError> {
        check_title(&self.title)
    }
}

impl Validate for UpdateTodoDto {
    fn validate(&self) -> Result<(), AppError> {
        match self.title {
            Some(ref title) => check_title(title),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn update_dto_distinguishes_absent_and_null() {
        let absent: UpdateTodoDto = serde_json::from_str(r#"{"title": "X"}"#).unwrap();
        assert_eq!(absent.date, None);
        assert_eq!(absent.description, None);

        let cleared: UpdateTodoDto =
            serde_json::from_str(r#"{"date": null, "description": null}"#).unwrap();
        assert_eq!(cleared.date, Some(None));
        assert_eq!(cleared.description, Some(None));

        let set: UpdateTodoDto = serde_json::from_str(r#"{"date": "2025-04-20"}"#).unwrap();
        assert_eq!(set.date, Some(Some(date!(2025 - 04 - 20))));
    }

    #[test]
    fn todo_dto_serializes_calendar_date() {
        let dto = TodoDto {
            id: "a".to_string(),
            title: "Buy milk".to_string(),
            description: None,
            status: false,
            date: Some(date!(2025 - 04 - 20)),
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["date"], "2025-04-20");
        assert!(value["description"].is_null());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn blank_titles_are_rejected() {
        let create = CreateTodoDto {
            title: "   ".to_string(),
            description: None,
            date: None,
        };
        assert!(matches!(create.validate(), Err(AppError::BadRequest(_))));

        let update = UpdateTodoDto {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateTodoDto::default().validate().is_ok());
    }

    #[test]
    fn apply_leaves_absent_fields_alone() {
        let mut todo = Todo {
            id: "uuid-b".to_string(),
            title: "Old".to_string(),
            description: Some("desc".to_string()),
            status: true,
            date: Some(date!(2025 - 01 - 01)),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let before = todo.clone();

        todo.apply(TodoPatch::default());
        assert_eq!(todo, before);

        todo.apply(TodoPatch {
            date: Some(None),
            ..Default::default()
        });
        assert_eq!(todo.date, None);
        assert_eq!(todo.description, before.description);
    }
}
