use crate::models::{CreateTodoDto, Todo, TodoDto, TodoPatch, UpdateTodoDto};

/// Converts between stored todos and the shapes used on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoMapper;

impl TodoMapper {
    pub fn to_dto(&self, todo: Todo) -> TodoDto {
        TodoDto {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            date: todo.date,
        }
    }

    /// New todos start open, with trimmed text and an explicit null date
    /// when none was given.
    pub fn patch_from_create(&self, dto: CreateTodoDto) -> TodoPatch {
        TodoPatch {
            title: Some(dto.title.trim().to_string()),
            description: dto
                .description
                .map(|description| Some(description.trim().to_string())),
            status: Some(false),
            date: Some(dto.date),
        }
    }

    /// Carries over exactly the fields the caller sent, untouched.
    pub fn patch_from_update(&self, dto: UpdateTodoDto) -> TodoPatch {
        TodoPatch {
            title: dto.title,
            description: dto.description,
            status: dto.status,
            date: dto.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::OffsetDateTime;

    use super::*;

    #[test]
    fn create_trims_and_defaults() {
        let patch = TodoMapper.patch_from_create(CreateTodoDto {
            title: "  Buy milk  ".to_string(),
            description: Some(" 2% lactose free ".to_string()),
            date: Some(date!(2025 - 04 - 20)),
        });

        assert_eq!(patch.title.as_deref(), Some("Buy milk"));
        assert_eq!(patch.description, Some(Some("2% lactose free".to_string())));
        assert_eq!(patch.status, Some(false));
        assert_eq!(patch.date, Some(Some(date!(2025 - 04 - 20))));
    }

    #[test]
    fn create_without_optionals_leaves_description_unset_and_nulls_date() {
        let patch = TodoMapper.patch_from_create(CreateTodoDto {
            title: "Clean room".to_string(),
            description: None,
            date: None,
        });

        assert_eq!(patch.description, None);
        assert_eq!(patch.date, Some(None));
    }

    #[test]
    fn update_copies_fields_verbatim() {
        let patch = TodoMapper.patch_from_update(UpdateTodoDto {
            title: Some("  spaced  ".to_string()),
            status: Some(true),
            ..Default::default()
        });

        assert_eq!(patch.title.as_deref(), Some("  spaced  "));
        assert_eq!(patch.status, Some(true));
        assert_eq!(patch.description, None);
        assert_eq!(patch.date, None);

        assert_eq!(
            TodoMapper.patch_from_update(UpdateTodoDto::default()),
            TodoPatch::default()
        );
    }

    #[test]
    fn dto_drops_created_at() {
        let dto = TodoMapper.to_dto(Todo {
            id: "uuid-a".to_string(),
            title: "Buy milk".to_string(),
            description: None,
            status: true,
            date: None,
            created_at: OffsetDateTime::now_utc(),
        });

        assert_eq!(
            dto,
            TodoDto {
                id: "uuid-a".to_string(),
                title: "Buy milk".to_string(),
                description: None,
                status: true,
                date: None,
            }
        );
    }
}
