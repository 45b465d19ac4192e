//! Domain types shared by the stores, the server and the client.
//!
//! # Design
//! `Todo` doubles as the wire shape. Every field carries `#[serde(default)]`
//! so a request body that omits a field decodes to that field's zero value;
//! an update is therefore a full replacement, never a merge with the stored
//! record. An explicit `null` is treated the same as an omitted field.

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a stored todo. Assigned by the store on create.
pub type TodoId = i64;

/// A single todo item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Todo {
    #[serde(deserialize_with = "null_as_default")]
    pub id: TodoId,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
    /// Set by a soft delete. Rows with this flag are invisible to readers.
    #[serde(deserialize_with = "null_as_default")]
    pub deleted: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Todo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// True when both `title` and `description` are non-empty.
    ///
    /// Stores never call this; accepting or rejecting a record is up to the
    /// request handlers.
    pub fn has_required_fields(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }
}

impl From<TodoInput> for Todo {
    fn from(input: TodoInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            completed: input.completed,
            ..Self::default()
        }
    }
}

/// Request payload for creating or replacing a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoInput {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_decode_to_zero_values() {
        let todo: Todo = serde_json::from_str(r#"{"title":"Only a title"}"#).unwrap();
        assert_eq!(todo.id, 0);
        assert_eq!(todo.title, "Only a title");
        assert_eq!(todo.description, "");
        assert!(!todo.completed);
        assert!(!todo.deleted);
    }

    #[test]
    fn null_fields_decode_to_zero_values() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":null,"title":"A","description":null,"completed":null,"deleted":null}"#,
        )
        .unwrap();
        assert_eq!(todo, Todo::new("A", ""));
    }

    #[test]
    fn wrong_types_are_still_rejected() {
        assert!(serde_json::from_str::<Todo>(r#"{"completed":"yes"}"#).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let todo: Todo =
            serde_json::from_str(r#"{"title":"A","description":"B","priority":3}"#).unwrap();
        assert_eq!(todo, Todo::new("A", "B"));
    }

    #[test]
    fn serializes_every_field() {
        let todo = Todo {
            id: 7,
            title: "Write".to_string(),
            description: "docs".to_string(),
            completed: true,
            deleted: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Write");
        assert_eq!(json["description"], "docs");
        assert_eq!(json["completed"], true);
        assert_eq!(json["deleted"], false);
    }

    #[test]
    fn required_fields_check() {
        assert!(Todo::new("A", "B").has_required_fields());
        assert!(!Todo::new("", "B").has_required_fields());
        assert!(!Todo::new("A", "").has_required_fields());
    }

    #[test]
    fn input_converts_without_id() {
        let todo = Todo::from(TodoInput {
            title: "A".to_string(),
            description: "B".to_string(),
            completed: true,
        });
        assert_eq!(todo.id, 0);
        assert!(todo.completed);
        assert!(!todo.deleted);
    }
}
