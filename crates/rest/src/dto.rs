//! Request bodies accepted by the list and item endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use todo_persistence::types::{TodoItem, TodoItemState, TodoList};

use crate::error::{RestError, RestResult};

/// Body of `POST /todo/lists` and `PUT /todo/lists/{list_id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateTodoList {
    /// Display name; must not be blank.
    pub name: String,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateUpdateTodoList {
    /// Rejects a blank name.
    pub fn validate(&self) -> RestResult<()> {
        require_name(&self.name)
    }

    /// Builds a new, unsaved list.
    pub fn into_list(self) -> TodoList {
        TodoList {
            description: self.description,
            ..TodoList::new(self.name)
        }
    }

    /// Replaces the mutable fields of an existing list.
    pub fn apply_to(self, list: &mut TodoList) {
        list.name = self.name;
        list.description = self.description;
    }
}

/// Body of `POST /todo/lists/{list_id}/items` and
/// `PUT /todo/lists/{list_id}/items/{item_id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateTodoItem {
    /// Display name; must not be blank.
    pub name: String,
    /// State name in any accepted spelling.
    #[serde(default)]
    pub state: Option<String>,
    /// When the item is due.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// When the item was completed.
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    /// Optional free text.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateUpdateTodoItem {
    /// Rejects a blank name.
    pub fn validate(&self) -> RestResult<()> {
        require_name(&self.name)
    }

    /// Parses the requested state. `None` when absent or empty.
    pub fn parsed_state(&self) -> RestResult<Option<TodoItemState>> {
        match self.state.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => Ok(Some(s.parse()?)),
        }
    }

    /// Builds a new, unsaved item in the given list.
    pub fn into_item(self, list_id: &str) -> RestResult<TodoItem> {
        let state = self.parsed_state()?.unwrap_or_default();
        Ok(TodoItem {
            description: self.description,
            state,
            due_date: self.due_date,
            completed_date: self.completed_date,
            ..TodoItem::new(list_id, self.name)
        })
    }

    /// Replaces the fields of an existing item; an absent state keeps the
    /// current one.
    pub fn apply_to(self, item: &mut TodoItem) -> RestResult<()> {
        if let Some(state) = self.parsed_state()? {
            item.state = state;
        }
        item.name = self.name;
        item.description = self.description;
        item.due_date = self.due_date;
        item.completed_date = self.completed_date;
        Ok(())
    }
}

fn require_name(name: &str) -> RestResult<()> {
    if name.trim().is_empty() {
        return Err(RestError::BadRequest {
            code: "missing-field",
            message: "name is required".to_string(),
        });
    }
    Ok(())
}
