//! The to-do item entity and its workflow state.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::entity::{Entity, EntityMeta, timestamp};
use crate::error::ValidationError;

/// Where an item is in its workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TodoItemState {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TodoItemState {
    /// Returns the wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoItemState::Todo => "todo",
            TodoItemState::InProgress => "inProgress",
            TodoItemState::Done => "done",
        }
    }
}

impl fmt::Display for TodoItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoItemState {
    type Err = ValidationError;

    /// Parses `todo`, `inprogress`, `in_progress` or `done`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("todo") {
            Ok(TodoItemState::Todo)
        } else if s.eq_ignore_ascii_case("inprogress") || s.eq_ignore_ascii_case("in_progress") {
            Ok(TodoItemState::InProgress)
        } else if s.eq_ignore_ascii_case("done") {
            Ok(TodoItemState::Done)
        } else {
            Err(ValidationError::InvalidState {
                value: s.to_string(),
            })
        }
    }
}

impl Serialize for TodoItemState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TodoItemState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single task on a [`TodoList`](super::TodoList).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub meta: EntityMeta,

    /// The id of the owning list. Not checked by any repository.
    pub list_id: String,

    /// The name or title of the item.
    pub name: String,

    /// A description of the item.
    #[serde(default)]
    pub description: Option<String>,

    /// The current state.
    #[serde(default)]
    pub state: TodoItemState,

    /// When the item is due.
    #[serde(default, with = "timestamp::option")]
    pub due_date: Option<DateTime<Utc>>,

    /// When the item was completed.
    #[serde(default, with = "timestamp::option")]
    pub completed_date: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Creates a new, unsaved item in the `Todo` state.
    pub fn new(list_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: EntityMeta::new(),
            list_id: list_id.into(),
            name: name.into(),
            description: None,
            state: TodoItemState::Todo,
            due_date: None,
            completed_date: None,
        }
    }

    /// Sets the state.
    pub fn with_state(mut self, state: TodoItemState) -> Self {
        self.state = state;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Entity for TodoItem {
    const KIND: &'static str = "TodoItem";

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}
