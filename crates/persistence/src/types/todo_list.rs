//! The to-do list entity.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityMeta};

/// A named list that owns zero or more [`TodoItem`](super::TodoItem)s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    /// Identity and timestamps.
    #[serde(flatten)]
    pub meta: EntityMeta,

    /// The name of the list.
    pub name: String,

    /// A description of the list.
    #[serde(default)]
    pub description: Option<String>,
}

impl TodoList {
    /// Creates a new, unsaved list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: EntityMeta::new(),
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Entity for TodoList {
    const KIND: &'static str = "TodoList";

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}
