//! Composable, lazily evaluated entity queries.
//!
//! A repository hands out an [`EntityQuery`], which records equality filters,
//! an ordering and a skip/take window in a [`QuerySpec`]. Nothing runs until
//! [`EntityQuery::fetch`] or [`EntityQuery::count`] is awaited; the spec is
//! then passed to the backend's [`QuerySource`].
//!
//! Specs are backend neutral. In-process backends evaluate them with
//! [`QuerySpec::apply`] over the JSON form of each entity, while remote
//! backends translate them into their own query language.

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::StorageResult;

/// Top-level JSON field names usable in filters and orderings.
pub mod fields {
    /// Entity id.
    pub const ID: &str = "id";
    /// Creation timestamp.
    pub const CREATED_DATE: &str = "createdDate";
    /// Last-save timestamp.
    pub const UPDATED_DATE: &str = "updatedDate";
    /// Name of a list or item.
    pub const NAME: &str = "name";
    /// Owning list of an item.
    pub const LIST_ID: &str = "listId";
    /// Workflow state of an item.
    pub const STATE: &str = "state";
}

/// Sort direction for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Equality filter on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Top-level JSON field name.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

/// One key of an ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Top-level JSON field name.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

/// A backend-neutral description of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// All filters must match.
    pub filters: Vec<FieldFilter>,
    /// Sort keys, most significant first.
    pub order: Vec<SortKey>,
    /// Items to drop after filtering and ordering.
    pub skip: Option<u64>,
    /// Maximum number of items to return after skipping.
    pub take: Option<u64>,
}

impl QuerySpec {
    /// Returns true if the JSON document passes every filter.
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters
            .iter()
            .all(|f| doc.get(&f.field).unwrap_or(&Value::Null) == &f.value)
    }

    /// Compares two JSON documents under this spec's ordering.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for key in &self.order {
            let left = a.get(&key.field).unwrap_or(&Value::Null);
            let right = b.get(&key.field).unwrap_or(&Value::Null);
            let ord = compare_values(left, right);
            let ord = match key.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }

    /// Number of items the window lets through out of `matching`.
    pub fn windowed_len(&self, matching: u64) -> u64 {
        let remaining = matching.saturating_sub(self.skip.unwrap_or(0));
        match self.take {
            Some(take) => remaining.min(take),
            None => remaining,
        }
    }

    /// Filters, orders and windows a set of entities in memory.
    pub fn apply<T: Serialize>(&self, items: Vec<T>) -> StorageResult<Vec<T>> {
        let mut projected = Vec::with_capacity(items.len());
        for item in items {
            let doc = serde_json::to_value(&item)?;
            if self.matches(&doc) {
                projected.push((doc, item));
            }
        }

        if !self.order.is_empty() {
            projected.sort_by(|(a, _), (b, _)| self.compare(a, b));
        }

        let skip = self.skip.unwrap_or(0) as usize;
        let take = self.take.map(|t| t as usize).unwrap_or(usize::MAX);
        Ok(projected
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(_, item)| item)
            .collect())
    }

    /// Counts the entities [`apply`](Self::apply) would return.
    pub fn count<T: Serialize>(&self, items: &[T]) -> StorageResult<u64> {
        let mut matching = 0u64;
        for item in items {
            if self.matches(&serde_json::to_value(item)?) {
                matching += 1;
            }
        }
        Ok(self.windowed_len(matching))
    }
}

/// Orders JSON values: null, then booleans, numbers, strings, and anything
/// else last.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 4,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Something that can evaluate a [`QuerySpec`] for entities of type `T`.
#[async_trait]
pub trait QuerySource<T>: Send + Sync {
    /// Returns the entities matching the spec, ordered and windowed.
    async fn fetch(&self, spec: &QuerySpec) -> StorageResult<Vec<T>>;

    /// Returns how many entities [`fetch`](Self::fetch) would return.
    async fn count(&self, spec: &QuerySpec) -> StorageResult<u64>;
}

/// A lazily evaluated query over one entity kind.
///
/// Builder methods consume and return the query. Repeating `filter_eq` adds
/// filters and repeating `order_by` adds lower-priority keys; `skip` and
/// `take` replace any earlier window.
pub struct EntityQuery<'a, T> {
    source: &'a dyn QuerySource<T>,
    spec: QuerySpec,
}

impl<'a, T> EntityQuery<'a, T> {
    /// Creates an unrestricted query over a source.
    pub fn new(source: &'a dyn QuerySource<T>) -> Self {
        Self {
            source,
            spec: QuerySpec::default(),
        }
    }

    /// Keeps only entities whose `field` equals `value`.
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.filters.push(FieldFilter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a sort key.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.spec.order.push(SortKey {
            field: field.into(),
            direction,
        });
        self
    }

    /// Skips the first `n` matching entities.
    pub fn skip(mut self, n: u64) -> Self {
        self.spec.skip = Some(n);
        self
    }

    /// Returns at most `n` entities.
    pub fn take(mut self, n: u64) -> Self {
        self.spec.take = Some(n);
        self
    }

    /// Returns the accumulated spec.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Runs the query.
    pub async fn fetch(&self) -> StorageResult<Vec<T>> {
        self.source.fetch(&self.spec).await
    }

    /// Counts the entities the query would return.
    pub async fn count(&self) -> StorageResult<u64> {
        self.source.count(&self.spec).await
    }

    /// Runs the query and returns the first result, if any.
    pub async fn first(self) -> StorageResult<Option<T>> {
        let query = self.take(1);
        Ok(query.fetch().await?.into_iter().next())
    }
}

impl<T> Clone for EntityQuery<'_, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            spec: self.spec.clone(),
        }
    }
}

impl<T> fmt::Debug for EntityQuery<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityQuery")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}
