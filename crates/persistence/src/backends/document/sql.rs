//! Rendering [`QuerySpec`]s as document store SQL.

use std::fmt::Write;

use super::client::{DocumentQuery, QueryParameter};
use crate::core::{QuerySpec, SortDirection};

/// Largest LIMIT the store accepts.
const MAX_LIMIT: u64 = i32::MAX as u64;

/// Renders a [`QuerySpec`] as a `SELECT *` query including ordering and window.
pub fn render_select(spec: &QuerySpec) -> DocumentQuery {
    let (mut query, parameters) = select_with_filters("SELECT * FROM c", spec);

    if !spec.order.is_empty() {
        query.push_str(" ORDER BY ");
        let keys: Vec<String> = spec
            .order
            .iter()
            .map(|key| {
                let direction = match key.direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                format!("{} {direction}", field_ref(&key.field))
            })
            .collect();
        query.push_str(&keys.join(", "));
    }

    if spec.skip.is_some() || spec.take.is_some() {
        let offset = spec.skip.unwrap_or(0);
        let limit = spec.take.unwrap_or(MAX_LIMIT).min(MAX_LIMIT);
        let _ = write!(query, " OFFSET {offset} LIMIT {limit}");
    }

    DocumentQuery { query, parameters }
}

/// Renders a query counting the documents that match the query's filters.
///
/// The window is not part of the query; callers narrow the result with
/// [`QuerySpec::windowed_len`].
pub fn render_count(spec: &QuerySpec) -> DocumentQuery {
    let (query, parameters) = select_with_filters("SELECT VALUE COUNT(1) FROM c", spec);
    DocumentQuery { query, parameters }
}

fn select_with_filters(head: &str, spec: &QuerySpec) -> (String, Vec<QueryParameter>) {
    let mut query = head.to_string();
    let mut parameters = Vec::with_capacity(spec.filters.len());

    for (index, filter) in spec.filters.iter().enumerate() {
        let name = format!("@p{index}");
        query.push_str(if index == 0 { " WHERE " } else { " AND " });
        let _ = write!(query, "{} = {name}", field_ref(&filter.field));
        parameters.push(QueryParameter {
            name,
            value: filter.value.clone(),
        });
    }

    (query, parameters)
}

/// Quoted property accessor, safe for any field name.
fn field_ref(field: &str) -> String {
    let escaped = field.replace('\\', "\\\\").replace('"', "\\\"");
    format!("c[\"{escaped}\"]")
}
