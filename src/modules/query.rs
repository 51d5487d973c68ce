//! Building blocks for the filtered, joined and paginated list queries.

use std::collections::HashMap;

use bookstore_kernel::PageRequest;
use sqlx::{sqlite::SqliteRow, FromRow, QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

/// A single `WHERE` predicate over a joined column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Exact text match.
    Equals(&'static str, String),
    /// Case-sensitive substring match. No wildcards are interpreted.
    Contains(&'static str, String),
}

impl Condition {
    /// Only non-blank values produce a predicate.
    pub fn equals(column: &'static str, value: Option<&str>) -> Option<Self> {
        crate::utils::non_empty(value).map(|v| Condition::Equals(column, v.to_string()))
    }

    pub fn contains(column: &'static str, value: Option<&str>) -> Option<Self> {
        crate::utils::non_empty(value).map(|v| Condition::Contains(column, v.to_string()))
    }
}

/// Append `WHERE a AND b ...` for the given predicates.
pub fn push_conditions(builder: &mut QueryBuilder<'_, Sqlite>, conditions: &[Condition]) {
    for (i, condition) in conditions.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        match condition {
            Condition::Equals(column, value) => {
                builder.push(*column).push(" = ").push_bind(value.clone());
            }
            Condition::Contains(column, value) => {
                builder
                    .push("instr(")
                    .push(*column)
                    .push(", ")
                    .push_bind(value.clone())
                    .push(") > 0");
            }
        }
    }
}

/// Append the ordering and the page window.
pub fn push_window(builder: &mut QueryBuilder<'_, Sqlite>, order_by: &str, page: &PageRequest) {
    builder
        .push(" ORDER BY ")
        .push(order_by)
        .push(" LIMIT ")
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());
}

/// Parse an id column stored as text.
pub fn decode_id(raw: String) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(&raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Load the rows related to each owner id.
///
/// `select` must project the owning id as `owner_id` next to the columns `T`
/// reads. Rows are sorted by owner then `item_order`, so repeated join rows are
/// adjacent and collapse into one entry.
pub async fn load_related<T>(
    pool: &SqlitePool,
    select: &str,
    owner_column: &str,
    item_order: &str,
    owner_ids: &[Uuid],
    id_of: fn(&T) -> Uuid,
) -> Result<HashMap<Uuid, Vec<T>>, sqlx::Error>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send,
{
    let mut related: HashMap<Uuid, Vec<T>> = HashMap::new();
    if owner_ids.is_empty() {
        return Ok(related);
    }

    let mut builder = QueryBuilder::<Sqlite>::new(select);
    builder.push(" WHERE ").push(owner_column).push(" IN (");
    {
        let mut ids = builder.separated(", ");
        for id in owner_ids {
            ids.push_bind(id.to_string());
        }
        ids.push_unseparated(")");
    }
    builder
        .push(" ORDER BY ")
        .push(owner_column)
        .push(", ")
        .push(item_order);

    let rows = builder.build().fetch_all(pool).await?;
    for row in rows {
        let owner = decode_id(row.try_get("owner_id")?)?;
        let item = T::from_row(&row)?;
        let items = related.entry(owner).or_default();
        if items.last().map(id_of) != Some(id_of(&item)) {
            items.push(item);
        }
    }

    Ok(related)
}
