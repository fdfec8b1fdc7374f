use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
#[cfg(feature = "ssr")]
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::{DataStore, Row};
use crate::{
    error::DataAccessError,
    model::parse_timestamp,
    query::{Direction, Order, Query, SelectItem},
};

/// An in-memory [`DataStore`] holding tables of JSON rows.
///
/// Relations must be registered with [`relate`](MemoryStore::relate)
/// before they may be embedded in a select list; the related table is
/// joined on its `id` column.  Failures may be injected per table to
/// emulate the remote store reporting an error.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    tables: HashMap<String, Vec<Row>>,
    relations: HashMap<(String, String), String>,
    failures: HashMap<String, String>,
    #[cfg(feature = "ssr")]
    latency: HashMap<String, Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert<T: Serialize>(&self, table: &str, record: &T) -> Result<(), DataAccessError> {
        let row = match serde_json::to_value(record)? {
            Value::Object(row) => row,
            other => {
                return Err(DataAccessError::new(format!(
                    "expected an object for a row of {table}, got {other}"
                )))
            }
        };
        self.write()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    /// Declare that rows of `table` reference rows of `relation` through
    /// the `foreign_key` column.
    pub fn relate(&self, table: &str, relation: &str, foreign_key: &str) {
        let mut inner = self.write();
        inner.tables.entry(relation.to_string()).or_default();
        inner
            .relations
            .insert((table.to_string(), relation.to_string()), foreign_key.to_string());
    }

    /// Make every subsequent read of `table` fail with `message`.
    pub fn fail(&self, table: &str, message: impl Into<String>) {
        self.write()
            .failures
            .insert(table.to_string(), message.into());
    }

    pub fn recover(&self, table: &str) {
        self.write().failures.remove(table);
    }

    /// Delay every read of `table` by `delay`.
    #[cfg(feature = "ssr")]
    pub fn with_latency(&self, table: &str, delay: Duration) {
        self.write().latency.insert(table.to_string(), delay);
    }

    fn run(&self, query: &Query) -> Result<Vec<Row>, DataAccessError> {
        let inner = self.read();
        let table = query.table();
        if let Some(message) = inner.failures.get(table) {
            return Err(DataAccessError::new(message.clone()));
        }
        let items = query.parse_select()?;
        let rows = inner
            .tables
            .get(table)
            .ok_or_else(|| DataAccessError::new(format!("relation \"public.{table}\" does not exist")))?;

        let mut matched = rows
            .iter()
            .filter(|row| {
                query
                    .filters()
                    .iter()
                    .all(|filter| row.get(&filter.column) == Some(&filter.value))
            })
            .collect::<Vec<_>>();
        matched.sort_by(|a, b| compare_rows(a, b, query.ordering()));
        if let Some(limit) = query.row_limit() {
            matched.truncate(limit);
        }

        matched
            .into_iter()
            .map(|row| inner.project(table, row, &items))
            .collect()
    }
}

impl MemoryInner {
    fn project(&self, table: &str, row: &Row, items: &[SelectItem]) -> Result<Row, DataAccessError> {
        let mut out = Row::new();
        for item in items {
            match item {
                SelectItem::All => {
                    out.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                SelectItem::Column(name) => {
                    let value = row.get(name).ok_or_else(|| {
                        DataAccessError::new(format!("column {table}.{name} does not exist"))
                    })?;
                    out.insert(name.clone(), value.clone());
                }
                SelectItem::Embed { relation, items } => {
                    let foreign_key = self
                        .relations
                        .get(&(table.to_string(), relation.clone()))
                        .ok_or_else(|| {
                            DataAccessError::new(format!(
                                "Could not find a relationship between '{table}' and \
                                 '{relation}' in the schema cache"
                            ))
                        })?;
                    let embedded = match row.get(foreign_key) {
                        Some(key) if !key.is_null() => self
                            .tables
                            .get(relation)
                            .and_then(|rows| rows.iter().find(|r| r.get("id") == Some(key)))
                            .map(|related| self.project(relation, related, items))
                            .transpose()?
                            .map(Value::Object)
                            .unwrap_or(Value::Null),
                        _ => Value::Null,
                    };
                    out.insert(relation.clone(), embedded);
                }
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Row>, DataAccessError> {
        #[cfg(feature = "ssr")]
        {
            let delay = self.read().latency.get(query.table()).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }
        self.run(query)
    }
}

fn compare_rows(a: &Row, b: &Row, ordering: &[Order]) -> Ordering {
    ordering
        .iter()
        .map(|order| {
            compare_values(
                a.get(&order.column),
                b.get(&order.column),
                order.direction,
            )
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

// Nulls sort last ascending and first descending, as Postgres does.
fn compare_values(a: Option<&Value>, b: Option<&Value>, direction: Direction) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let descending = direction == Direction::Descending;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) if descending => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) if descending => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ord = compare_present(a, b);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
    }
}

fn compare_present(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => match (parse_timestamp(a), parse_timestamp(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
