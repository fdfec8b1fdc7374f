//! The data store seam.
//!
//! Everything this crate reads goes through [`DataStore`], which runs a
//! [`Query`] and hands back raw JSON rows.  The typed fetches in
//! [`fetch`](crate::fetch) decode those rows; the store itself knows
//! nothing about posts or communities.
//!
//! The store is made available to the views as a context through
//! [`StoreHandle::provide`], and must be provided before any of the
//! views are constructed.

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use leptos::prelude::{expect_context, provide_context};

use crate::{error::DataAccessError, query::Query};

mod memory;
#[cfg(feature = "rest")]
mod rest;

pub use memory::MemoryStore;
#[cfg(feature = "rest")]
pub use rest::{ConfigError, RestStore, StoreConfig};

/// A single record as returned by the store.
pub type Row = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait DataStore: Send + Sync {
    /// Run the query and return the matching rows, projected according
    /// to the query's select list.
    async fn select(&self, query: &Query) -> Result<Vec<Row>, DataAccessError>;
}

/// Shared handle to the [`DataStore`] in use, provided as a context.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<dyn DataStore>,
}

impl StoreHandle {
    pub fn new(store: impl DataStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wrap the store and provide it as a context for the views below
    /// the current reactive owner.
    pub fn provide(store: impl DataStore + 'static) -> Self {
        let handle = Self::new(store);
        provide_context(handle.clone());
        handle
    }

    /// Acquire the provided store.
    ///
    /// Like [`expect_context`], this panics if no store was provided, as
    /// none of the views can do anything useful without one.
    pub fn expect() -> Self {
        expect_context::<StoreHandle>()
    }
}

impl Deref for StoreHandle {
    type Target = dyn DataStore;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}
