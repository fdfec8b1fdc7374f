//! This crate provides Leptos components for browsing discussion posts
//! grouped by community, backed by a remote data store that speaks a
//! PostgREST-like query surface.
//!
//! ## How it fits together
//!
//! The central piece is the [`CommunityDisplay`](component::CommunityDisplay)
//! component.  For a given community it needs two things from the store:
//! the posts belonging to the community, each with the community's name
//! joined in, and the community's own record.  Neither depends on the
//! other, so both are fetched concurrently as separate resources keyed by
//! the community id, and the component only renders once both have
//! resolved.  Until then, a loading notice is shown.
//!
//! How the two results combine is decided entirely by a pure function,
//! [`state::reduce`], which takes the state of each fetch and returns the
//! one view to render: loading, an error from either fetch (the posts
//! error wins if both failed), or the listing itself.  The listing is
//! titled after the community name embedded in the newest post, falling
//! back to the community record when there are no posts at all.
//!
//! Each result is tagged with the id it was fetched for, so that if the id
//! changes while a fetch is still in flight, a late result for the old id
//! is treated as pending rather than rendered under the new id.
//!
//! ## Providing collaborators
//!
//! The store is provided as a context through [`StoreHandle::provide`]
//! and is required.  A [`QueryCache`] may also be provided, in which case
//! a community revisited while its results are still fresh is rendered
//! from the cache rather than fetched again.  Its absence simply means
//! every visit goes to the store.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use leptos::prelude::*;
//! use leptos_community_posts::{
//!     component::CommunityDisplay, MemoryStore, QueryCache, StoreHandle,
//! };
//!
//! #[component]
//! fn App() -> impl IntoView {
//!     let store = MemoryStore::new();
//!     store.relate("posts", "communities", "community_id");
//!     StoreHandle::provide(store);
//!     QueryCache::provide(Duration::from_secs(60));
//!
//!     let (community_id, set_community_id) = signal(1_i64);
//!     view! {
//!         <button on:click=move |_| set_community_id.update(|id| *id += 1)>
//!             "Next community"
//!         </button>
//!         <CommunityDisplay community_id=community_id/>
//!     }
//! }
//! ```
//!
//! With the `rest` feature, a `RestStore` configured from the
//! environment through `StoreConfig::from_env` may be provided instead
//! of the in-memory store.
//!
//! # Feature Flags
#![cfg_attr(
    feature = "document-features",
    cfg_attr(doc, doc = ::document_features::document_features!())
)]

pub mod cache;
pub mod component;
mod error;
pub mod fetch;
pub mod model;
pub mod query;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use cache::{QueryCache, QueryCacheHandle, QueryKey};
pub use error::{DataAccessError, SingleResult, SINGLE_RESULT_EXPECTED};
pub use model::{Community, CommunityName, Post, PostWithCommunity};
pub use store::{DataStore, MemoryStore, StoreHandle};
#[cfg(feature = "rest")]
pub use store::{ConfigError, RestStore, StoreConfig};
