use chrono::{DateTime, Utc};

use crate::{
    fetch::{COMMUNITIES, POSTS},
    model::{Community, Post},
    store::MemoryStore,
};

mod fetch;
mod query;
#[cfg(feature = "rest")]
mod rest;

pub(crate) fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .expect("test timestamps are valid rfc3339")
        .with_timezone(&Utc)
}

pub(crate) fn post(id: i64, community_id: i64, title: &str, created_at: &str) -> Post {
    Post {
        id,
        community_id,
        title: title.to_string(),
        content: format!("content of {title}"),
        image_url: None,
        avatar_url: None,
        created_at: at(created_at),
    }
}

pub(crate) fn community(id: i64, name: &str) -> Community {
    Community {
        id,
        name: name.to_string(),
        description: format!("all about {name}"),
        created_at: at("2023-06-01T00:00:00Z"),
    }
}

/// A store holding communities 1 ("Rust") and 2 ("Go"), with three posts
/// in the first inserted out of chronological order, and none in the
/// second.
pub(crate) fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.relate(POSTS, COMMUNITIES, "community_id");
    store.insert(COMMUNITIES, &community(1, "Rust")).unwrap();
    store.insert(COMMUNITIES, &community(2, "Go")).unwrap();
    store
        .insert(POSTS, &post(10, 1, "middle", "2024-01-02T00:00:00Z"))
        .unwrap();
    store
        .insert(POSTS, &post(11, 1, "newest", "2024-01-03T00:00:00Z"))
        .unwrap();
    store
        .insert(POSTS, &post(12, 1, "oldest", "2024-01-01T00:00:00Z"))
        .unwrap();
    store
}
