//! The two reads backing the community view.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{DataAccessError, SingleResult},
    model::{Community, PostWithCommunity},
    query::{Direction, Query},
    store::{DataStore, Row},
};

pub const POSTS: &str = "posts";
pub const COMMUNITIES: &str = "communities";

/// Posts of the community with the owning community's name embedded,
/// newest first.
pub fn community_posts_query(community_id: i64) -> Query {
    Query::new(POSTS)
        .select("*, communities(name)")
        .eq("community_id", community_id)
        .order("created_at", Direction::Descending)
}

/// The community record itself.  Two rows are enough to tell a unique
/// match from an ambiguous one.
pub fn community_query(community_id: i64) -> Query {
    Query::new(COMMUNITIES)
        .select("*")
        .eq("id", community_id)
        .limit(2)
}

fn decode<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DataAccessError> {
    rows.into_iter()
        .map(|row| Ok(serde_json::from_value(Value::Object(row))?))
        .collect()
}

/// Fetch every post of the community.
///
/// An identifier matching no community is not an error; it simply
/// yields no posts.
pub async fn fetch_community_posts(
    store: &dyn DataStore,
    community_id: i64,
) -> Result<Vec<PostWithCommunity>, DataAccessError> {
    let rows = store
        .select(&community_posts_query(community_id))
        .await
        .inspect_err(|err| {
            leptos::logging::debug_warn!("posts fetch for community {community_id} failed: {err}")
        })?;
    decode(rows)
}

/// Look up the community, keeping the reason apart when there isn't
/// exactly one match.
pub async fn lookup_community(store: &dyn DataStore, community_id: i64) -> SingleResult<Community> {
    let rows = store.select(&community_query(community_id)).await;
    SingleResult::from_rows(rows.and_then(decode::<Community>))
}

pub async fn fetch_community_by_id(
    store: &dyn DataStore,
    community_id: i64,
) -> Result<Community, DataAccessError> {
    lookup_community(store, community_id)
        .await
        .into_result()
        .inspect_err(|err| {
            leptos::logging::debug_warn!("community fetch for {community_id} failed: {err}")
        })
}
