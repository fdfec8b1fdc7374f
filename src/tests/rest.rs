use std::time::Duration;

use crate::{
    fetch::{community_posts_query, community_query},
    store::{RestStore, StoreConfig},
};

fn store() -> RestStore {
    RestStore::new(StoreConfig {
        url: "https://example.supabase.co".to_string(),
        anon_key: "anon".to_string(),
        timeout: Some(Duration::from_secs(5)),
    })
    .expect("client builds")
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

#[test]
fn posts_query_params() {
    let params = RestStore::params(&community_posts_query(5));
    assert_eq!(param(&params, "select"), Some("*,communities(name)"));
    assert_eq!(param(&params, "community_id"), Some("eq.5"));
    assert_eq!(param(&params, "order"), Some("created_at.desc"));
    assert_eq!(param(&params, "limit"), None);
}

#[test]
fn community_query_params() {
    let params = RestStore::params(&community_query(7));
    assert_eq!(param(&params, "select"), Some("*"));
    assert_eq!(param(&params, "id"), Some("eq.7"));
    assert_eq!(param(&params, "order"), None);
    assert_eq!(param(&params, "limit"), Some("2"));
}

#[test]
fn table_url() {
    assert_eq!(
        store().table_url("posts"),
        "https://example.supabase.co/rest/v1/posts"
    );
}
