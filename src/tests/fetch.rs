use super::{community, seeded_store};
use crate::{
    error::{DataAccessError, SingleResult, SINGLE_RESULT_EXPECTED},
    fetch::{
        community_posts_query, fetch_community_by_id, fetch_community_posts, lookup_community,
        COMMUNITIES, POSTS,
    },
};

#[tokio::test]
async fn posts_newest_first_with_name() -> anyhow::Result<()> {
    let store = seeded_store();
    let posts = fetch_community_posts(&store, 1).await?;
    let ids = posts.iter().map(|p| p.post.id).collect::<Vec<_>>();
    assert_eq!(ids, [11, 10, 12]);
    assert!(posts.iter().all(|p| p.community_name() == Some("Rust")));
    assert!(posts
        .windows(2)
        .all(|pair| pair[0].post.created_at >= pair[1].post.created_at));
    Ok(())
}

#[tokio::test]
async fn posts_of_unknown_community_are_empty() -> anyhow::Result<()> {
    let store = seeded_store();
    assert!(fetch_community_posts(&store, 2).await?.is_empty());
    assert!(fetch_community_posts(&store, 404).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn posts_error_message_verbatim() {
    let store = seeded_store();
    store.fail(POSTS, "permission denied for table posts");
    assert_eq!(
        fetch_community_posts(&store, 1).await,
        Err(DataAccessError::new("permission denied for table posts")),
    );
}

#[tokio::test]
async fn community_found_one() -> anyhow::Result<()> {
    let store = seeded_store();
    assert_eq!(fetch_community_by_id(&store, 2).await?, community(2, "Go"));
    Ok(())
}

#[tokio::test]
async fn community_lookup_distinguishes_failures() {
    let store = seeded_store();
    assert_eq!(lookup_community(&store, 404).await, SingleResult::None);

    store.insert(COMMUNITIES, &community(1, "Rust again")).unwrap();
    assert_eq!(lookup_community(&store, 1).await, SingleResult::Many(2));

    store.fail(COMMUNITIES, "timeout");
    assert_eq!(
        lookup_community(&store, 2).await,
        SingleResult::Transport(DataAccessError::new("timeout")),
    );
}

#[tokio::test]
async fn community_failures_collapse_at_boundary() {
    let store = seeded_store();
    assert_eq!(
        fetch_community_by_id(&store, 404).await,
        Err(DataAccessError::new(SINGLE_RESULT_EXPECTED)),
    );

    store.insert(COMMUNITIES, &community(2, "Go again")).unwrap();
    assert_eq!(
        fetch_community_by_id(&store, 2).await,
        Err(DataAccessError::new(SINGLE_RESULT_EXPECTED)),
    );

    store.fail(COMMUNITIES, "connection refused");
    assert_eq!(
        fetch_community_by_id(&store, 1).await,
        Err(DataAccessError::new("connection refused")),
    );
}

#[tokio::test]
async fn undecodable_rows_are_errors() {
    let store = seeded_store();
    store
        .insert(POSTS, &serde_json::json!({ "id": 1, "community_id": 2, "created_at": "soon" }))
        .unwrap();
    let err = fetch_community_posts(&store, 2).await.unwrap_err();
    assert!(err.message().starts_with("unable to decode row"));
}

#[test]
fn posts_query_shape() {
    let query = community_posts_query(5);
    assert_eq!(query.table(), POSTS);
    assert_eq!(query.columns(), "*,communities(name)");
    assert_eq!(query.filters()[0].operand(), "5");
    assert_eq!(query.ordering()[0].to_param(), "created_at.desc");
}

#[tokio::test]
async fn sparse_rows_from_store_decode() -> anyhow::Result<()> {
    let store = crate::store::MemoryStore::new();
    store.relate(POSTS, COMMUNITIES, "community_id");
    store.insert(COMMUNITIES, &serde_json::json!({ "id": 5, "name": "FooOfficial" }))?;
    store.insert(
        POSTS,
        &serde_json::json!({ "id": 1, "community_id": 5, "created_at": "2024-01-01" }),
    )?;

    let posts = fetch_community_posts(&store, 5).await?;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].community_name(), Some("FooOfficial"));
    assert_eq!(fetch_community_by_id(&store, 5).await?.name, "FooOfficial");
    Ok(())
}
