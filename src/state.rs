//! View state of the community display, derived purely from the states
//! of its two fetches.
//!
//! Each fetch is tracked as a [`FetchState`], and [`reduce`] combines the
//! two into the single [`CommunityView`] to be rendered.  Nothing here
//! performs or awaits any fetch, so the precedence and title rules may be
//! exercised without a store or a reactive runtime.

use serde::{Deserialize, Serialize};

use crate::{
    error::DataAccessError,
    model::{Community, PostWithCommunity},
};

/// A fetch result tagged with the community id it was fetched for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyed<T> {
    pub key: i64,
    pub result: Result<T, DataAccessError>,
}

impl<T> Keyed<T> {
    pub fn new(key: i64, result: Result<T, DataAccessError>) -> Self {
        Self { key, result }
    }
}

/// Lifecycle of a single fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState<T> {
    Pending,
    Ready(T),
    Failed(DataAccessError),
}

impl<T> FetchState<T> {
    /// The state of a fetch for the `current` community.
    ///
    /// A result that resolved for any other community is stale and must
    /// not be used, so it leaves the fetch pending just as no result at
    /// all does.
    pub fn current(resolved: Option<Keyed<T>>, current: i64) -> Self {
        match resolved {
            Some(Keyed { key, result }) if key == current => match result {
                Ok(value) => Self::Ready(value),
                Err(err) => Self::Failed(err),
            },
            _ => Self::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// The successfully loaded listing of a community.
#[derive(Clone, Debug, PartialEq)]
pub struct CommunityListing {
    pub community_name: String,
    pub posts: Vec<PostWithCommunity>,
}

impl CommunityListing {
    /// Build the listing, naming it after the newest post's embedded
    /// community name when there is one, otherwise after the community
    /// record.
    pub fn new(posts: Vec<PostWithCommunity>, community: &Community) -> Self {
        let community_name = posts
            .first()
            .and_then(PostWithCommunity::community_name)
            .filter(|name| !name.is_empty())
            .unwrap_or(community.name.as_str())
            .to_string();
        Self {
            community_name,
            posts,
        }
    }

    pub fn title(&self) -> String {
        format!("{} Community Posts", self.community_name)
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommunityView {
    Loading,
    PostsError(DataAccessError),
    CommunityError(DataAccessError),
    Loaded(CommunityListing),
}

/// Combine the two fetch states into the view to render.
///
/// Either fetch pending means loading.  Otherwise a posts failure is
/// reported before a community failure, and only when both succeeded is
/// the listing shown.
pub fn reduce(
    posts: FetchState<Vec<PostWithCommunity>>,
    community: FetchState<Community>,
) -> CommunityView {
    match (posts, community) {
        (FetchState::Pending, _) | (_, FetchState::Pending) => CommunityView::Loading,
        (FetchState::Failed(err), _) => CommunityView::PostsError(err),
        (_, FetchState::Failed(err)) => CommunityView::CommunityError(err),
        (FetchState::Ready(posts), FetchState::Ready(community)) => {
            CommunityView::Loaded(CommunityListing::new(posts, &community))
        }
    }
}
