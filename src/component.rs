use leptos::prelude::*;

use crate::{
    cache::{QueryCache, QueryKey},
    fetch::{fetch_community_by_id, fetch_community_posts},
    model::PostWithCommunity,
    state::{reduce, CommunityView, FetchState, Keyed},
    store::StoreHandle,
};

/// Display the posts of a community under a heading naming it.
///
/// The posts and the community record are fetched concurrently as two
/// separate resources, both keyed by `community_id`, so that changing the
/// id re-runs both.  Until both have resolved the loading notice is shown.
/// Results are tagged with the id they were fetched for, and a result for
/// an id other than the current one is treated as still pending.
///
/// Requires a [`StoreHandle`] to be provided; a [`QueryCache`], if also
/// provided, will be consulted before either fetch goes to the store.
#[component]
pub fn CommunityDisplay(#[prop(into)] community_id: Signal<i64>) -> impl IntoView {
    let store = StoreHandle::expect();
    let cache = QueryCache::handle();

    let posts = ArcResource::new(
        move || community_id.get(),
        {
            let store = store.clone();
            let cache = cache.clone();
            move |id| {
                let store = store.clone();
                let cache = cache.clone();
                async move {
                    let result = cache
                        .get_or_fetch(
                            QueryKey::community_posts(id),
                            fetch_community_posts(&*store, id),
                        )
                        .await;
                    Keyed::new(id, result)
                }
            }
        },
    );

    let community = ArcResource::new(
        move || community_id.get(),
        move |id| {
            let store = store.clone();
            let cache = cache.clone();
            async move {
                let result = cache
                    .get_or_fetch(QueryKey::community(id), fetch_community_by_id(&*store, id))
                    .await;
                Keyed::new(id, result)
            }
        },
    );

    let suspend = move || {
        let posts = posts.clone();
        let community = community.clone();
        Suspend::new(async move {
            let posts = posts.await;
            let community = community.await;
            let current = community_id.get_untracked();
            render_view(reduce(
                FetchState::current(Some(posts), current),
                FetchState::current(Some(community), current),
            ))
        })
    };

    view! {
        <Suspense fallback=|| render_view(CommunityView::Loading)>
            {move || suspend()}
        </Suspense>
    }
}

fn render_view(state: CommunityView) -> AnyView {
    match state {
        CommunityView::Loading => view! {
            <div class="text-center py-4">"Loading communities..."</div>
        }
        .into_any(),
        CommunityView::PostsError(err) | CommunityView::CommunityError(err) => view! {
            <div class="text-center text-red-500 py-4">"Error: " {err.to_string()}</div>
        }
        .into_any(),
        CommunityView::Loaded(listing) => {
            let title = listing.title();
            let body = if listing.is_empty() {
                view! {
                    <p class="text-center text-gray-400 mt-10">
                        "No posts in this community yet."
                    </p>
                }
                .into_any()
            } else {
                view! {
                    <div class="flex flex-wrap gap-6 justify-center">
                        {listing
                            .posts
                            .into_iter()
                            .map(|post| view! { <PostItem post=post/> })
                            .collect_view()}
                    </div>
                }
                .into_any()
            };
            view! {
                <div>
                    <h2 class="text-6xl font-bold mb-6 text-center">{title}</h2>
                    {body}
                </div>
            }
            .into_any()
        }
    }
}

/// Render a single post of a listing as a link to the post.
#[component]
pub fn PostItem(post: PostWithCommunity) -> impl IntoView {
    let PostWithCommunity { post, communities } = post;
    let href = format!("/post/{}", post.id);
    let datetime = post.created_at.to_rfc3339();
    let posted = post.created_at.format("%Y-%m-%d").to_string();
    let alt = post.title.clone();

    view! {
        <article class="post-item" data-post-id=post.id.to_string()>
            <a href=href>
                {post.avatar_url.map(|src| view! {
                    <img class="post-avatar" src=src alt="User avatar"/>
                })}
                <h3>{post.title}</h3>
                {post.image_url.map(|src| view! {
                    <img class="post-image" src=src alt=alt/>
                })}
                <time datetime=datetime>{posted}</time>
                {communities.map(|community| view! {
                    <span class="post-community">{community.name}</span>
                })}
            </a>
        </article>
    }
}

// Comments are not implemented yet; this only marks where they go.
#[component]
pub fn CommentSection(post_id: i64) -> impl IntoView {
    view! { <div>"Comments for post " {post_id} " will go here."</div> }
}
