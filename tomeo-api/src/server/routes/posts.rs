use crate::server::{
    Result, ServerError, ServerRouter, SharedStore,
    json::{Created, Json},
};
use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use time::UtcDateTime;
use tomeo_common::{
    model::{
        Id,
        post::{CreatePost, Post, PostMarker, SharePost},
    },
    util::RelativeAge,
};
use tomeo_store::{StoreError, store::Feed};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_feed)
        .typed_post(create_post)
        .typed_get(get_post)
        .typed_delete(delete_post)
        .typed_put(like_post)
        .typed_delete(unlike_post)
        .typed_put(attach_thumbnail)
        .typed_post(share_post)
}

#[derive(TypedPath)]
#[typed_path("/posts")]
struct FeedPath;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct FeedQuery {
    #[serde(default)]
    feed: Feed,
}

/// A post as a feed card shows it, with its age label.
#[derive(Clone, Debug, Serialize)]
struct PostCard {
    #[serde(flatten)]
    post: Post,
    age: String,
}

impl PostCard {
    fn new(post: Post, now: UtcDateTime) -> Self {
        let age = RelativeAge::between(post.created_at, now).to_string();
        Self { post, age }
    }
}

async fn get_feed(
    _: FeedPath,
    State(store): State<SharedStore>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<Vec<PostCard>>> {
    let Query(FeedQuery { feed }) = query?;
    let now = UtcDateTime::now();
    let cards = store
        .lock()
        .await
        .feed(feed)
        .into_iter()
        .map(|post| PostCard::new(post.clone(), now))
        .collect();

    Ok(Json(cards))
}

#[derive(TypedPath)]
#[typed_path("/posts/create")]
struct CreatePostPath;

async fn create_post(
    _: CreatePostPath,
    State(store): State<SharedStore>,
    Json(create): Json<CreatePost>,
) -> Result<Created<Post>> {
    let post = store.lock().await.create_post(create)?;

    Ok(Created(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}", rejection(ServerError))]
struct PostPath {
    id: Id<PostMarker>,
}

async fn get_post(
    PostPath { id }: PostPath,
    State(store): State<SharedStore>,
) -> Result<Json<PostCard>> {
    let post = store
        .lock()
        .await
        .post(&id)
        .cloned()
        .ok_or(StoreError::PostNotFound(id))?;

    Ok(Json(PostCard::new(post, UtcDateTime::now())))
}

async fn delete_post(
    PostPath { id }: PostPath,
    State(store): State<SharedStore>,
) -> Result<Json<Post>> {
    let post = store.lock().await.delete_post(&id)?;

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/like", rejection(ServerError))]
struct PostLikePath {
    id: Id<PostMarker>,
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
struct LikeState {
    is_liked: bool,
    likes_count: u32,
    changed: bool,
}

async fn set_post_liked(
    store: &SharedStore,
    id: &Id<PostMarker>,
    liked: bool,
) -> Result<LikeState> {
    let mut store = store.lock().await;
    let changed = if liked {
        store.like_post(id)?
    } else {
        store.unlike_post(id)?
    };
    let post = store
        .post(id)
        .ok_or_else(|| StoreError::PostNotFound(id.clone()))?;

    Ok(LikeState {
        is_liked: post.is_liked,
        likes_count: post.likes_count,
        changed,
    })
}

async fn like_post(
    PostLikePath { id }: PostLikePath,
    State(store): State<SharedStore>,
) -> Result<Json<LikeState>> {
    Ok(Json(set_post_liked(&store, &id, true).await?))
}

async fn unlike_post(
    PostLikePath { id }: PostLikePath,
    State(store): State<SharedStore>,
) -> Result<Json<LikeState>> {
    Ok(Json(set_post_liked(&store, &id, false).await?))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/thumbnail", rejection(ServerError))]
struct ThumbnailPath {
    id: Id<PostMarker>,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
struct AttachThumbnail {
    media: String,
    thumbnail: String,
}

async fn attach_thumbnail(
    ThumbnailPath { id }: ThumbnailPath,
    State(store): State<SharedStore>,
    Json(AttachThumbnail { media, thumbnail }): Json<AttachThumbnail>,
) -> Result<Json<Post>> {
    let mut store = store.lock().await;
    store.attach_thumbnail(&id, media, thumbnail)?;
    let post = store
        .post(&id)
        .cloned()
        .ok_or(StoreError::PostNotFound(id))?;

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/share", rejection(ServerError))]
struct SharePath {
    id: Id<PostMarker>,
}

async fn share_post(
    SharePath { id }: SharePath,
    State(store): State<SharedStore>,
    Json(share): Json<SharePost>,
) -> Result<StatusCode> {
    store.lock().await.share_post(&id, share)?;

    Ok(StatusCode::NO_CONTENT)
}
