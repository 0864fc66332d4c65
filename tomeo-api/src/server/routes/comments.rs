use crate::server::{
    Result, ServerError, ServerRouter, SharedStore,
    json::{Created, Json},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};
use tomeo_common::model::{
    Id,
    comment::{Comment, CommentMarker, CommentText, QUICK_REACTIONS},
    post::PostMarker,
};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(add_comment)
        .typed_delete(delete_comment)
        .typed_post(toggle_comment_like)
        .typed_get(get_quick_reactions)
}

#[derive(TypedPath)]
#[typed_path("/comments/reactions")]
struct QuickReactionsPath;

async fn get_quick_reactions(
    _: QuickReactionsPath,
) -> Result<Json<[&'static str; QUICK_REACTIONS.len()]>> {
    Ok(Json(QUICK_REACTIONS))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/comments", rejection(ServerError))]
struct CommentsPath {
    id: Id<PostMarker>,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
struct NewComment {
    text: CommentText,
}

async fn add_comment(
    CommentsPath { id }: CommentsPath,
    State(store): State<SharedStore>,
    Json(NewComment { text }): Json<NewComment>,
) -> Result<Created<Comment>> {
    let comment = store.lock().await.comment_on_post(&id, text)?;

    Ok(Created(comment))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/comments/{comment_id}", rejection(ServerError))]
struct CommentPath {
    id: Id<PostMarker>,
    comment_id: Id<CommentMarker>,
}

async fn delete_comment(
    CommentPath { id, comment_id }: CommentPath,
    State(store): State<SharedStore>,
) -> Result<Json<Comment>> {
    let comment = store.lock().await.delete_comment(&id, &comment_id)?;

    Ok(Json(comment))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{id}/comments/{comment_id}/like", rejection(ServerError))]
struct CommentLikePath {
    id: Id<PostMarker>,
    comment_id: Id<CommentMarker>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
struct CommentLikeState {
    is_liked: bool,
}

async fn toggle_comment_like(
    CommentLikePath { id, comment_id }: CommentLikePath,
    State(store): State<SharedStore>,
) -> Result<Json<CommentLikeState>> {
    let is_liked = store.lock().await.like_comment(&id, &comment_id)?;

    Ok(Json(CommentLikeState { is_liked }))
}
