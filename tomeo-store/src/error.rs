use thiserror::Error;
use tomeo_common::model::{
    Id,
    comment::CommentMarker,
    post::PostMarker,
    user::UserMarker,
};

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum StoreError {
    #[error("Post with id {0} was not found.")]
    PostNotFound(Id<PostMarker>),
    #[error("Comment {comment_id} was not found on post {post_id}.")]
    CommentNotFound {
        post_id: Id<PostMarker>,
        comment_id: Id<CommentMarker>,
    },
    #[error("Friend with id {0} was not found.")]
    FriendNotFound(Id<UserMarker>),
    #[error("A post with id {0} already exists.")]
    DuplicatePost(Id<PostMarker>),
    #[error("Comment {comment_id} already exists on post {post_id}.")]
    DuplicateComment {
        post_id: Id<PostMarker>,
        comment_id: Id<CommentMarker>,
    },
    #[error("The current user cannot be their own friend.")]
    FriendIsCurrentUser,
}
