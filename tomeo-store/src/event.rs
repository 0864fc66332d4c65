use serde::Serialize;
use tokio::sync::broadcast;
use tomeo_common::model::{
    Id,
    comment::{Comment, CommentMarker},
    post::{Post, PostMarker, SharePlatform},
    reminder::ReminderSettings,
    user::{User, UserMarker},
};
use tracing::trace;

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_CAPACITY: usize = 256;

/// Something that changed in the store.
///
/// Only successful mutations produce an event; calls that leave the store
/// untouched are silent.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    PostAdded {
        post: Box<Post>,
    },
    PostDeleted {
        post_id: Id<PostMarker>,
    },
    PostLikeChanged {
        post_id: Id<PostMarker>,
        is_liked: bool,
        likes_count: u32,
    },
    CommentAdded {
        post_id: Id<PostMarker>,
        comment: Box<Comment>,
    },
    CommentDeleted {
        post_id: Id<PostMarker>,
        comment_id: Id<CommentMarker>,
    },
    CommentLikeChanged {
        post_id: Id<PostMarker>,
        comment_id: Id<CommentMarker>,
        is_liked: bool,
        likes_count: u32,
    },
    FriendAdded {
        user: Box<User>,
    },
    FriendRemoved {
        user_id: Id<UserMarker>,
    },
    ThumbnailAttached {
        post_id: Id<PostMarker>,
        media: String,
        thumbnail: String,
    },
    PostShared {
        post_id: Id<PostMarker>,
        platform: SharePlatform,
        message: Option<String>,
    },
    CurrentUserChanged {
        user: Box<User>,
    },
    ReminderSettingsChanged {
        settings: ReminderSettings,
    },
}

impl StoreEvent {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PostAdded { .. } => "post_added",
            Self::PostDeleted { .. } => "post_deleted",
            Self::PostLikeChanged { .. } => "post_like_changed",
            Self::CommentAdded { .. } => "comment_added",
            Self::CommentDeleted { .. } => "comment_deleted",
            Self::CommentLikeChanged { .. } => "comment_like_changed",
            Self::FriendAdded { .. } => "friend_added",
            Self::FriendRemoved { .. } => "friend_removed",
            Self::ThumbnailAttached { .. } => "thumbnail_attached",
            Self::PostShared { .. } => "post_shared",
            Self::CurrentUserChanged { .. } => "current_user_changed",
            Self::ReminderSettingsChanged { .. } => "reminder_settings_changed",
        }
    }
}

/// Fan-out of store events to any number of subscribers.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: StoreEvent) {
        let kind = event.kind();
        // Sending only fails when nobody is listening.
        if self.sender.send(event).is_err() {
            trace!(kind, "No subscribers for store event");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CAPACITY)
    }
}
