use crate::model::{Id, user::User};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use thiserror::Error;
use time::UtcDateTime;

pub const COMMENT_TEXT_MAX_LEN: usize = 500;

/// One-tap reactions offered next to the comment box.
pub const QUICK_REACTIONS: [&str; 8] = [
    "❤️ Amazing!",
    "🔥 So cool!",
    "😂 Haha",
    "😍 Love it",
    "👏 Great!",
    "💯 Perfect",
    "⭐ Nice",
    "🎉 Awesome",
];

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct CommentMarker;

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Comment {
    pub id: Id<CommentMarker>,
    pub author: User,
    pub text: CommentText,
    pub created_at: UtcDateTime,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub is_liked: bool,
}

impl Comment {
    #[must_use]
    pub fn new(
        id: Id<CommentMarker>,
        author: User,
        text: CommentText,
        created_at: UtcDateTime,
    ) -> Self {
        Self {
            id,
            author,
            text,
            created_at,
            likes_count: 0,
            is_liked: false,
        }
    }

    /// Flips the viewer's like and returns the new state.
    pub fn toggle_like(&mut self) -> bool {
        let liked = !self.is_liked;
        self.set_liked(liked);
        liked
    }

    /// Returns whether anything changed.
    pub fn set_liked(&mut self, liked: bool) -> bool {
        if self.is_liked == liked {
            return false;
        }
        self.is_liked = liked;
        if liked {
            self.likes_count = self.likes_count.saturating_add(1);
        } else {
            self.likes_count = self.likes_count.saturating_sub(1);
        }
        true
    }
}

/// Trimmed, non-empty comment text.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct CommentText(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum InvalidCommentTextError {
    #[error("Comment text is empty")]
    Empty,
    #[error("Comment text is longer than {COMMENT_TEXT_MAX_LEN} characters")]
    TooLong,
}

impl CommentText {
    pub fn new(text: &str) -> Result<Self, InvalidCommentTextError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Err(InvalidCommentTextError::Empty)
        } else if trimmed.chars().count() > COMMENT_TEXT_MAX_LEN {
            Err(InvalidCommentTextError::TooLong)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CommentText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        CommentText::new(&inner)
            .map_err(|_| Error::invalid_value(Unexpected::Str(&inner), &"CommentText"))
    }
}
