use crate::model::{
    Id, ModelValidationError,
    comment::{Comment, CommentMarker},
    user::User,
};
use serde::{Deserialize, Serialize, Serializer};
use time::UtcDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A shared video with its engagement counters and comment thread.
///
/// The comment list is only reachable through methods so the comment count
/// can never drift from it.
#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
#[serde(try_from = "PostRecord")]
pub struct Post {
    pub id: Id<PostMarker>,
    pub author: User,
    /// URL or local path of the video.
    pub media: String,
    pub thumbnail: Option<String>,
    pub caption: String,
    pub created_at: UtcDateTime,
    pub likes_count: u32,
    pub views_count: u32,
    pub is_liked: bool,
    pub tags: Vec<String>,
    pub is_front_camera: bool,
    pub is_moment: bool,
    comments: Vec<Comment>,
}

/// What a client supplies when publishing; the store fills in the rest.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct CreatePost {
    pub caption: String,
    /// Empty for a fresh recording.
    #[serde(default)]
    pub media: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_front_camera: bool,
    #[serde(default)]
    pub is_moment: bool,
}

/// Where a post can be shared to.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePlatform {
    Facebook,
    Twitter,
    Instagram,
    WeChat,
    WhatsApp,
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct SharePost {
    pub platform: SharePlatform,
    #[serde(default)]
    pub message: Option<String>,
}

impl Post {
    #[must_use]
    pub fn new(
        id: Id<PostMarker>,
        author: User,
        media: impl Into<String>,
        created_at: UtcDateTime,
    ) -> Self {
        Self {
            id,
            author,
            media: media.into(),
            thumbnail: None,
            caption: String::new(),
            created_at,
            likes_count: 0,
            views_count: 0,
            is_liked: false,
            tags: Vec::new(),
            is_front_camera: false,
            is_moment: false,
            comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_create(
        id: Id<PostMarker>,
        author: User,
        create: CreatePost,
        created_at: UtcDateTime,
    ) -> Self {
        Self {
            caption: create.caption,
            thumbnail: create.thumbnail,
            tags: create.tags,
            is_front_camera: create.is_front_camera,
            is_moment: create.is_moment,
            ..Self::new(id, author, create.media, created_at)
        }
    }

    /// Comments in the order they were added.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    #[must_use]
    pub fn comments_count(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn comment(&self, id: &Id<CommentMarker>) -> Option<&Comment> {
        self.comments.iter().find(|comment| &comment.id == id)
    }

    pub fn comment_mut(&mut self, id: &Id<CommentMarker>) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|comment| &comment.id == id)
    }

    /// Appends `comment` unless one with the same id is already present.
    pub fn push_comment(&mut self, comment: Comment) -> bool {
        if self.comment(&comment.id).is_some() {
            return false;
        }
        self.comments.push(comment);
        true
    }

    pub fn remove_comment(&mut self, id: &Id<CommentMarker>) -> Option<Comment> {
        let index = self.comments.iter().position(|comment| &comment.id == id)?;
        Some(self.comments.remove(index))
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

#[derive(Serialize)]
struct PostRef<'a> {
    id: &'a Id<PostMarker>,
    author: &'a User,
    media: &'a str,
    thumbnail: Option<&'a str>,
    caption: &'a str,
    created_at: UtcDateTime,
    likes_count: u32,
    comments_count: usize,
    views_count: u32,
    is_liked: bool,
    comments: &'a [Comment],
    tags: &'a [String],
    is_front_camera: bool,
    is_moment: bool,
}

impl Serialize for Post {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        PostRef {
            id: &self.id,
            author: &self.author,
            media: &self.media,
            thumbnail: self.thumbnail.as_deref(),
            caption: &self.caption,
            created_at: self.created_at,
            likes_count: self.likes_count,
            comments_count: self.comments.len(),
            views_count: self.views_count,
            is_liked: self.is_liked,
            comments: &self.comments,
            tags: &self.tags,
            is_front_camera: self.is_front_camera,
            is_moment: self.is_moment,
        }
        .serialize(serializer)
    }
}

#[derive(Deserialize)]
struct PostRecord {
    id: Id<PostMarker>,
    author: User,
    media: String,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    caption: String,
    created_at: UtcDateTime,
    #[serde(default)]
    likes_count: u32,
    #[serde(default)]
    comments_count: Option<usize>,
    #[serde(default)]
    views_count: u32,
    #[serde(default)]
    is_liked: bool,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_front_camera: bool,
    #[serde(default)]
    is_moment: bool,
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        if let Some(declared) = value.comments_count
            && declared != value.comments.len()
        {
            return Err(ModelValidationError::CommentCountMismatch {
                declared,
                actual: value.comments.len(),
            });
        }

        let mut post = Self {
            caption: value.caption,
            thumbnail: value.thumbnail,
            likes_count: value.likes_count,
            views_count: value.views_count,
            is_liked: value.is_liked,
            tags: value.tags,
            is_front_camera: value.is_front_camera,
            is_moment: value.is_moment,
            ..Self::new(value.id, value.author, value.media, value.created_at)
        };
        for comment in value.comments {
            let id = comment.id.clone();
            if !post.push_comment(comment) {
                return Err(ModelValidationError::DuplicateCommentId(id.into_inner()));
            }
        }

        Ok(post)
    }
}

/// File name the simulated camera gives a recording made at `at`.
#[must_use]
pub fn recording_file_name(at: UtcDateTime) -> String {
    format!(
        "tomeo_video_{:04}{:02}{:02}_{:02}{:02}{:02}.mp4",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
    )
}
