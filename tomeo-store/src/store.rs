use crate::{
    error::{Result, StoreError},
    event::{EventBus, StoreEvent},
    media::MediaPair,
    persist::{PersistError, Snapshot},
};
use serde::Deserialize;
use std::cmp::Reverse;
use time::UtcDateTime;
use tokio::sync::broadcast;
use tomeo_common::model::{
    Id, TomeoSnowflakeGenerator,
    comment::{Comment, CommentMarker, CommentText},
    post::{CreatePost, Post, PostMarker, SharePost, recording_file_name},
    reminder::ReminderSettings,
    user::{User, UserMarker},
};
use tracing::debug;

/// Which slice of the posts a feed shows.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    #[default]
    All,
    Hot,
    Friends,
}

/// The single owner of all social data in the process.
///
/// Every read returns borrowed or cloned snapshots; every write goes through
/// a method here so the comment counts, like counts and friend list stay
/// consistent, and so each change is announced on the event bus.
#[derive(Debug)]
pub struct SocialStore {
    current_user: User,
    /// Newest first.
    posts: Vec<Post>,
    friends: Vec<User>,
    reminder_settings: ReminderSettings,
    id_generator: TomeoSnowflakeGenerator,
    events: EventBus,
}

impl SocialStore {
    #[must_use]
    pub fn new(current_user: User, id_generator: TomeoSnowflakeGenerator) -> Self {
        Self {
            current_user,
            posts: Vec::new(),
            friends: Vec::new(),
            reminder_settings: ReminderSettings::default(),
            id_generator,
            events: EventBus::default(),
        }
    }

    pub fn from_snapshot(
        snapshot: Snapshot,
        id_generator: TomeoSnowflakeGenerator,
    ) -> Result<Self, PersistError> {
        snapshot.validate()?;

        Ok(Self {
            current_user: snapshot.current_user,
            posts: snapshot.posts,
            friends: snapshot.friends,
            reminder_settings: snapshot.reminder_settings,
            id_generator,
            events: EventBus::default(),
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_user: self.current_user.clone(),
            posts: self.posts.clone(),
            friends: self.friends.clone(),
            reminder_settings: self.reminder_settings,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn current_user(&self) -> &User {
        &self.current_user
    }

    /// Replaces the viewer. A friend who becomes the viewer leaves the
    /// friends list.
    pub fn set_current_user(&mut self, mut user: User) {
        user.is_friend = false;
        self.friends.retain(|friend| friend.id != user.id);
        debug!(user_id = %user.id, handle = user.handle.get(), "Current user set");
        self.current_user = user.clone();
        self.events.publish(StoreEvent::CurrentUserChanged {
            user: Box::new(user),
        });
    }

    #[must_use]
    pub fn friends(&self) -> &[User] {
        &self.friends
    }

    #[must_use]
    pub fn is_friend(&self, user_id: &Id<UserMarker>) -> bool {
        self.friends.iter().any(|friend| &friend.id == user_id)
    }

    /// Returns `Ok(false)` if the user already was a friend.
    pub fn add_friend(&mut self, mut user: User) -> Result<bool> {
        if user.id == self.current_user.id {
            return Err(StoreError::FriendIsCurrentUser);
        }
        if self.is_friend(&user.id) {
            return Ok(false);
        }

        user.is_friend = true;
        debug!(user_id = %user.id, "Friend added");
        self.friends.push(user.clone());
        self.events.publish(StoreEvent::FriendAdded {
            user: Box::new(user),
        });
        Ok(true)
    }

    pub fn remove_friend(&mut self, user_id: &Id<UserMarker>) -> Result<User> {
        let index = self
            .friends
            .iter()
            .position(|friend| &friend.id == user_id)
            .ok_or_else(|| StoreError::FriendNotFound(user_id.clone()))?;

        let mut removed = self.friends.remove(index);
        removed.is_friend = false;
        debug!(%user_id, "Friend removed");
        self.events.publish(StoreEvent::FriendRemoved {
            user_id: user_id.clone(),
        });
        Ok(removed)
    }

    /// All posts, newest first.
    #[must_use]
    pub fn all_posts(&self) -> &[Post] {
        &self.posts
    }

    /// All posts by descending like count; equal counts keep feed order.
    #[must_use]
    pub fn hot_posts(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.iter().collect();
        posts.sort_by_key(|post| Reverse(post.likes_count));
        posts
    }

    /// Posts written by friends, in feed order.
    #[must_use]
    pub fn friends_posts(&self) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| self.is_friend(&post.author.id))
            .collect()
    }

    #[must_use]
    pub fn feed(&self, feed: Feed) -> Vec<&Post> {
        match feed {
            Feed::All => self.posts.iter().collect(),
            Feed::Hot => self.hot_posts(),
            Feed::Friends => self.friends_posts(),
        }
    }

    #[must_use]
    pub fn post(&self, post_id: &Id<PostMarker>) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == post_id)
    }

    fn post_mut(&mut self, post_id: &Id<PostMarker>) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|post| &post.id == post_id)
            .ok_or_else(|| StoreError::PostNotFound(post_id.clone()))
    }

    fn comment_mut(
        &mut self,
        post_id: &Id<PostMarker>,
        comment_id: &Id<CommentMarker>,
    ) -> Result<&mut Comment> {
        self.post_mut(post_id)?
            .comment_mut(comment_id)
            .ok_or_else(|| StoreError::CommentNotFound {
                post_id: post_id.clone(),
                comment_id: comment_id.clone(),
            })
    }

    /// Puts `post` at the top of the feed.
    pub fn add_post(&mut self, post: Post) -> Result<()> {
        if self.post(&post.id).is_some() {
            return Err(StoreError::DuplicatePost(post.id));
        }

        debug!(post_id = %post.id, "Post added");
        self.posts.insert(0, post.clone());
        self.events.publish(StoreEvent::PostAdded {
            post: Box::new(post),
        });
        Ok(())
    }

    /// Publishes a new post by the current user. Without media the post
    /// points at the recording file the camera names for this moment.
    pub fn create_post(&mut self, mut create: CreatePost) -> Result<Post> {
        let now = UtcDateTime::now();
        if create.media.is_empty() {
            create.media = recording_file_name(now);
        }

        let post = Post::from_create(
            self.id_generator.generate_id(),
            self.current_user.clone(),
            create,
            now,
        );
        self.add_post(post.clone())?;
        Ok(post)
    }

    pub fn delete_post(&mut self, post_id: &Id<PostMarker>) -> Result<Post> {
        let index = self
            .posts
            .iter()
            .position(|post| &post.id == post_id)
            .ok_or_else(|| StoreError::PostNotFound(post_id.clone()))?;

        let removed = self.posts.remove(index);
        debug!(%post_id, "Post deleted");
        self.events.publish(StoreEvent::PostDeleted {
            post_id: post_id.clone(),
        });
        Ok(removed)
    }

    /// Returns `Ok(false)` if the post was already liked.
    pub fn like_post(&mut self, post_id: &Id<PostMarker>) -> Result<bool> {
        self.set_post_liked(post_id, true)
    }

    /// Returns `Ok(false)` if the post was not liked.
    pub fn unlike_post(&mut self, post_id: &Id<PostMarker>) -> Result<bool> {
        self.set_post_liked(post_id, false)
    }

    fn set_post_liked(&mut self, post_id: &Id<PostMarker>, liked: bool) -> Result<bool> {
        let post = self.post_mut(post_id)?;
        if !post.set_liked(liked) {
            return Ok(false);
        }

        let event = StoreEvent::PostLikeChanged {
            post_id: post_id.clone(),
            is_liked: post.is_liked,
            likes_count: post.likes_count,
        };
        debug!(%post_id, liked, "Post like changed");
        self.events.publish(event);
        Ok(true)
    }

    /// Appends `comment` to the post's thread.
    pub fn add_comment(&mut self, post_id: &Id<PostMarker>, comment: Comment) -> Result<()> {
        let post = self.post_mut(post_id)?;
        if !post.push_comment(comment.clone()) {
            return Err(StoreError::DuplicateComment {
                post_id: post_id.clone(),
                comment_id: comment.id,
            });
        }

        debug!(%post_id, comment_id = %comment.id, "Comment added");
        self.events.publish(StoreEvent::CommentAdded {
            post_id: post_id.clone(),
            comment: Box::new(comment),
        });
        Ok(())
    }

    /// Comments on a post as the current user.
    pub fn comment_on_post(&mut self, post_id: &Id<PostMarker>, text: CommentText) -> Result<Comment> {
        if self.post(post_id).is_none() {
            return Err(StoreError::PostNotFound(post_id.clone()));
        }

        let comment = Comment::new(
            self.id_generator.generate_id(),
            self.current_user.clone(),
            text,
            UtcDateTime::now(),
        );
        self.add_comment(post_id, comment.clone())?;
        Ok(comment)
    }

    pub fn delete_comment(
        &mut self,
        post_id: &Id<PostMarker>,
        comment_id: &Id<CommentMarker>,
    ) -> Result<Comment> {
        let removed = self
            .post_mut(post_id)?
            .remove_comment(comment_id)
            .ok_or_else(|| StoreError::CommentNotFound {
                post_id: post_id.clone(),
                comment_id: comment_id.clone(),
            })?;

        debug!(%post_id, %comment_id, "Comment deleted");
        self.events.publish(StoreEvent::CommentDeleted {
            post_id: post_id.clone(),
            comment_id: comment_id.clone(),
        });
        Ok(removed)
    }

    /// Flips the viewer's like on a comment and returns the new state.
    pub fn like_comment(
        &mut self,
        post_id: &Id<PostMarker>,
        comment_id: &Id<CommentMarker>,
    ) -> Result<bool> {
        let comment = self.comment_mut(post_id, comment_id)?;
        let liked = comment.toggle_like();
        let likes_count = comment.likes_count;

        self.publish_comment_like(post_id, comment_id, liked, likes_count);
        Ok(liked)
    }

    /// Returns `Ok(false)` if the comment was already in that state.
    pub fn set_comment_liked(
        &mut self,
        post_id: &Id<PostMarker>,
        comment_id: &Id<CommentMarker>,
        liked: bool,
    ) -> Result<bool> {
        let comment = self.comment_mut(post_id, comment_id)?;
        if !comment.set_liked(liked) {
            return Ok(false);
        }
        let likes_count = comment.likes_count;

        self.publish_comment_like(post_id, comment_id, liked, likes_count);
        Ok(true)
    }

    fn publish_comment_like(
        &self,
        post_id: &Id<PostMarker>,
        comment_id: &Id<CommentMarker>,
        is_liked: bool,
        likes_count: u32,
    ) {
        debug!(%post_id, %comment_id, is_liked, "Comment like changed");
        self.events.publish(StoreEvent::CommentLikeChanged {
            post_id: post_id.clone(),
            comment_id: comment_id.clone(),
            is_liked,
            likes_count,
        });
    }

    pub fn attach_thumbnail(
        &mut self,
        post_id: &Id<PostMarker>,
        media: String,
        thumbnail: String,
    ) -> Result<()> {
        let post = self.post_mut(post_id)?;
        post.media.clone_from(&media);
        post.thumbnail = Some(thumbnail.clone());

        debug!(%post_id, %thumbnail, "Thumbnail attached");
        self.events.publish(StoreEvent::ThumbnailAttached {
            post_id: post_id.clone(),
            media,
            thumbnail,
        });
        Ok(())
    }

    /// Hands scanned videos to posts in feed order, one each, until either
    /// side runs out. Returns how many posts were updated.
    pub fn attach_media_pairs(&mut self, pairs: &[MediaPair]) -> usize {
        let mut attached = 0;
        for (post, pair) in self.posts.iter_mut().zip(pairs) {
            let media = pair.video.display().to_string();
            let thumbnail = pair.thumbnail.display().to_string();
            post.media.clone_from(&media);
            post.thumbnail = Some(thumbnail.clone());

            self.events.publish(StoreEvent::ThumbnailAttached {
                post_id: post.id.clone(),
                media,
                thumbnail,
            });
            attached += 1;
        }

        debug!(attached, available = pairs.len(), "Attached scanned media");
        attached
    }

    pub fn share_post(&mut self, post_id: &Id<PostMarker>, share: SharePost) -> Result<()> {
        if self.post(post_id).is_none() {
            return Err(StoreError::PostNotFound(post_id.clone()));
        }

        debug!(%post_id, platform = ?share.platform, "Post shared");
        self.events.publish(StoreEvent::PostShared {
            post_id: post_id.clone(),
            platform: share.platform,
            message: share.message,
        });
        Ok(())
    }

    #[must_use]
    pub fn reminder_settings(&self) -> &ReminderSettings {
        &self.reminder_settings
    }

    pub fn set_reminder_settings(&mut self, settings: ReminderSettings) {
        self.reminder_settings = settings;
        debug!(?settings, "Reminder settings updated");
        self.events
            .publish(StoreEvent::ReminderSettingsChanged { settings });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::{
        error::StoreError,
        event::StoreEvent,
        media::MediaPair,
        store::{Feed, SocialStore},
    };
    use std::path::PathBuf;
    use time::macros::utc_datetime;
    use tokio::sync::broadcast::error::TryRecvError;
    use tomeo_common::{
        model::{
            Id, TomeoSnowflakeGenerator,
            comment::{Comment, CommentText},
            post::{CreatePost, Post, SharePlatform, SharePost},
            reminder::ReminderSettings,
            user::{User, UserHandle},
        },
        snowflake::{ProcessId, WorkerId},
    };

    pub(crate) fn user(id: &str) -> User {
        User::new(
            Id::new(id).unwrap(),
            UserHandle::new(format!("@{id}")).unwrap(),
            id,
        )
    }

    pub(crate) fn post(id: &str, author: &User, likes_count: u32) -> Post {
        let mut post = Post::new(
            Id::new(id).unwrap(),
            author.clone(),
            format!("videos/{id}.mp4"),
            utc_datetime!(2025-06-01 12:00),
        );
        post.likes_count = likes_count;
        post
    }

    fn comment(id: &str, text: &str) -> Comment {
        Comment::new(
            Id::new(id).unwrap(),
            user("user002"),
            CommentText::new(text).unwrap(),
            utc_datetime!(2025-06-01 12:10),
        )
    }

    pub(crate) fn store() -> SocialStore {
        SocialStore::new(
            user("user001"),
            TomeoSnowflakeGenerator::new(WorkerId::new_unchecked(0), ProcessId::new_unchecked(0)),
        )
    }

    fn id<M>(id: &str) -> Id<M> {
        Id::new(id).unwrap()
    }

    #[test]
    fn like_unlike_scenario() {
        let mut store = store();
        let me = store.current_user().clone();
        store.add_post(post("p1", &me, 5)).unwrap();
        let p1 = id("p1");

        assert_eq!(store.like_post(&p1), Ok(true));
        let liked = store.post(&p1).unwrap();
        assert_eq!((liked.likes_count, liked.is_liked), (6, true));

        assert_eq!(store.like_post(&p1), Ok(false));
        assert_eq!(store.post(&p1).unwrap().likes_count, 6);

        assert_eq!(store.unlike_post(&p1), Ok(true));
        let unliked = store.post(&p1).unwrap();
        assert_eq!((unliked.likes_count, unliked.is_liked), (5, false));

        assert_eq!(store.unlike_post(&p1), Ok(false));
        assert_eq!(store.post(&p1).unwrap().likes_count, 5);
    }

    #[test]
    fn comment_scenario() {
        let mut store = store();
        let me = store.current_user().clone();
        store.add_post(post("p1", &me, 0)).unwrap();
        let (p1, c1) = (id("p1"), id("c1"));

        store.add_comment(&p1, comment("c1", "hi")).unwrap();
        let post = store.post(&p1).unwrap();
        assert_eq!(post.comments_count(), 1);
        assert_eq!(post.comments().len(), 1);
        assert_eq!(post.comments()[0].id, c1);

        assert_eq!(store.like_comment(&p1, &c1), Ok(true));
        let liked = store.post(&p1).unwrap().comment(&c1).unwrap();
        assert_eq!((liked.is_liked, liked.likes_count), (true, 1));

        assert_eq!(store.like_comment(&p1, &c1), Ok(false));
        let unliked = store.post(&p1).unwrap().comment(&c1).unwrap();
        assert_eq!((unliked.is_liked, unliked.likes_count), (false, 0));
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut store = store();
        let me = store.current_user().clone();
        store.add_post(post("p1", &me, 0)).unwrap();

        assert!(store.post(&id("nonexistent")).is_none());
        assert_eq!(
            store.like_post(&id("nope")),
            Err(StoreError::PostNotFound(id("nope")))
        );
        assert_eq!(
            store.add_comment(&id("nope"), comment("c1", "hi")),
            Err(StoreError::PostNotFound(id("nope")))
        );
        assert_eq!(
            store.delete_comment(&id("p1"), &id("c9")),
            Err(StoreError::CommentNotFound {
                post_id: id("p1"),
                comment_id: id("c9"),
            })
        );
        assert_eq!(
            store.like_comment(&id("p1"), &id("c9")),
            Err(StoreError::CommentNotFound {
                post_id: id("p1"),
                comment_id: id("c9"),
            })
        );
        assert!(matches!(
            store.delete_post(&id("nope")),
            Err(StoreError::PostNotFound(_))
        ));
    }

    #[test]
    fn added_posts_go_first_and_keep_their_fields() {
        let mut store = store();
        let me = store.current_user().clone();
        let mut first = post("p1", &me, 3);
        first.tags = vec!["beach".to_owned()];
        first.is_moment = true;
        first.push_comment(comment("c1", "nice"));

        store.add_post(first.clone()).unwrap();
        store.add_post(post("p2", &me, 1)).unwrap();

        let order: Vec<&str> = store.all_posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["p2", "p1"]);
        assert_eq!(store.post(&id("p1")), Some(&first));
        assert_eq!(store.post(&id("p1")).unwrap().tags, first.tags);

        assert_eq!(
            store.add_post(post("p1", &me, 0)),
            Err(StoreError::DuplicatePost(id("p1")))
        );
        assert_eq!(store.all_posts().len(), 2);
    }

    #[test]
    fn delete_post_removes_it() {
        let mut store = store();
        let me = store.current_user().clone();
        store.add_post(post("p1", &me, 0)).unwrap();
        store.add_post(post("p2", &me, 0)).unwrap();

        let removed = store.delete_post(&id("p1")).unwrap();
        assert_eq!(removed.id, id("p1"));
        assert!(store.post(&id("p1")).is_none());
        assert_eq!(store.all_posts().len(), 1);
    }

    #[test]
    fn hot_feed_is_sorted_and_stable() {
        let mut store = store();
        let me = store.current_user().clone();
        for (name, likes) in [("a", 10), ("b", 30), ("c", 10), ("d", 50), ("e", 30)] {
            store.add_post(post(name, &me, likes)).unwrap();
        }

        let hot = store.hot_posts();
        for pair in hot.windows(2) {
            assert!(pair[0].likes_count >= pair[1].likes_count);
        }
        // Feed order is e d c b a, so ties keep e before b and c before a.
        let order: Vec<&str> = hot.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["d", "e", "b", "c", "a"]);
        assert_eq!(store.feed(Feed::Hot), hot);
    }

    #[test]
    fn friends_feed_only_has_friends() {
        let mut store = store();
        let me = store.current_user().clone();
        let (friend, stranger) = (user("user002"), user("user003"));
        store.add_friend(friend.clone()).unwrap();

        store.add_post(post("p1", &me, 0)).unwrap();
        store.add_post(post("p2", &friend, 0)).unwrap();
        store.add_post(post("p3", &stranger, 0)).unwrap();
        store.add_post(post("p4", &friend, 0)).unwrap();

        let friends_posts = store.friends_posts();
        assert!(
            friends_posts
                .iter()
                .all(|post| store.friends().contains(&post.author))
        );
        let order: Vec<&str> = friends_posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["p4", "p2"]);
    }

    #[test]
    fn friends_are_deduplicated_and_exclude_me() {
        let mut store = store();
        let friend = user("user002");

        assert_eq!(store.add_friend(friend.clone()), Ok(true));
        assert_eq!(store.add_friend(friend.clone()), Ok(false));
        assert_eq!(store.friends().len(), 1);
        assert!(store.friends()[0].is_friend);

        assert_eq!(
            store.add_friend(user("user001")),
            Err(StoreError::FriendIsCurrentUser)
        );

        let removed = store.remove_friend(&friend.id).unwrap();
        assert!(!removed.is_friend);
        assert!(store.friends().is_empty());
        assert_eq!(
            store.remove_friend(&friend.id),
            Err(StoreError::FriendNotFound(friend.id))
        );
    }

    #[test]
    fn becoming_the_current_user_leaves_friends() {
        let mut store = store();
        store.add_friend(user("user002")).unwrap();
        store.add_friend(user("user003")).unwrap();

        let friend = store.friends()[0].clone();
        assert!(friend.is_friend);
        store.set_current_user(friend);

        assert_eq!(store.current_user().id, id("user002"));
        assert!(!store.current_user().is_friend);
        assert!(!store.is_friend(&id("user002")));
        assert!(store.is_friend(&id("user003")));
    }

    #[test]
    fn comments_track_count_through_deletes() {
        let mut store = store();
        let me = store.current_user().clone();
        store.add_post(post("p1", &me, 0)).unwrap();
        let p1 = id("p1");

        store.add_comment(&p1, comment("c1", "one")).unwrap();
        store.add_comment(&p1, comment("c2", "two")).unwrap();
        assert_eq!(
            store.add_comment(&p1, comment("c1", "again")),
            Err(StoreError::DuplicateComment {
                post_id: p1.clone(),
                comment_id: id("c1"),
            })
        );

        store.delete_comment(&p1, &id("c1")).unwrap();
        let post = store.post(&p1).unwrap();
        assert_eq!(post.comments_count(), 1);
        assert_eq!(post.comments()[0].id, id("c2"));
    }

    #[test]
    fn created_content_belongs_to_current_user() {
        let mut store = store();
        let created = store
            .create_post(CreatePost {
                caption: "first".to_owned(),
                media: "videos/new.mp4".to_owned(),
                ..CreatePost::default()
            })
            .unwrap();

        assert_eq!(created.author, *store.current_user());
        assert_eq!(store.all_posts()[0].id, created.id);

        let comment = store
            .comment_on_post(&created.id, CommentText::new(" hello ").unwrap())
            .unwrap();
        assert_eq!(comment.author, *store.current_user());
        assert_eq!(comment.text.get(), "hello");
        assert_eq!(store.post(&created.id).unwrap().comments_count(), 1);

        assert_eq!(
            store.comment_on_post(&id("nope"), CommentText::new("x").unwrap()),
            Err(StoreError::PostNotFound(id("nope")))
        );
    }

    #[test]
    fn recordings_get_a_file_name() {
        let mut store = store();
        let created = store
            .create_post(CreatePost {
                caption: "moment".to_owned(),
                is_moment: true,
                ..CreatePost::default()
            })
            .unwrap();

        let name = &created.media;
        assert!(name.starts_with("tomeo_video_"), "{name}");
        assert!(name.ends_with(".mp4"), "{name}");
        assert_eq!(name.len(), "tomeo_video_20250601_120000.mp4".len());
    }

    #[test]
    fn events_only_for_real_changes() {
        let mut store = store();
        let me = store.current_user().clone();
        store.add_post(post("p1", &me, 5)).unwrap();
        let mut events = store.subscribe();
        let p1 = id("p1");

        store.like_post(&p1).unwrap();
        assert_eq!(
            events.try_recv(),
            Ok(StoreEvent::PostLikeChanged {
                post_id: p1.clone(),
                is_liked: true,
                likes_count: 6,
            })
        );

        store.like_post(&p1).unwrap();
        store.like_post(&id("nope")).unwrap_err();
        store.add_friend(user("user001")).unwrap_err();
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

        store.add_comment(&p1, comment("c1", "hi")).unwrap();
        assert!(matches!(
            events.try_recv(),
            Ok(StoreEvent::CommentAdded { post_id, .. }) if post_id == p1
        ));

        let c1 = id("c1");
        store.like_comment(&p1, &c1).unwrap();
        assert_eq!(
            events.try_recv(),
            Ok(StoreEvent::CommentLikeChanged {
                post_id: p1.clone(),
                comment_id: c1.clone(),
                is_liked: true,
                likes_count: 1,
            })
        );
        assert_eq!(store.set_comment_liked(&p1, &c1, true), Ok(false));
        assert_eq!(events.try_recv(), Err(TryRecvError::Empty));

        store.delete_post(&p1).unwrap();
        assert_eq!(
            events.try_recv(),
            Ok(StoreEvent::PostDeleted { post_id: p1 })
        );
    }

    #[test]
    fn thumbnails_attach_in_feed_order() {
        let mut store = store();
        let me = store.current_user().clone();
        for name in ["p1", "p2", "p3"] {
            store.add_post(post(name, &me, 0)).unwrap();
        }

        let pairs = [
            MediaPair {
                video: PathBuf::from("/media/a.mp4"),
                thumbnail: PathBuf::from("/media/a.png"),
            },
            MediaPair {
                video: PathBuf::from("/media/b.mov"),
                thumbnail: PathBuf::from("/media/b.png"),
            },
        ];
        assert_eq!(store.attach_media_pairs(&pairs), 2);

        let posts = store.all_posts();
        assert_eq!(posts[0].media, "/media/a.mp4");
        assert_eq!(posts[1].thumbnail.as_deref(), Some("/media/b.png"));
        assert_eq!(posts[2].thumbnail, None);

        store
            .attach_thumbnail(&id("p1"), "x.mp4".to_owned(), "x.png".to_owned())
            .unwrap();
        assert_eq!(store.post(&id("p1")).unwrap().thumbnail.as_deref(), Some("x.png"));
    }

    #[test]
    fn share_and_settings_raise_events() {
        let mut store = store();
        let me = store.current_user().clone();
        store.add_post(post("p1", &me, 0)).unwrap();
        let mut events = store.subscribe();

        let share = SharePost {
            platform: SharePlatform::WhatsApp,
            message: None,
        };
        store.share_post(&id("p1"), share.clone()).unwrap();
        assert!(matches!(
            events.try_recv(),
            Ok(StoreEvent::PostShared {
                platform: SharePlatform::WhatsApp,
                ..
            })
        ));
        assert!(store.share_post(&id("nope"), share).is_err());

        let settings = ReminderSettings {
            sound_enabled: false,
            ..ReminderSettings::default()
        };
        store.set_reminder_settings(settings);
        assert_eq!(*store.reminder_settings(), settings);
        assert_eq!(
            events.try_recv(),
            Ok(StoreEvent::ReminderSettingsChanged { settings })
        );
    }
}
