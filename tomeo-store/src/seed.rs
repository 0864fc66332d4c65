//! The demo dataset a fresh install starts with.

use crate::persist::Snapshot;
use rand::Rng;
use time::{Duration, UtcDateTime};
use tomeo_common::model::{
    Id, ModelValidationError,
    comment::{Comment, CommentText},
    post::Post,
    reminder::ReminderSettings,
    user::{User, UserHandle},
};
use tracing::info;

pub const DEMO_POST_COUNT: usize = 10;

fn demo_user(
    id: &str,
    handle: &str,
    display_name: &str,
    bio: &str,
    (followers_count, following_count): (u32, u32),
) -> Result<User, ModelValidationError> {
    Ok(User {
        bio: bio.to_owned(),
        followers_count,
        following_count,
        ..User::new(
            Id::new(id)?,
            UserHandle::new(handle.to_owned())?,
            display_name,
        )
    })
}

/// The viewer a store starts with when there is neither a snapshot nor demo
/// data.
pub fn default_user() -> Result<User, ModelValidationError> {
    demo_user(
        "user001",
        "@YourName",
        "Your Name",
        "📸 Recording life moments",
        (245, 189),
    )
}

/// The current user, two friends and ten posts rotating between the three of
/// them, newest first and an hour apart.
pub fn demo_snapshot(
    now: UtcDateTime,
    rng: &mut impl Rng,
) -> Result<Snapshot, ModelValidationError> {
    let me = default_user()?;
    let hand = demo_user(
        "user002",
        "@HandName",
        "HandName",
        "🎬 Video creator",
        (1024, 432),
    )?;
    let another = demo_user(
        "user003",
        "@anotherfriend",
        "Another Friend",
        "✨ Life is beautiful",
        (567, 234),
    )?;

    let mut posts = Vec::with_capacity(DEMO_POST_COUNT);
    for (i, hours_ago) in (0..DEMO_POST_COUNT).zip(0_i64..) {
        let author = match i % 3 {
            0 => &me,
            1 => &hand,
            _ => &another,
        };
        let created_at = now - Duration::hours(hours_ago);

        let mut post = Post::new(
            Id::new(format!("post_{i}"))?,
            author.clone(),
            String::new(),
            created_at,
        );
        post.caption = format!("This is video post #{}", i + 1);
        post.likes_count = rng.random_range(10..100);
        post.views_count = rng.random_range(50..500);
        post.is_liked = i % 4 == 0;
        post.is_moment = i % 5 == 0;

        if i % 2 == 0 {
            let mut comment = Comment::new(
                Id::new(format!("comment_{i}_1"))?,
                hand.clone(),
                CommentText::new("Amazing! 👍")?,
                created_at + Duration::minutes(10),
            );
            comment.likes_count = 5;
            post.push_comment(comment);
        }
        posts.push(post);
    }

    let friends = [hand, another]
        .into_iter()
        .map(|friend| User {
            is_friend: true,
            ..friend
        })
        .collect();

    info!(posts = posts.len(), "Built demo data");
    Ok(Snapshot {
        current_user: me,
        posts,
        friends,
        reminder_settings: ReminderSettings::default(),
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        seed::{DEMO_POST_COUNT, demo_snapshot},
        store::SocialStore,
    };
    use rand::{SeedableRng, rngs::StdRng};
    use time::macros::utc_datetime;
    use tomeo_common::{
        model::{Id, TomeoSnowflakeGenerator},
        snowflake::{ProcessId, WorkerId},
    };

    #[test]
    fn demo_data_shape() {
        let now = utc_datetime!(2025-06-01 12:00);
        let mut rng = StdRng::seed_from_u64(7);
        let store = SocialStore::from_snapshot(
            demo_snapshot(now, &mut rng).unwrap(),
            TomeoSnowflakeGenerator::new(WorkerId::new_unchecked(0), ProcessId::new_unchecked(0)),
        )
        .unwrap();

        assert_eq!(store.current_user().id, Id::new("user001").unwrap());
        assert_eq!(store.friends().len(), 2);
        assert!(!store.is_friend(&store.current_user().id));

        let posts = store.all_posts();
        assert_eq!(posts.len(), DEMO_POST_COUNT);
        assert_eq!(posts[0].id.as_str(), "post_0");
        assert_eq!(posts[0].created_at, now);
        assert_eq!(posts[9].id.as_str(), "post_9");
        for (i, post) in posts.iter().enumerate() {
            assert!((10..100).contains(&post.likes_count));
            assert!((50..500).contains(&post.views_count));
            assert_eq!(post.is_liked, i % 4 == 0);
            assert_eq!(post.is_moment, i % 5 == 0);
            assert_eq!(post.comments_count(), usize::from(i % 2 == 0));
        }

        assert_eq!(store.friends_posts().len(), 6);
    }
}
