//! Saving and restoring the whole store as one JSON document.

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, ffi::OsString, fs, io, path::Path};
use thiserror::Error;
use tomeo_common::model::{
    Id,
    post::{Post, PostMarker},
    reminder::ReminderSettings,
    user::{User, UserMarker},
};
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Snapshot file could not be accessed: {0}")]
    Io(#[from] io::Error),
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Snapshot lists the current user as a friend")]
    FriendIsCurrentUser,
    #[error("Snapshot contains post {0} more than once")]
    DuplicatePost(Id<PostMarker>),
    #[error("Snapshot contains friend {0} more than once")]
    DuplicateFriend(Id<UserMarker>),
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct Snapshot {
    pub current_user: User,
    pub posts: Vec<Post>,
    #[serde(default)]
    pub friends: Vec<User>,
    #[serde(default)]
    pub reminder_settings: ReminderSettings,
}

impl Snapshot {
    /// Checks the cross-record rules that single records cannot check
    /// themselves.
    pub fn validate(&self) -> Result<(), PersistError> {
        if self
            .friends
            .iter()
            .any(|friend| friend.id == self.current_user.id)
        {
            return Err(PersistError::FriendIsCurrentUser);
        }

        let mut post_ids = HashSet::new();
        if let Some(post) = self.posts.iter().find(|post| !post_ids.insert(&post.id)) {
            return Err(PersistError::DuplicatePost(post.id.clone()));
        }

        let mut friend_ids = HashSet::new();
        if let Some(friend) = self
            .friends
            .iter()
            .find(|friend| !friend_ids.insert(&friend.id))
        {
            return Err(PersistError::DuplicateFriend(friend.id.clone()));
        }

        Ok(())
    }
}

/// Writes next to `path` first and renames over it, so a crash mid-write
/// leaves the previous snapshot intact.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PersistError> {
    let json = serde_json::to_vec_pretty(snapshot)?;

    let mut temp_path = OsString::from(path.as_os_str());
    temp_path.push(".tmp");
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;

    info!(path = %path.display(), posts = snapshot.posts.len(), "Saved snapshot");
    Ok(())
}

/// Returns `Ok(None)` if there is no snapshot at `path` yet.
pub fn load_snapshot(path: &Path) -> Result<Option<Snapshot>, PersistError> {
    let json = match fs::read(path) {
        Ok(json) => json,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No snapshot found");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let snapshot: Snapshot = serde_json::from_slice(&json)?;
    snapshot.validate()?;

    info!(path = %path.display(), posts = snapshot.posts.len(), "Loaded snapshot");
    Ok(Some(snapshot))
}
