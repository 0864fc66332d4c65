use crate::model::Id;
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::hash::{Hash, Hasher};
use thiserror::Error;

pub const USER_HANDLE_MAX_LEN: usize = 50;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct UserMarker;

/// A user as shown on cards and profiles.
///
/// Two users are the same user when their ids match; the remaining fields are
/// display data that may be stale in copies embedded in posts and comments.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub handle: UserHandle,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub is_friend: bool,
}

impl User {
    #[must_use]
    pub fn new(id: Id<UserMarker>, handle: UserHandle, display_name: impl Into<String>) -> Self {
        Self {
            id,
            handle,
            display_name: display_name.into(),
            bio: String::new(),
            followers_count: 0,
            following_count: 0,
            is_friend: false,
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct UserHandle(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The user handle is invalid: {0}")]
pub struct InvalidUserHandleError(String);

impl UserHandle {
    pub fn new(handle: String) -> Result<Self, InvalidUserHandleError> {
        let len = handle.chars().count();
        if len > 0 && len <= USER_HANDLE_MAX_LEN {
            Ok(UserHandle(handle))
        } else {
            Err(InvalidUserHandleError(handle))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for UserHandle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        UserHandle::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"UserHandle"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Id,
        user::{USER_HANDLE_MAX_LEN, User, UserHandle},
    };

    fn user(id: &str, handle: &str) -> User {
        User::new(
            Id::new(id).unwrap(),
            UserHandle::new(handle.to_owned()).unwrap(),
            handle,
        )
    }

    #[test]
    fn users_compare_by_id() {
        let mut renamed = user("user002", "@HandName");
        renamed.display_name = "Someone Else".to_owned();
        renamed.followers_count = 9000;

        assert_eq!(renamed, user("user002", "@HandName"));
        assert_ne!(user("user002", "@a"), user("user003", "@a"));
    }

    #[test]
    fn handle_length() {
        assert!(UserHandle::new(String::new()).is_err());
        assert!(UserHandle::new("a".repeat(USER_HANDLE_MAX_LEN)).is_ok());
        assert!(UserHandle::new("a".repeat(USER_HANDLE_MAX_LEN + 1)).is_err());
        assert!(serde_json::from_str::<UserHandle>("\"\"").is_err());
    }
}
