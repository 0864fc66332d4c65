pub mod comment;
pub mod post;
pub mod reminder;
pub mod user;

use crate::{
    model::{comment::InvalidCommentTextError, user::InvalidUserHandleError},
    snowflake::{Epoch, Snowflake, SnowflakeGenerator},
};
use derive_where::derive_where;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error as _, Unexpected},
};
use std::{
    fmt::{Display, Formatter},
    marker::PhantomData,
    str::FromStr,
};
use thiserror::Error;
use time::{UtcDateTime, macros::utc_datetime};

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    Id(#[from] EmptyIdError),
    #[error(transparent)]
    UserHandle(#[from] InvalidUserHandleError),
    #[error(transparent)]
    CommentText(#[from] InvalidCommentTextError),
    #[error("Post declares {declared} comments but carries {actual}")]
    CommentCountMismatch { declared: usize, actual: usize },
    #[error("Comment id {0} appears twice in one post")]
    DuplicateCommentId(String),
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct TomeoEpoch;
impl Epoch for TomeoEpoch {
    const EPOCH_TIME: UtcDateTime = utc_datetime!(2025-01-01 00:00);
}

pub type TomeoSnowflake = Snowflake<TomeoEpoch>;
pub type TomeoSnowflakeGenerator = SnowflakeGenerator<TomeoEpoch>;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Ids must not be empty")]
pub struct EmptyIdError;

/// String id tagged with the kind of entity it names.
///
/// Ids minted by the store are snowflakes rendered in decimal, but any
/// non-empty string is accepted so fixtures and imported data can use
/// readable ids like `post_0`.
#[derive_where(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Id<Marker>(String, PhantomData<Marker>);

impl<Marker> Id<Marker> {
    pub fn new(id: impl Into<String>) -> Result<Self, EmptyIdError> {
        let id = id.into();
        if id.is_empty() {
            Err(EmptyIdError)
        } else {
            Ok(Self(id, PhantomData))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<TomeoSnowflake> for Id<Marker> {
    fn from(value: TomeoSnowflake) -> Self {
        Self(value.to_string(), PhantomData)
    }
}

impl<Marker> FromStr for Id<Marker> {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<Marker> TryFrom<&str> for Id<Marker> {
    type Error = EmptyIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<Marker> Serialize for Id<Marker> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, Marker> Deserialize<'de> for Id<Marker> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Self::new(inner).map_err(|_| D::Error::invalid_value(Unexpected::Str(""), &"non-empty id"))
    }
}

impl TomeoSnowflakeGenerator {
    pub fn generate_id<Marker>(&mut self) -> Id<Marker> {
        self.generate().into()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{EmptyIdError, Id, TomeoSnowflakeGenerator, post::PostMarker},
        snowflake::{ProcessId, WorkerId},
    };

    #[test]
    fn empty_ids_are_rejected() {
        assert_eq!(Id::<PostMarker>::new(""), Err(EmptyIdError));
        assert!(serde_json::from_str::<Id<PostMarker>>("\"\"").is_err());

        let id: Id<PostMarker> = serde_json::from_str("\"post_0\"").unwrap();
        assert_eq!(id.as_str(), "post_0");
    }

    #[test]
    fn generated_ids_are_distinct() {
        let mut generator =
            TomeoSnowflakeGenerator::new(WorkerId::new_unchecked(1), ProcessId::new_unchecked(2));

        let first: Id<PostMarker> = generator.generate_id();
        let second: Id<PostMarker> = generator.generate_id();

        assert_ne!(first, second);
        assert!(first.as_str().chars().all(|c| c.is_ascii_digit()));
    }
}
