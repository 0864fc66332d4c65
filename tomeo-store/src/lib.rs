pub mod error;
pub mod event;
pub mod media;
pub mod persist;
pub mod seed;
pub mod store;

pub use error::{Result, StoreError};
pub use event::StoreEvent;
pub use store::SocialStore;
