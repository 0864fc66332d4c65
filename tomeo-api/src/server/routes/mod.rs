use crate::server::ServerRouter;
use axum::Router;

mod comments;
mod friends;
mod posts;
mod settings;
mod users;

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(posts::routes())
        .merge(comments::routes())
        .merge(friends::routes())
        .merge(settings::routes())
        .merge(users::routes())
}
