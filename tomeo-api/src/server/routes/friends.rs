use crate::server::{Result, ServerError, ServerRouter, SharedStore, json::Json};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Deserialize;
use tomeo_common::model::{
    Id,
    user::{User, UserMarker},
};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_friends)
        .typed_post(add_friend)
        .typed_delete(remove_friend)
}

#[derive(TypedPath)]
#[typed_path("/friends")]
struct FriendsPath;

async fn get_friends(
    _: FriendsPath,
    State(store): State<SharedStore>,
) -> Result<Json<Vec<User>>> {
    let friends = store.lock().await.friends().to_vec();

    Ok(Json(friends))
}

/// Answers `201 Created` for a new friend and `200 OK` if they already were
/// one, with the stored friend in both cases.
async fn add_friend(
    _: FriendsPath,
    State(store): State<SharedStore>,
    Json(user): Json<User>,
) -> Result<Response> {
    let mut store = store.lock().await;
    let added = store.add_friend(user.clone())?;
    let friend = store
        .friends()
        .iter()
        .find(|friend| friend.id == user.id)
        .cloned()
        .unwrap_or(user);

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(friend)).into_response())
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/friends/{id}", rejection(ServerError))]
struct FriendPath {
    id: Id<UserMarker>,
}

async fn remove_friend(
    FriendPath { id }: FriendPath,
    State(store): State<SharedStore>,
) -> Result<Json<User>> {
    let user = store.lock().await.remove_friend(&id)?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use crate::server::tests::{demo_state, send};
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    fn new_friend() -> Value {
        json!({
            "id": "user004",
            "handle": "@newfriend",
            "display_name": "New Friend",
        })
    }

    #[tokio::test]
    async fn add_is_idempotent() {
        let state = demo_state();

        let (status, friend) = send(&state, Method::POST, "/friends", Some(new_friend())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(friend["is_friend"], true);

        let (status, _) = send(&state, Method::POST, "/friends", Some(new_friend())).await;
        assert_eq!(status, StatusCode::OK);

        let (_, friends) = send(&state, Method::GET, "/friends", None).await;
        assert_eq!(friends.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn current_user_cannot_be_a_friend() {
        let state = demo_state();

        let (status, body) = send(
            &state,
            Method::POST,
            "/friends",
            Some(json!({
                "id": "user001",
                "handle": "@YourName",
                "display_name": "Your Name",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "status": 409 }));
    }

    #[tokio::test]
    async fn removed_friends_leave_the_friends_feed() {
        let state = demo_state();

        let (status, removed) = send(&state, Method::DELETE, "/friends/user003", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(removed["is_friend"], false);

        let (_, posts) = send(&state, Method::GET, "/posts?feed=friends", None).await;
        let posts = posts.as_array().unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|post| post["author"]["id"] == "user002"));

        let (status, _) = send(&state, Method::DELETE, "/friends/user003", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
