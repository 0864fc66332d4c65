use crate::server::{Result, ServerRouter, SharedStore, json::Json};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use tomeo_common::model::user::User;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_current_user)
        .typed_put(set_current_user)
}

#[derive(TypedPath)]
#[typed_path("/me")]
struct CurrentUserPath;

async fn get_current_user(
    _: CurrentUserPath,
    State(store): State<SharedStore>,
) -> Result<Json<User>> {
    let user = store.lock().await.current_user().clone();

    Ok(Json(user))
}

async fn set_current_user(
    _: CurrentUserPath,
    State(store): State<SharedStore>,
    Json(user): Json<User>,
) -> Result<Json<User>> {
    let mut store = store.lock().await;
    store.set_current_user(user);

    Ok(Json(store.current_user().clone()))
}

#[cfg(test)]
mod tests {
    use crate::server::tests::{demo_state, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn switching_to_a_friend_unfriends_them() {
        let state = demo_state();

        let (status, me) = send(&state, Method::GET, "/me", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], "user001");

        let (status, me) = send(
            &state,
            Method::PUT,
            "/me",
            Some(json!({
                "id": "user002",
                "handle": "@HandName",
                "display_name": "HandName",
                "is_friend": true,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["is_friend"], false);

        let (_, friends) = send(&state, Method::GET, "/friends", None).await;
        let ids: Vec<&str> = friends
            .as_array()
            .unwrap()
            .iter()
            .map(|friend| friend["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["user003"]);
    }
}
