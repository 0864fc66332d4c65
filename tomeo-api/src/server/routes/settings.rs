use crate::server::{Result, ServerRouter, SharedStore, json::Json};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use serde::Serialize;
use time::UtcDateTime;
use tomeo_common::model::reminder::ReminderSettings;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_reminder_settings)
        .typed_put(set_reminder_settings)
        .typed_get(get_next_reminder)
}

#[derive(TypedPath)]
#[typed_path("/settings/reminder")]
struct ReminderSettingsPath;

async fn get_reminder_settings(
    _: ReminderSettingsPath,
    State(store): State<SharedStore>,
) -> Result<Json<ReminderSettings>> {
    let settings = *store.lock().await.reminder_settings();

    Ok(Json(settings))
}

async fn set_reminder_settings(
    _: ReminderSettingsPath,
    State(store): State<SharedStore>,
    Json(settings): Json<ReminderSettings>,
) -> Result<Json<ReminderSettings>> {
    store.lock().await.set_reminder_settings(settings);

    Ok(Json(settings))
}

#[derive(TypedPath)]
#[typed_path("/settings/reminder/next")]
struct NextReminderPath;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
struct NextReminder {
    at: Option<UtcDateTime>,
}

/// When today's reminder fires, or `null` while reminders are off.
async fn get_next_reminder(
    _: NextReminderPath,
    State(store): State<SharedStore>,
) -> Result<Json<NextReminder>> {
    let settings = *store.lock().await.reminder_settings();
    let today = UtcDateTime::now().date();
    let at = settings.next_reminder(today, &mut rand::rng());

    Ok(Json(NextReminder { at }))
}
