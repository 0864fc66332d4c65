use crate::util::PositiveDuration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Time, UtcDateTime, macros::time};

/// Daily "time to record" reminder preferences.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub time: Time,
    /// Fire somewhere within `±window` of `time` instead of exactly at it.
    pub randomize: bool,
    pub window: PositiveDuration,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            time: time!(12:00),
            randomize: true,
            window: PositiveDuration::new_unchecked(Duration::minutes(120)),
            sound_enabled: true,
            vibration_enabled: true,
        }
    }
}

impl ReminderSettings {
    /// When the reminder fires on `date`, or `None` while reminders are off.
    ///
    /// A randomized time never leaves `date`.
    pub fn next_reminder(&self, date: Date, rng: &mut impl Rng) -> Option<UtcDateTime> {
        if !self.enabled {
            return None;
        }

        let scheduled = UtcDateTime::new(date, self.time);
        if !self.randomize {
            return Some(scheduled);
        }

        let window = self.window.get().whole_seconds();
        let offset = Duration::seconds(rng.random_range(-window..=window));
        let start_of_day = UtcDateTime::new(date, Time::MIDNIGHT);
        let end_of_day = UtcDateTime::new(date, time!(23:59:59));

        let fired = match scheduled.checked_add(offset) {
            Some(fired) => fired.clamp(start_of_day, end_of_day),
            None if offset.is_negative() => start_of_day,
            None => end_of_day,
        };
        Some(fired)
    }
}
