use chrono::{DateTime, Local, Utc};

pub fn current_human_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Session expiry in local time, as shown after a login.
pub fn format_session_expiry(expires_at: DateTime<Utc>) -> String {
    expires_at
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
