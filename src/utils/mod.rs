pub mod text;
pub mod time;

pub use text::split_command_line;
pub use time::{current_human_timestamp, format_session_expiry};
