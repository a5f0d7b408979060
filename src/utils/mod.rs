pub mod text;
pub mod time;

pub use text::{key_preview, normalize_ticker, truncate_chars};
pub use time::{current_human_timestamp, iso_date, today};
