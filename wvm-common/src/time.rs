//! Timestamp utilities

use chrono::{DateTime, Local, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Compact local timestamp used in stored upload filenames (`YYYYmmddHHMMSS`)
pub fn upload_stamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}
