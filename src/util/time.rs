use std::time::{SystemTime, UNIX_EPOCH};

/// Get a timestamp in milliseconds since the UNIX epoch
pub fn timestamp_millis() -> u64 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
}
