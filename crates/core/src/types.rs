/// Queue-local job identifier, `"<unix-millis>-<seq>"`.
pub type JobId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
