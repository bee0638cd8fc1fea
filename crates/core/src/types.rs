/// All entity primary keys are 64-bit integers assigned by the backing store.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
