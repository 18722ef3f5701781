use chrono::{DateTime, Utc};
use std::cell::Cell;

/// Issues millisecond-timestamp identifiers that never repeat within a
/// process, even when two are requested in the same millisecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Cell<i64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        self.next_id_at(Utc::now())
    }

    pub fn next_id_at(&self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis().max(self.last.get() + 1);
        self.last.set(millis);
        millis.to_string()
    }
}
