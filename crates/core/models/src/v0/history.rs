auto_derived_copy!(
    /// Per-offender counters
    ///
    /// Persisted as a `(times_reported, times_confirmed)` tuple.
    #[cfg_attr(feature = "serde", serde(from = "(u64, u64)", into = "(u64, u64)"))]
    #[derive(Default)]
    pub struct HistoryRecord {
        /// Number of reports against this offender that reached moderation
        pub times_reported: u64,
        /// Number of moderation cases that confirmed a violation
        pub times_confirmed: u64,
    }
);

impl HistoryRecord {
    pub fn new(times_reported: u64, times_confirmed: u64) -> HistoryRecord {
        HistoryRecord {
            times_reported,
            times_confirmed,
        }
    }
}

impl From<(u64, u64)> for HistoryRecord {
    fn from((times_reported, times_confirmed): (u64, u64)) -> Self {
        HistoryRecord {
            times_reported,
            times_confirmed,
        }
    }
}

impl From<HistoryRecord> for (u64, u64) {
    fn from(record: HistoryRecord) -> Self {
        (record.times_reported, record.times_confirmed)
    }
}
