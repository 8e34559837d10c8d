use std::collections::HashMap;

use warden_result::Result;

use crate::HistoryRecord;
use crate::ReferenceDb;

use super::AbstractHistory;

#[async_trait]
impl AbstractHistory for ReferenceDb {
    /// Fetch the history of an offender, zeroed if they were never seen
    async fn fetch_history(&self, offender_id: &str) -> Result<HistoryRecord> {
        let history = self.history.lock().await;
        Ok(history.get(offender_id).copied().unwrap_or_default())
    }

    /// Fetch every stored history record
    async fn fetch_all_history(&self) -> Result<HashMap<String, HistoryRecord>> {
        Ok(self.history.lock().await.clone())
    }

    /// Count a report that reached moderation, returning the updated record
    async fn increment_reported(&self, offender_id: &str) -> Result<HistoryRecord> {
        let mut history = self.history.lock().await;
        let record = history.entry(offender_id.to_string()).or_default();
        record.times_reported += 1;
        Ok(*record)
    }

    /// Count a confirmed violation, returning the updated record
    async fn increment_confirmed(&self, offender_id: &str) -> Result<HistoryRecord> {
        let mut history = self.history.lock().await;
        let record = history.entry(offender_id.to_string()).or_default();
        record.times_confirmed += 1;
        Ok(*record)
    }

    /// Nothing to persist
    async fn flush_history(&self) -> Result<()> {
        Ok(())
    }
}
