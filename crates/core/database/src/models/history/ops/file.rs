use std::collections::HashMap;

use warden_result::Result;

use crate::FileDb;
use crate::HistoryRecord;

use super::AbstractHistory;

#[async_trait]
impl AbstractHistory for FileDb {
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

    /// Overwrite the file with the full mapping
    ///
    /// The lock is held for the whole write so flushes land in order.
    async fn flush_history(&self) -> Result<()> {
        let history = self.history.lock().await;
        let contents = serde_json::to_string_pretty(&*history)
            .map_err(|_| create_database_error!("serialise", "history"))?;

        async_std::fs::write(self.path.as_ref(), contents)
            .await
            .map_err(|err| {
                error!("Could not write history to {}: {err}", self.path.display());
                create_database_error!("flush", "history")
            })?;

        debug!("Flushed {} history records", history.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{AbstractHistory, DatabaseInfo, HistoryRecord};

    #[async_std::test]
    async fn history_survives_reopening() {
        let path = std::env::temp_dir().join(format!("warden-{}.json", ulid::Ulid::new()));

        let db = DatabaseInfo::File { path: path.clone() }
            .connect()
            .await
            .unwrap();

        db.increment_reported("offender").await.unwrap();
        db.increment_confirmed("offender").await.unwrap();
        db.flush_history().await.unwrap();

        let reopened = DatabaseInfo::File { path: path.clone() }
            .connect()
            .await
            .unwrap();

        assert_eq!(
            reopened.fetch_history("offender").await.unwrap(),
            HistoryRecord::new(1, 1)
        );

        let raw = async_std::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["offender"], serde_json::json!([1, 1]));

        reopened.drop_database().await;
    }

    #[async_std::test]
    async fn missing_file_starts_empty() {
        let path = std::env::temp_dir().join(format!("warden-{}.json", ulid::Ulid::new()));

        let db = DatabaseInfo::File { path }.connect().await.unwrap();
        assert!(db.fetch_all_history().await.unwrap().is_empty());
    }
}
