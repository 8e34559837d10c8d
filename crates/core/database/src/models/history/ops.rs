use std::collections::HashMap;

use warden_result::Result;

use crate::HistoryRecord;

mod file;
mod reference;

#[async_trait]
pub trait AbstractHistory: Sync + Send {
    /// Fetch the history of an offender, zeroed if they were never seen
    async fn fetch_history(&self, offender_id: &str) -> Result<HistoryRecord>;

    /// Fetch every stored history record
    async fn fetch_all_history(&self) -> Result<HashMap<String, HistoryRecord>>;

    /// Count a report that reached moderation, returning the updated record
    async fn increment_reported(&self, offender_id: &str) -> Result<HistoryRecord>;

    /// Count a confirmed violation, returning the updated record
    async fn increment_confirmed(&self, offender_id: &str) -> Result<HistoryRecord>;

    /// Persist the full mapping
    async fn flush_history(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::{AbstractHistory, HistoryRecord};

    #[async_std::test]
    async fn unseen_offender_is_zeroed() {
        database_test!(|db| async move {
            assert_eq!(
                db.fetch_history("nobody").await.unwrap(),
                HistoryRecord::new(0, 0)
            );
        });
    }

    #[async_std::test]
    async fn counters_track_increments() {
        database_test!(|db| async move {
            for _ in 0..3 {
                db.increment_reported("offender").await.unwrap();
            }

            let mut last = HistoryRecord::default();
            for _ in 0..2 {
                last = db.increment_confirmed("offender").await.unwrap();
            }

            assert_eq!(last, HistoryRecord::new(3, 2));
            assert_eq!(
                db.fetch_history("offender").await.unwrap(),
                HistoryRecord::new(3, 2)
            );
            assert_eq!(
                db.fetch_history("someone else").await.unwrap(),
                HistoryRecord::new(0, 0)
            );

            db.flush_history().await.unwrap();
            assert_eq!(db.fetch_all_history().await.unwrap().len(), 1);
        });
    }

    #[async_std::test]
    async fn concurrent_increments_are_not_lost() {
        database_test!(|db| async move {
            let tasks: Vec<_> = (0..20)
                .map(|_| {
                    let db = db.clone();
                    async_std::task::spawn(async move {
                        db.increment_confirmed("busy").await.unwrap();
                    })
                })
                .collect();

            futures::future::join_all(tasks).await;

            assert_eq!(
                db.fetch_history("busy").await.unwrap().times_confirmed,
                20
            );
        });
    }
}
