use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};

use futures::lock::Mutex;
use warden_result::Result;

use crate::HistoryRecord;

database_derived!(
    /// JSON file implementation
    ///
    /// The whole mapping is loaded on open and rewritten on every flush.
    pub struct FileDb {
        pub path: Arc<PathBuf>,
        pub history: Arc<Mutex<HashMap<String, HistoryRecord>>>,
    }
);

impl FileDb {
    /// Load history from the given path, starting empty if it does not exist yet
    pub async fn open(path: PathBuf) -> Result<FileDb> {
        let history: HashMap<String, HistoryRecord> =
            match async_std::fs::read_to_string(&path).await {
                Ok(contents) if contents.trim().is_empty() => HashMap::new(),
                Ok(contents) => serde_json::from_str(&contents)
                    .map_err(|_| create_database_error!("load", "history"))?,
                Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
                Err(err) => {
                    error!("Could not read history from {}: {err}", path.display());
                    return Err(create_database_error!("load", "history"));
                }
            };

        info!(
            "Loaded history for {} offenders from {}",
            history.len(),
            path.display()
        );

        Ok(FileDb {
            path: Arc::new(path),
            history: Arc::new(Mutex::new(history)),
        })
    }
}
