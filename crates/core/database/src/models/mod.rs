mod history;

pub use history::*;

use crate::{Database, FileDb, ReferenceDb};

pub trait AbstractDatabase: Sync + Send + history::AbstractHistory {}

impl AbstractDatabase for ReferenceDb {}
impl AbstractDatabase for FileDb {}

impl std::ops::Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match &self {
            Database::Reference(dummy) => dummy,
            Database::File(file) => file,
        }
    }
}

impl Database {
    /// Throw away every stored record
    pub async fn drop_database(&self) {
        match &self {
            Database::Reference(dummy) => dummy.history.lock().await.clear(),
            Database::File(file) => {
                file.history.lock().await.clear();
                async_std::fs::remove_file(file.path.as_ref()).await.ok();
            }
        }
    }
}
