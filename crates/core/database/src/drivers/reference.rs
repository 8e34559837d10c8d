use std::{collections::HashMap, sync::Arc};

use futures::lock::Mutex;

use crate::HistoryRecord;

database_derived!(
    /// Reference implementation
    #[derive(Default)]
    pub struct ReferenceDb {
        pub history: Arc<Mutex<HashMap<String, HistoryRecord>>>,
    }
);
