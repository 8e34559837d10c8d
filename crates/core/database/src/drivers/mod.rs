mod file;
mod reference;

use std::path::PathBuf;

use warden_config::config;

pub use self::file::*;
pub use self::reference::*;

/// Database information to use to create a client
pub enum DatabaseInfo {
    /// Auto-detect the database in use
    Auto,
    /// Auto-detect the database in use and create an empty testing database
    Test(String),
    /// Use the in-memory database
    Reference,
    /// Use a JSON file, loaded on connect and rewritten on every flush
    File { path: PathBuf },
}

/// Database
#[derive(Clone)]
pub enum Database {
    /// In-memory database
    Reference(ReferenceDb),
    /// JSON file database
    File(FileDb),
}

impl DatabaseInfo {
    /// Create a database client from the given database information
    #[async_recursion]
    pub async fn connect(self) -> Result<Database, String> {
        match self {
            DatabaseInfo::Auto => {
                let config = config().await;

                if std::env::var("TEST_DB").is_ok() {
                    DatabaseInfo::Test(format!("warden_test_{}", std::process::id()))
                        .connect()
                        .await
                } else if !config.database.history_path.is_empty() {
                    DatabaseInfo::File {
                        path: config.database.history_path.into(),
                    }
                    .connect()
                    .await
                } else {
                    DatabaseInfo::Reference.connect().await
                }
            }
            DatabaseInfo::Test(database_name) => {
                match std::env::var("TEST_DB")
                    .unwrap_or_else(|_| "REFERENCE".to_string())
                    .as_str()
                {
                    "REFERENCE" => DatabaseInfo::Reference.connect().await,
                    "FILE" => {
                        DatabaseInfo::File {
                            path: std::env::temp_dir()
                                .join(format!("{}.json", database_name.replace(':', "_"))),
                        }
                        .connect()
                        .await
                    }
                    _ => unreachable!("must specify REFERENCE or FILE"),
                }
            }
            DatabaseInfo::Reference => Ok(Database::Reference(Default::default())),
            DatabaseInfo::File { path } => FileDb::open(path)
                .await
                .map(Database::File)
                .map_err(|err| format!("Failed to load history file: {err}")),
        }
    }
}
