#[macro_use]
extern crate log;

use cached::proc_macro::cached;
use config::{Config, Environment, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../Warden.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("Warden.toml").exists() {
            builder = builder.add_source(File::new("Warden.toml", FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("WARDEN")
                .prefix_separator("_")
                .separator("__"),
        );

        builder
            .build()
            .expect("embedded Warden.toml must always parse")
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Database {
    pub history_path: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Classifier {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PriorityWeights {
    pub auto: f64,
    pub confirmed: f64,
    pub reported: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Moderation {
    pub second_opinion_bonus: f64,
    pub short_suspension_hours: u64,
    pub long_suspension_hours: u64,
    pub screen_public_messages: bool,
    pub weights: PriorityWeights,
}

/// Operator-editable notices sent when a case concludes
#[derive(Deserialize, Debug, Clone)]
pub struct Responses {
    pub no_violation: String,
    pub short_suspension: String,
    pub long_suspension: String,
    pub permanent_suspension: String,
    pub report_complete: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub database: Database,
    pub classifier: Classifier,
    pub moderation: Moderation,
    pub responses: Responses,
}

impl Classifier {
    /// Whether the remote classifier can be used at all
    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty() && !self.endpoint.is_empty()
    }
}

/// Configure logging and common Rust variables
pub fn setup_logging() {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::init();
}

pub async fn init() {
    info!(
        ":: Warden Configuration ::\n\x1b[32m{:?}\x1b[0m",
        config().await
    );
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read()
        .await
        .try_deserialize::<Settings>()
        .expect("configuration does not match the expected layout")
}
