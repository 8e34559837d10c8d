#[macro_use]
extern crate async_trait;

#[macro_use]
extern crate log;

use std::sync::Arc;
use std::time::Duration;

use warden_config::config;
use warden_models::v0::Evaluation;

mod keywords;
mod policy;
mod remote;
mod retry;
mod verdict;

pub use keywords::*;
pub use policy::*;
pub use remote::*;
pub use retry::*;
pub use verdict::*;

#[async_trait]
pub trait AbstractClassifier: Sync + Send {
    /// Judge a piece of text
    ///
    /// Never fails: a classifier that cannot reach its backend must degrade
    /// to some local verdict instead.
    async fn classify(&self, text: &str) -> Evaluation;
}

/// Remote classifier with bounded retries and a local fallback
#[derive(Clone)]
pub struct Classifier {
    backend: Option<Arc<dyn CompletionBackend>>,
    fallback: Arc<dyn AbstractClassifier>,
    retry: RetryPolicy,
}

impl Classifier {
    pub fn new(
        backend: Option<Arc<dyn CompletionBackend>>,
        fallback: Arc<dyn AbstractClassifier>,
        retry: RetryPolicy,
    ) -> Classifier {
        Classifier {
            backend,
            fallback,
            retry,
        }
    }

    /// Only ever use the keyword classifier
    pub fn fallback_only() -> Classifier {
        Classifier::new(None, Arc::new(KeywordClassifier), RetryPolicy::default())
    }

    /// Build the classifier described by the configuration
    pub async fn from_config() -> Classifier {
        let config = config().await.classifier;

        let retry = RetryPolicy {
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
        };

        let backend: Option<Arc<dyn CompletionBackend>> = if config.is_enabled() {
            info!("Using remote classifier {} at {}", config.model, config.endpoint);
            Some(Arc::new(ChatCompletions::new(
                &config.endpoint,
                &config.model,
                &config.api_key,
                Duration::from_secs(config.timeout_secs),
            )))
        } else {
            warn!("No classifier API key configured, only keyword matching will be used");
            None
        };

        Classifier::new(backend, Arc::new(KeywordClassifier), retry)
    }
}

#[async_trait]
impl AbstractClassifier for Classifier {
    async fn classify(&self, text: &str) -> Evaluation {
        if let Some(backend) = &self.backend {
            let messages = policy_messages(text);

            match with_retry(&self.retry, || backend.complete(&messages)).await {
                Ok(response) => {
                    let evaluation = parse_verdict(&response);
                    debug!("Remote classifier returned {response:?}, read as {evaluation}");
                    return evaluation;
                }
                Err(err) => {
                    warn!("Remote classifier unavailable ({err}), falling back to keywords");
                }
            }
        }

        self.fallback.classify(text).await
    }
}
