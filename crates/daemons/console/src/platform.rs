use warden_models::v0::{MessageLocator, PlatformMessage};
use warden_moderation::{AbstractPlatform, ReferencePlatform};
use warden_result::Result;

/// In-memory platform that echoes side effects to stdout
#[derive(Clone, Default)]
pub struct ConsolePlatform {
    inner: ReferencePlatform,
}

impl ConsolePlatform {
    /// Seed the platform with messages from a JSON fixture
    pub async fn from_fixture(path: &str) -> Result<ConsolePlatform> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|error| {
            error!("Failed to read fixture {path}: {error}");
            create_error!(NotFound)
        })?;

        let messages: Vec<PlatformMessage> = serde_json::from_str(&raw).map_err(|error| {
            create_error!(FailedValidation {
                error: error.to_string()
            })
        })?;

        let platform = ConsolePlatform::default();
        for message in messages {
            platform.inner.insert_message(message).await;
        }

        Ok(platform)
    }
}

#[async_trait]
impl AbstractPlatform for ConsolePlatform {
    async fn fetch_message(&self, locator: &MessageLocator) -> Result<PlatformMessage> {
        self.inner.fetch_message(locator).await
    }

    async fn delete_message(&self, locator: &MessageLocator) -> Result<()> {
        self.inner.delete_message(locator).await?;
        println!("   [deleted {locator}]");
        Ok(())
    }

    async fn send_direct(&self, user_id: &str, content: &str) -> Result<()> {
        self.inner.send_direct(user_id, content).await?;
        println!("   [dm {user_id}] {content}");
        Ok(())
    }

    async fn notify_moderators(&self, content: &str) -> Result<()> {
        self.inner.notify_moderators(content).await?;
        println!("   [mod] {content}");
        Ok(())
    }
}
