use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::lock::Mutex;
use warden_models::v0::{MessageLocator, PlatformMessage};
use warden_result::Result;

/// Chat platform the moderation flows talk to
#[async_trait]
pub trait AbstractPlatform: Sync + Send {
    /// Resolve a message by its locator
    ///
    /// Fails with `UnknownServer`, `UnknownChannel` or `UnknownMessage`
    /// depending on which part of the locator could not be resolved.
    async fn fetch_message(&self, locator: &MessageLocator) -> Result<PlatformMessage>;

    /// Remove a message from its channel
    async fn delete_message(&self, locator: &MessageLocator) -> Result<()>;

    /// Send a direct message to a user
    async fn send_direct(&self, user_id: &str, content: &str) -> Result<()>;

    /// Post a notice to the moderation channel
    async fn notify_moderators(&self, content: &str) -> Result<()>;
}

/// In-memory platform
#[derive(Clone, Default)]
pub struct ReferencePlatform {
    channels: Arc<Mutex<HashSet<(u64, u64)>>>,
    messages: Arc<Mutex<HashMap<MessageLocator, PlatformMessage>>>,
    direct: Arc<Mutex<Vec<(String, String)>>>,
    notices: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<MessageLocator>>>,
}

impl ReferencePlatform {
    /// Make a server and channel known without putting a message in it
    pub async fn insert_channel(&self, server_id: u64, channel_id: u64) {
        self.channels.lock().await.insert((server_id, channel_id));
    }

    /// Store a message, registering its server and channel
    pub async fn insert_message(&self, message: PlatformMessage) {
        let locator = message.locator;
        self.insert_channel(locator.server_id, locator.channel_id)
            .await;
        self.messages.lock().await.insert(locator, message);
    }

    /// Direct messages sent to a user so far, oldest first
    pub async fn direct_messages(&self, user_id: &str) -> Vec<String> {
        self.direct
            .lock()
            .await
            .iter()
            .filter(|(recipient, _)| recipient == user_id)
            .map(|(_, content)| content.clone())
            .collect()
    }

    /// Notices posted to the moderation channel so far
    pub async fn moderator_notices(&self) -> Vec<String> {
        self.notices.lock().await.clone()
    }

    /// Messages removed so far
    pub async fn deleted_messages(&self) -> Vec<MessageLocator> {
        self.deleted.lock().await.clone()
    }
}

#[async_trait]
impl AbstractPlatform for ReferencePlatform {
    async fn fetch_message(&self, locator: &MessageLocator) -> Result<PlatformMessage> {
        let channels = self.channels.lock().await;
        if !channels
            .iter()
            .any(|(server_id, _)| *server_id == locator.server_id)
        {
            return Err(create_error!(UnknownServer));
        }

        if !channels.contains(&(locator.server_id, locator.channel_id)) {
            return Err(create_error!(UnknownChannel));
        }

        self.messages
            .lock()
            .await
            .get(locator)
            .cloned()
            .ok_or_else(|| create_error!(UnknownMessage))
    }

    async fn delete_message(&self, locator: &MessageLocator) -> Result<()> {
        if self.messages.lock().await.remove(locator).is_some() {
            self.deleted.lock().await.push(*locator);
            Ok(())
        } else {
            Err(create_error!(UnknownMessage))
        }
    }

    async fn send_direct(&self, user_id: &str, content: &str) -> Result<()> {
        self.direct
            .lock()
            .await
            .push((user_id.to_string(), content.to_string()));
        Ok(())
    }

    async fn notify_moderators(&self, content: &str) -> Result<()> {
        self.notices.lock().await.push(content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use warden_models::v0::{MessageLocator, PlatformMessage};
    use warden_result::ErrorType;

    use super::{AbstractPlatform, ReferencePlatform};

    fn locator(server_id: u64, channel_id: u64, message_id: u64) -> MessageLocator {
        MessageLocator {
            server_id,
            channel_id,
            message_id,
        }
    }

    #[tokio::test]
    async fn lookups_distinguish_missing_parts() {
        let platform = ReferencePlatform::default();
        platform
            .insert_message(PlatformMessage {
                locator: locator(1, 2, 3),
                author_id: "offender".to_string(),
                author_name: "Offender".to_string(),
                content: "hello".to_string(),
            })
            .await;

        let error_of = |result: warden_result::Result<PlatformMessage>| {
            result.expect_err("lookup should fail").error_type
        };

        assert_eq!(
            error_of(platform.fetch_message(&locator(9, 2, 3)).await),
            ErrorType::UnknownServer
        );
        assert_eq!(
            error_of(platform.fetch_message(&locator(1, 9, 3)).await),
            ErrorType::UnknownChannel
        );
        assert_eq!(
            error_of(platform.fetch_message(&locator(1, 2, 9)).await),
            ErrorType::UnknownMessage
        );
        assert_eq!(
            platform
                .fetch_message(&locator(1, 2, 3))
                .await
                .expect("message")
                .content,
            "hello"
        );
    }

    #[tokio::test]
    async fn deletion_is_recorded_once() {
        let platform = ReferencePlatform::default();
        platform
            .insert_message(PlatformMessage {
                locator: locator(1, 2, 3),
                author_id: "offender".to_string(),
                author_name: "Offender".to_string(),
                content: "hello".to_string(),
            })
            .await;

        platform
            .delete_message(&locator(1, 2, 3))
            .await
            .expect("first delete");
        assert!(platform.delete_message(&locator(1, 2, 3)).await.is_err());
        assert_eq!(platform.deleted_messages().await, vec![locator(1, 2, 3)]);
    }
}
