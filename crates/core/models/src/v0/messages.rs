use super::MessageLocator;

auto_derived!(
    /// Message as fetched from the platform
    pub struct PlatformMessage {
        /// Where the message lives
        pub locator: MessageLocator,
        /// Id of the author
        pub author_id: String,
        /// Display name of the author
        pub author_name: String,
        /// Text content
        pub content: String,
    }
);
