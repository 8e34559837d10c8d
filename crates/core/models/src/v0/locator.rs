use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Three `/`-delimited numeric ids, as found in a copied message link
static RE_LOCATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d+)/(\d+)/(\d+)").expect("locator regex is valid"));

auto_derived_copy!(
    /// Reference to a message on the platform
    pub struct MessageLocator {
        /// Id of the server the message was sent in
        pub server_id: u64,
        /// Id of the channel the message was sent in
        pub channel_id: u64,
        /// Id of the message
        pub message_id: u64,
    }
);

impl MessageLocator {
    /// Find the first locator embedded anywhere in the given text
    ///
    /// Only the first triple is considered: if one of its ids does not fit
    /// in a `u64` the text has no locator, even when a later triple would.
    pub fn find(text: &str) -> Option<MessageLocator> {
        let captures = RE_LOCATOR.captures(text)?;

        Some(MessageLocator {
            server_id: captures.get(1)?.as_str().parse().ok()?,
            channel_id: captures.get(2)?.as_str().parse().ok()?,
            message_id: captures.get(3)?.as_str().parse().ok()?,
        })
    }
}

impl fmt::Display for MessageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.server_id, self.channel_id, self.message_id
        )
    }
}
