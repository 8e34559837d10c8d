use crate::ChatMessage;

/// Moderation policy given to the remote classifier
const POLICY: &str = "You are a content moderator for a group chat server. \
Decide whether the message you are given violates the server rules.\n\
\n\
Categories: spam, violent, harassment, nsfw, hate_speech, other.\n\
Spam is further split into: advertising (unwanted promotion unrelated to the server), \
invites (invites to other servers), links (suspicious, abusive or NSFW links), \
other (anything else, such as harassment spread over many messages).\n\
\n\
Judge the severity as minor or serious. A violation is serious when it shows clear intent \
to harm, deceive or exploit, when it targets a specific person or group, or when it can \
cause real damage such as stolen accounts or malware. Otherwise it is minor.\n\
\n\
Answer with exactly one token and nothing else:\n\
- `<category>_<severity>` for a violation, e.g. `harassment_minor`\n\
- `spam_<spam type>_<severity>` for spam, e.g. `spam_links_serious`\n\
- `not_flagged` when the message is fine.";

/// Worked examples shown to the classifier before the real message
const EXAMPLES: [(&str, &str); 6] = [
    (
        "Check out my store for the best deals on sneakers!!! www.cheap-kicks.example",
        "spam_advertising_minor",
    ),
    (
        "Join my server, way better than this one: discord.gg/abcdef",
        "spam_invites_minor",
    ),
    (
        "Free nitro here, just log in with your account: http://disc0rd-gift.example/login",
        "spam_links_serious",
    ),
    (
        "Nobody here likes you, you should just leave and never come back",
        "harassment_serious",
    ),
    ("lol that game last night was so bad", "not_flagged"),
    (
        "I know where you live and I'm going to hurt you",
        "violent_serious",
    ),
];

/// Build the full conversation sent for a single message
pub fn policy_messages(text: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(EXAMPLES.len() * 2 + 2);
    messages.push(ChatMessage::new("system", POLICY));

    for (example, verdict) in EXAMPLES {
        messages.push(ChatMessage::new("user", example));
        messages.push(ChatMessage::new("assistant", verdict));
    }

    messages.push(ChatMessage::new("user", text));
    messages
}
