use warden_moderation::ChannelContext;

/// One line typed into the console
#[derive(Debug, PartialEq)]
pub struct Turn<'a> {
    pub sender: &'a str,
    pub context: ChannelContext,
    pub text: &'a str,
}

/// Read a `sender context text` line
pub fn parse_line(line: &str) -> Option<Turn<'_>> {
    let mut parts = line.trim().splitn(3, char::is_whitespace);

    let sender = parts.next().filter(|sender| !sender.is_empty())?;
    let context = match parts.next()? {
        "dm" => ChannelContext::Direct,
        "public" => ChannelContext::Public,
        "mod" => ChannelContext::Moderation,
        _ => return None,
    };

    Some(Turn {
        sender,
        context,
        text: parts.next().unwrap_or("").trim(),
    })
}
