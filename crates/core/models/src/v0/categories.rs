use std::fmt;

auto_derived_copy!(
    /// Reason a message was reported
    #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
    pub enum Category {
        /// Unsolicited or repetitive content
        Spam,
        /// Violent content
        Violent,
        /// Bullying or harassment
        Harassment,
        /// Content not safe for work
        Nsfw,
        /// Hate speech
        HateSpeech,
        /// Anything else
        Other,
    }

    /// Finer classification of spam
    #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
    pub enum SpamSubtype {
        /// Unwanted advertisement unrelated to the server
        Advertising,
        /// Unwanted invites to other servers
        Invites,
        /// Suspicious, abusive or NSFW links
        #[cfg_attr(feature = "serde", serde(alias = "malicious_links"))]
        Links,
        /// Personal promotion
        Personal,
        /// Trolling
        Troll,
        /// Spam sent by hand rather than by an automated account
        Human,
        /// Anything else, such as harassment spread over several messages
        Other,
    }

    /// How serious a violation is
    #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
    pub enum Severity {
        Minor,
        Serious,
    }
);

impl Category {
    /// Every category, in menu order
    pub const ALL: [Category; 6] = [
        Category::Spam,
        Category::Violent,
        Category::Harassment,
        Category::Nsfw,
        Category::HateSpeech,
        Category::Other,
    ];

    /// Token used inside evaluation strings
    pub fn token(&self) -> &'static str {
        match self {
            Category::Spam => "spam",
            Category::Violent => "violent",
            Category::Harassment => "harassment",
            Category::Nsfw => "nsfw",
            Category::HateSpeech => "hate_speech",
            Category::Other => "other",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Spam => "Spam",
            Category::Violent => "Violent Content",
            Category::Harassment => "Bullying or Harassment",
            Category::Nsfw => "NSFW Content",
            Category::HateSpeech => "Hate Speech",
            Category::Other => "Other",
        }
    }

    /// What the user is expected to type to pick this category
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::HateSpeech => "hate speech",
            other => other.token(),
        }
    }

    /// Match user input against the category keywords
    pub fn from_input(input: &str) -> Option<Category> {
        match crate::normalise_input(input).as_str() {
            "spam" => Some(Category::Spam),
            "violent" => Some(Category::Violent),
            "harassment" => Some(Category::Harassment),
            "nsfw" => Some(Category::Nsfw),
            "hate speech" | "hate_speech" => Some(Category::HateSpeech),
            "other" => Some(Category::Other),
            _ => None,
        }
    }
}

impl SpamSubtype {
    /// Subtypes a reporter may pick from
    pub const REPORTABLE: [SpamSubtype; 4] = [
        SpamSubtype::Advertising,
        SpamSubtype::Invites,
        SpamSubtype::Links,
        SpamSubtype::Other,
    ];

    /// Subtypes a moderator may pick from
    pub const MODERATION: [SpamSubtype; 7] = [
        SpamSubtype::Advertising,
        SpamSubtype::Personal,
        SpamSubtype::Invites,
        SpamSubtype::Links,
        SpamSubtype::Troll,
        SpamSubtype::Human,
        SpamSubtype::Other,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            SpamSubtype::Advertising => "advertising",
            SpamSubtype::Invites => "invites",
            SpamSubtype::Links => "links",
            SpamSubtype::Personal => "personal",
            SpamSubtype::Troll => "troll",
            SpamSubtype::Human => "human",
            SpamSubtype::Other => "other",
        }
    }

    /// Match user input against the subtype keywords
    pub fn from_input(input: &str) -> Option<SpamSubtype> {
        match crate::normalise_input(input).as_str() {
            "advertising" => Some(SpamSubtype::Advertising),
            "invites" => Some(SpamSubtype::Invites),
            "links" | "malicious_links" => Some(SpamSubtype::Links),
            "personal" => Some(SpamSubtype::Personal),
            "troll" => Some(SpamSubtype::Troll),
            "human" => Some(SpamSubtype::Human),
            "other" => Some(SpamSubtype::Other),
            _ => None,
        }
    }
}

impl Severity {
    pub fn token(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Serious => "serious",
        }
    }

    pub fn from_input(input: &str) -> Option<Severity> {
        match crate::normalise_input(input).as_str() {
            "minor" => Some(Severity::Minor),
            "serious" => Some(Severity::Serious),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for SpamSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
