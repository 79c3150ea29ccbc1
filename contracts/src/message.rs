use serde::{Deserialize, Serialize};

pub const RED: u32 = 0xDD3311;
pub const YELLOW: u32 = 0xFFDD11;
pub const GREEN: u32 = 0x33DD33;
pub const BLUE: u32 = 0x2255EE;

/// A chat message, as relayed by the chat gateway
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MessageEvent {
    pub author_id: String,
    /// `None` for direct messages
    #[serde(default)]
    pub guild_id: Option<String>,
    pub channel_id: String,
    pub content: String,
    /// Roles the author holds in the guild
    #[serde(default)]
    pub roles: Vec<String>,
    /// Ids of the users tagged in the message
    #[serde(default)]
    pub mentions: Vec<String>,
    /// Ids of the roles tagged in the message
    #[serde(default)]
    pub mention_roles: Vec<String>,
}

impl MessageEvent {
    /// Everyone tagged in the message, roles first
    pub fn tagged(&self) -> Vec<String> {
        self.mention_roles
            .iter()
            .chain(self.mentions.iter())
            .cloned()
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Embed {
    pub description: String,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(description: impl Into<String>, color: u32) -> Self {
        Self {
            description: description.into(),
            color,
            fields: Vec::new(),
        }
    }

    pub fn success(description: impl Into<String>) -> Self {
        Self::new(description, GREEN)
    }

    pub fn warning(description: impl Into<String>) -> Self {
        Self::new(description, YELLOW)
    }

    pub fn failure(description: impl Into<String>) -> Self {
        Self::new(description, RED)
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self::new(description, BLUE)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// What the bot sends back for a message, `reply` is `None` when the message was ignored
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MessageReply {
    pub reply: Option<Embed>,
}

impl MessageReply {
    pub fn new(reply: Option<Embed>) -> Self {
        Self { reply }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
