use std::{error::Error, fmt::Display};

pub const DEFAULT_PREFIX: &str = "^";

/// Settings shared by every handler, fixed at startup
#[derive(Clone, Debug)]
pub struct Config {
    token: String,
    prefix: String,
    bot_id: Option<String>,
}

impl Config {
    /// ## Error
    /// * If `token` is blank.
    pub fn new(token: &str, prefix: &str, bot_id: Option<String>) -> Result<Self, ConfigError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::InvalidEnvvar("LISTTO_TOKEN"));
        }

        let prefix = match prefix.trim() {
            "" => DEFAULT_PREFIX,
            prefix => prefix,
        };

        let bot_id = bot_id
            .map(|id| id.trim().to_owned())
            .filter(|id| !id.is_empty());

        Ok(Self {
            token: token.to_owned(),
            prefix: prefix.to_owned(),
            bot_id,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether a message was sent by the bot itself
    pub fn is_own_message(&self, author_id: &str) -> bool {
        self.bot_id.as_deref() == Some(author_id)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvvar(&'static str),
}

impl Error for ConfigError {}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            ConfigError::InvalidEnvvar(envvar) => format!("envvar was invalid: {}", envvar),
        };

        write!(f, "{}", output)
    }
}
