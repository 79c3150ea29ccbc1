use crate::{app::AppResult, reply};
use contracts::Embed;

pub struct ServerController {
    prefix: String,
}

impl ServerController {
    pub fn new(prefix: String) -> Self {
        Self { prefix }
    }

    pub fn ping(&self) -> AppResult<Embed> {
        Ok(Embed::success("pong"))
    }

    /// `topic` picks the help page, `lists` or `items`, anything else shows the overview
    pub fn help(&self, topic: &str) -> AppResult<Embed> {
        Ok(reply::help(&self.prefix, topic))
    }
}
