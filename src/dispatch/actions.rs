//! Ordered pattern→handler fallback dispatch.

use regex::Regex;

use crate::error::PatternError;
use crate::message::Message;

use super::bot::Bot;

/// Handler invoked when its pattern matches. The slice holds the whole
/// match followed by any capture-group texts; groups that did not
/// participate in the match are empty strings.
pub type Handler = Box<dyn Fn(&Bot, &Message, &[String]) -> anyhow::Result<()> + Send + Sync>;

/// Handler invoked when no pattern matches.
pub type DefaultHandler = Box<dyn Fn(&Bot, &Message) -> anyhow::Result<()> + Send + Sync>;

/// Ordered sequence of compiled patterns and their handlers, plus an
/// optional default. Patterns are tested in registration order; the
/// first match wins.
pub struct ActionTable {
    entries: Vec<(Regex, Handler)>,
    default: Option<DefaultHandler>,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            default: None,
        }
    }

    /// Append a pattern→handler pair. The pattern is compiled eagerly;
    /// an invalid expression registers nothing.
    pub fn respond_to(
        &mut self,
        pattern: &str,
        handler: impl Fn(&Bot, &Message, &[String]) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Result<(), PatternError> {
        let regex = Regex::new(pattern)?;
        self.entries.push((regex, Box::new(handler)));
        Ok(())
    }

    /// Install the handler used when no pattern matches.
    pub fn set_default(
        &mut self,
        handler: impl Fn(&Bot, &Message) -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.default = Some(Box::new(handler));
    }

    /// Run `text` (the message text with any bot mention already
    /// stripped) through the table. Returns the invoked handler's
    /// result, or `Ok(())` when nothing matched and no default is
    /// installed.
    pub fn dispatch(&self, bot: &Bot, msg: &Message, text: &str) -> anyhow::Result<()> {
        for (pattern, handler) in &self.entries {
            if let Some(captures) = pattern.captures(text) {
                let groups: Vec<String> = captures
                    .iter()
                    .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                return handler(bot, msg, &groups);
            }
        }
        match &self.default {
            Some(default) => default(bot, msg),
            None => Ok(()),
        }
    }
}
