//! In-game message log with stacking of repeated lines.

use serde::{Deserialize, Serialize};

/// Display tone of a message; the UI maps these to concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    /// Greeting shown once per new session.
    Welcome,
    /// Neutral information.
    Info,
    /// Attack and damage reports.
    Combat,
    /// Something the player should notice.
    Warning,
}

/// A single logged line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message body without the repeat suffix.
    pub text: String,
    /// Display tone.
    pub tone: Tone,
    /// How many consecutive times this line was logged.
    pub count: u32,
}

impl Message {
    fn new(text: String, tone: Tone) -> Self {
        Self {
            text,
            tone,
            count: 1,
        }
    }

    /// Rendered text including the repeat suffix.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// Ordered log of everything reported to the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line, stacking onto the previous entry when it repeats.
    pub fn add(&mut self, text: impl Into<String>, tone: Tone) {
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            if last.text == text && last.tone == tone {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message::new(text, tone));
    }

    /// All logged messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether nothing has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent `n` messages, oldest first.
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lines_stack() {
        let mut log = MessageLog::new();
        log.add("You hit the Orc.", Tone::Combat);
        log.add("You hit the Orc.", Tone::Combat);
        log.add("The Orc dies!", Tone::Combat);
        assert_eq!(log.messages().len(), 2);
        assert_eq!(log.messages()[0].full_text(), "You hit the Orc. (x2)");
    }

    #[test]
    fn different_tones_do_not_stack() {
        let mut log = MessageLog::new();
        log.add("ping", Tone::Info);
        log.add("ping", Tone::Warning);
        assert_eq!(log.messages().len(), 2);
    }

    #[test]
    fn tail_returns_most_recent() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.add(format!("line {i}"), Tone::Info);
        }
        let tail = log.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[1].text, "line 4");
    }
}
