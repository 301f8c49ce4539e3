//! Short-lived player notifications ("Collision! -10 points").

use serde::Serialize;
use std::collections::VecDeque;

/// One notification and the simulation time it was raised
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub text: String,
    pub created_at: f64,
}

/// Time-ordered, bounded queue of notifications
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    lifetime: f64,
    capacity: usize,
}

impl MessageLog {
    #[must_use]
    pub fn new(lifetime: f64, capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            lifetime,
            capacity,
        }
    }

    /// Add a message, evicting the oldest when full
    pub fn push(&mut self, text: impl Into<String>, now: f64) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(Message {
            text: text.into(),
            created_at: now,
        });
    }

    /// Drop messages older than their lifetime
    pub fn prune(&mut self, now: f64) {
        while self
            .messages
            .front()
            .is_some_and(|m| now - m.created_at >= self.lifetime)
        {
            self.messages.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> + '_ {
        self.messages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_expire() {
        let mut log = MessageLog::new(2.0, 8);
        log.push("first", 0.0);
        log.push("second", 1.5);

        log.prune(1.9);
        assert_eq!(log.len(), 2);

        log.prune(2.0);
        assert_eq!(log.len(), 1);
        assert_eq!(log.iter().next().unwrap().text, "second");

        log.prune(3.5);
        assert!(log.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = MessageLog::new(2.0, 2);
        log.push("a", 0.0);
        log.push("b", 0.1);
        log.push("c", 0.2);
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }
}
