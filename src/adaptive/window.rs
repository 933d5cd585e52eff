// SPDX-License-Identifier: MIT
//! Bounded message history used for frequency estimation

use std::collections::VecDeque;

use super::concepts::Concept;

/// A bounded sliding window over the concept sequences of past messages.
///
/// Oldest messages fall off when the window is full, so frequency
/// estimates follow the conversation rather than its entire history.
#[derive(Debug)]
pub struct ConversationWindow {
    messages: VecDeque<Vec<Concept>>,
    capacity: usize,
}

impl ConversationWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, evicting the oldest if at capacity
    pub fn push(&mut self, concepts: Vec<Concept>) {
        if self.messages.len() == self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(concepts);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent fraction of the window, at least one message.
    ///
    /// `fraction` of 0.2 over 50 stored messages yields the last 10.
    pub fn recent(&self, fraction: f64) -> impl Iterator<Item = &Vec<Concept>> {
        let count = if self.messages.is_empty() {
            0
        } else {
            let wanted = (self.messages.len() as f64 * fraction).ceil() as usize;
            wanted.max(1).min(self.messages.len())
        };
        self.messages.iter().skip(self.messages.len() - count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(concept: Concept) -> Vec<Concept> {
        vec![concept]
    }

    #[test]
    fn test_push_evicts_oldest() {
        let mut window = ConversationWindow::new(2);
        window.push(msg(Concept::Null));
        window.push(msg(Concept::Number));
        window.push(msg(Concept::String));
        assert_eq!(window.len(), 2);

        let all: Vec<_> = window.recent(1.0).cloned().collect();
        assert_eq!(all, vec![msg(Concept::Number), msg(Concept::String)]);
    }

    #[test]
    fn test_recent_fraction_rounds_up() {
        let mut window = ConversationWindow::new(10);
        for _ in 0..10 {
            window.push(msg(Concept::Null));
        }
        assert_eq!(window.recent(0.2).count(), 2);
        assert_eq!(window.recent(0.25).count(), 3);
    }

    #[test]
    fn test_recent_yields_at_least_one() {
        let mut window = ConversationWindow::new(10);
        window.push(msg(Concept::Get));
        assert_eq!(window.recent(0.2).count(), 1);
    }

    #[test]
    fn test_recent_on_empty_window() {
        let window = ConversationWindow::new(10);
        assert_eq!(window.recent(0.2).count(), 0);
        assert!(window.is_empty());
    }
}
