//! Conversation windowing.
//!
//! Agents never send the full history to the model. A [`WindowPolicy`] picks
//! the most recent entries and the result is always a fresh copy, so the
//! caller's conversation is left untouched.

use std::ops::Range;

use crate::core::types::{Conversation, Message};

/// Window size used by every agent unless configured otherwise.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Which slice of the history an agent keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// The last `k` entries.
    Recent(usize),
    /// The last `k` entries with the newest one dropped.
    RecentExcludingNewest(usize),
}

impl WindowPolicy {
    /// Index range of the retained entries for a history of `len` messages.
    pub fn range(self, len: usize) -> Range<usize> {
        match self {
            WindowPolicy::Recent(k) => len.saturating_sub(k)..len,
            WindowPolicy::RecentExcludingNewest(k) => {
                let start = len.saturating_sub(k);
                start..len.saturating_sub(1).max(start)
            }
        }
    }

    /// Copy the retained entries of `conversation`, preserving order.
    pub fn apply(self, conversation: &[Message]) -> Conversation {
        conversation[self.range(conversation.len())].to_vec()
    }
}
