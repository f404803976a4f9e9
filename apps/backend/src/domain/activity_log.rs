//! Bounded log of recent room activity shown to clients.

use std::collections::VecDeque;

use serde::Serialize;

pub const DEFAULT_CAPACITY: usize = 30;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Info,
    Ok,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub seq: u64,
    pub kind: ActivityKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    next_seq: u64,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 1,
        }
    }

    pub fn push(&mut self, kind: ActivityKind, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActivityEntry {
            seq: self.next_seq,
            kind,
            text: text.into(),
        });
        self.next_seq += 1;
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(ActivityKind::Info, text);
    }

    pub fn ok(&mut self, text: impl Into<String>) {
        self.push(ActivityKind::Ok, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(ActivityKind::Warn, text);
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<&ActivityEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
