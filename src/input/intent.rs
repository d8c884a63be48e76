use std::collections::VecDeque;

use tracing::debug;

use crate::game::Direction;

/// Hand-off of direction intents from input handling to the tick.
///
/// Input pushes, the tick pops at most one intent. Order is kept, so two
/// quick presses between ticks (e.g. Up then Left) turn on two consecutive
/// ticks instead of the second overwriting the first.
#[derive(Debug, Clone)]
pub struct IntentBuffer {
    queue: VecDeque<Direction>,
    capacity: usize,
}

impl IntentBuffer {
    pub const DEFAULT_CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Queue an intent; returns false if the buffer is full and it was dropped.
    ///
    /// Repeating the most recently queued direction is a no-op.
    pub fn push(&mut self, direction: Direction) -> bool {
        if self.queue.back() == Some(&direction) {
            return true;
        }
        if self.queue.len() >= self.capacity {
            debug!(?direction, "Intent buffer full, dropping intent");
            return false;
        }
        self.queue.push_back(direction);
        true
    }

    /// The intent for the coming tick, if any
    pub fn take(&mut self) -> Option<Direction> {
        self.queue.pop_front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for IntentBuffer {
    fn default() -> Self {
        Self::new()
    }
}
