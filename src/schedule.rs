//! A time-ordered queue of scheduled ticks.
//!
//! Defines a `TickQueue<T>` storing items of type `T` sorted by `f64`
//! wall-clock time. The queue has methods for scheduling ticks, cancelling
//! them, and retrieving the earliest tick, optionally bounded by a time.
//! Scheduling is *O*(log(*n*)) while cancellation and retrieval are *O*(1).
//!
//! The orchestrator uses this to hold its pending day-advance tick; a
//! cancelled tick stays in the heap but loses its payload, so stale entries
//! are skipped cheaply on retrieval instead of being dug out of the heap.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

/// A time-ordered queue of scheduled ticks carrying data of type `T`.
///
/// Ticks are sequentially assigned a `TickId` (a wrapped `u64`). Two ticks
/// scheduled for the same time come out in scheduling order. The time and id
/// live in a binary heap of `Entry` objects; the data payload lives in a
/// hash map keyed by id. Cancellation removes the payload and leaves the
/// heap entry behind to be skipped on retrieval.
pub struct TickQueue<T> {
    queue: BinaryHeap<Entry>,
    data_map: HashMap<u64, T>,
    tick_counter: u64,
}

impl<T> TickQueue<T> {
    /// Create a new empty `TickQueue<T>`
    #[must_use]
    pub fn new() -> TickQueue<T> {
        TickQueue {
            queue: BinaryHeap::new(),
            data_map: HashMap::new(),
            tick_counter: 0,
        }
    }

    /// Schedule a tick at the specified time
    ///
    /// Returns a `TickId` for the newly-scheduled tick that can be used to
    /// cancel it if needed.
    pub fn schedule(&mut self, time: f64, data: T) -> TickId {
        let id = self.tick_counter;
        self.queue.push(Entry { time, id });
        self.data_map.insert(id, data);
        self.tick_counter += 1;
        TickId { id }
    }

    /// Cancel a scheduled tick
    ///
    /// # Panics
    ///
    /// This function panics if you cancel a tick which has already been
    /// cancelled or executed.
    pub fn cancel(&mut self, id: &TickId) {
        // Delete the payload but leave the heap entry in place; it will be
        // skipped when it reaches the top
        self.data_map.remove(&id.id).expect("Tick does not exist");
    }

    /// Retrieve the earliest scheduled tick
    ///
    /// Returns the next tick if one exists or else `None` if the queue is
    /// empty.
    pub fn next_tick(&mut self) -> Option<ScheduledTick<T>> {
        loop {
            // Pop from the heap until we find a live tick or run out
            match self.queue.pop() {
                Some(entry) => {
                    if let Some(data) = self.data_map.remove(&entry.id) {
                        return Some(ScheduledTick {
                            time: entry.time,
                            data,
                        });
                    }
                }
                None => {
                    return None;
                }
            }
        }
    }

    /// Retrieve the earliest scheduled tick if it is due at or before `time`
    ///
    /// Ticks scheduled later than `time` stay in the queue. Cancelled
    /// entries encountered along the way are discarded.
    pub fn next_tick_before(&mut self, time: f64) -> Option<ScheduledTick<T>> {
        loop {
            match self.queue.peek() {
                None => return None,
                Some(entry) => {
                    if self.data_map.contains_key(&entry.id) && entry.time > time {
                        return None;
                    }
                }
            }
            // The top entry is either cancelled or due
            if let Some(entry) = self.queue.pop() {
                if let Some(data) = self.data_map.remove(&entry.id) {
                    return Some(ScheduledTick {
                        time: entry.time,
                        data,
                    });
                }
            }
        }
    }

    /// Remove all scheduled ticks
    pub fn clear(&mut self) {
        self.queue.clear();
        self.data_map.clear();
    }

    /// True when no live ticks remain
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data_map.is_empty()
    }
}

impl<T> Default for TickQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A time and id pair used to order ticks in the `TickQueue<T>`
///
/// `Entry` objects are sorted in increasing order of time and then tick id
#[derive(PartialEq, Debug)]
struct Entry {
    time: f64,
    id: u64,
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entry objects are ordered in increasing order by time and then tick id
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        let time_ordering = self.time.partial_cmp(&other.time).unwrap().reverse();
        match time_ordering {
            // Break time ties in scheduling order
            Ordering::Equal => self.id.cmp(&other.id).reverse(),
            _ => time_ordering,
        }
    }
}

/// A unique identifier for a tick scheduled on a `TickQueue<T>`
pub struct TickId {
    id: u64,
}

/// A tick that holds data of type `T` due at the specified time
pub struct ScheduledTick<T> {
    pub time: f64,
    pub data: T,
}
