use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashSet},
};

use crate::{
    host::{TimerHandle, TimerScheduler},
    instance::InstanceKey,
};

const COMPACT_SLACK: usize = 16;

struct TimerEntry {
    deadline: f64,
    handle: TimerHandle,
    instance: InstanceKey,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    // reversed, so the max-heap yields the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .total_cmp(&self.deadline)
            .then_with(|| other.handle.cmp(&self.handle))
    }
}

/// A tick-driven timer facility for hosts that have no timer service of their own
///
/// Time only moves when the host calls [`TimerQueue::advance`]. Cancelled
/// timers are skipped when their deadline passes, and the heap is compacted
/// whenever cancelled entries come to outnumber live ones, so start / stop
/// churn never grows it past a small multiple of the live timer count.
pub struct TimerQueue {
    now: f64,
    next_handle: u64,
    heap: BinaryHeap<TimerEntry>,
    live_handles: HashSet<TimerHandle>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_handle: 0,
            heap: BinaryHeap::new(),
            live_handles: HashSet::new(),
        }
    }

    /// Seconds elapsed since the queue was created
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Moves time forward and returns the instances whose timers came due,
    /// earliest deadline first, ties in scheduling order
    pub fn advance(&mut self, elapsed_seconds: f32) -> Vec<InstanceKey> {
        self.now += f64::from(elapsed_seconds.max(0.0));

        let mut due = Vec::new();
        while let Some(entry) = self.heap.peek() {
            if entry.deadline > self.now {
                break;
            }
            let Some(entry) = self.heap.pop() else {
                break;
            };
            if self.live_handles.remove(&entry.handle) {
                due.push(entry.instance);
            }
        }
        due
    }

    /// Number of timers scheduled and not yet fired or cancelled
    pub fn len(&self) -> usize {
        self.live_handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live_handles.is_empty()
    }

    pub fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.live_handles.contains(&handle)
    }

    /// Entries in the heap, cancelled ones included
    #[cfg(test)]
    pub(crate) fn heap_len(&self) -> usize {
        self.heap.len()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerScheduler for TimerQueue {
    fn schedule_after(&mut self, seconds: f32, instance: InstanceKey) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        self.heap.push(TimerEntry {
            deadline: self.now + f64::from(seconds.max(0.0)),
            handle,
            instance,
        });
        self.live_handles.insert(handle);

        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if !self.live_handles.remove(&handle) {
            return;
        }

        // drop cancelled entries once they outnumber the live ones
        if self.heap.len() > 2 * self.live_handles.len() + COMPACT_SLACK {
            let live_handles = &self.live_handles;
            self.heap.retain(|entry| live_handles.contains(&entry.handle));
        }
    }
}
