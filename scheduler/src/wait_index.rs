use std::collections::HashMap;

use cadence_shared::EventId;

use crate::instance::InstanceKey;

/// Mirrored mapping between waiting instances and the events they wait on
///
/// `waiters_by_event` holds an unordered bucket of instances per event.
/// `events_by_waiter` holds, per instance, every event it waits on together
/// with its position in that event's bucket, so removal is a swap-remove
/// followed by one back-pointer fix-up.
pub struct WaitIndex {
    waiters_by_event: HashMap<EventId, Vec<InstanceKey>>,
    events_by_waiter: HashMap<InstanceKey, Vec<(EventId, usize)>>,
}

impl WaitIndex {
    pub fn new() -> Self {
        Self {
            waiters_by_event: HashMap::new(),
            events_by_waiter: HashMap::new(),
        }
    }

    /// Returns false if `key` was already waiting on `event_id`
    pub fn insert(&mut self, key: InstanceKey, event_id: EventId) -> bool {
        if self.contains(key, event_id) {
            return false;
        }

        let bucket = self.waiters_by_event.entry(event_id).or_default();
        let position = bucket.len();
        bucket.push(key);

        self.events_by_waiter
            .entry(key)
            .or_default()
            .push((event_id, position));

        true
    }

    /// Returns false if `key` was not waiting on `event_id`
    pub fn remove(&mut self, key: InstanceKey, event_id: EventId) -> bool {
        let Some(entries) = self.events_by_waiter.get_mut(&key) else {
            return false;
        };
        let Some(entry_index) = entries.iter().position(|(id, _)| *id == event_id) else {
            return false;
        };
        let (_, position) = entries.swap_remove(entry_index);
        if entries.is_empty() {
            self.events_by_waiter.remove(&key);
        }

        self.remove_from_bucket(event_id, position);
        true
    }

    /// Removes `key` from every bucket it is in, returning how many that was
    pub fn remove_instance(&mut self, key: InstanceKey) -> usize {
        let Some(entries) = self.events_by_waiter.remove(&key) else {
            return 0;
        };

        let count = entries.len();
        for (event_id, position) in entries {
            self.remove_from_bucket(event_id, position);
        }
        count
    }

    pub fn contains(&self, key: InstanceKey, event_id: EventId) -> bool {
        self.events_by_waiter
            .get(&key)
            .map_or(false, |entries| entries.iter().any(|(id, _)| *id == event_id))
    }

    pub fn is_waiting(&self, key: InstanceKey) -> bool {
        self.events_by_waiter.contains_key(&key)
    }

    pub fn waiters(&self, event_id: EventId) -> &[InstanceKey] {
        self.waiters_by_event
            .get(&event_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn waiting_count(&self, event_id: EventId) -> usize {
        self.waiters(event_id).len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters_by_event.is_empty() && self.events_by_waiter.is_empty()
    }

    pub fn clear(&mut self) {
        self.waiters_by_event.clear();
        self.events_by_waiter.clear();
    }

    /// Whether both sides mirror each other exactly
    pub fn is_consistent(&self) -> bool {
        let mut forward = 0;
        for (event_id, bucket) in &self.waiters_by_event {
            if bucket.is_empty() {
                return false;
            }
            for (position, key) in bucket.iter().enumerate() {
                let mirrored = self
                    .events_by_waiter
                    .get(key)
                    .map_or(false, |entries| entries.contains(&(*event_id, position)));
                if !mirrored {
                    return false;
                }
                forward += 1;
            }
        }

        let backward: usize = self.events_by_waiter.values().map(Vec::len).sum();
        forward == backward
    }

    fn remove_from_bucket(&mut self, event_id: EventId, position: usize) {
        let Some(bucket) = self.waiters_by_event.get_mut(&event_id) else {
            return;
        };

        bucket.swap_remove(position);

        if let Some(moved) = bucket.get(position).copied() {
            if let Some(entries) = self.events_by_waiter.get_mut(&moved) {
                if let Some(entry) = entries.iter_mut().find(|(id, _)| *id == event_id) {
                    entry.1 = position;
                }
            }
        }

        if bucket.is_empty() {
            self.waiters_by_event.remove(&event_id);
        }
    }
}

impl Default for WaitIndex {
    fn default() -> Self {
        Self::new()
    }
}
