use std::rc::Rc;

use log::debug;

use cadence_shared::{SequenceDefinition, SequenceId};

use crate::{
    host::TimerScheduler,
    instance::active_instance::{ActiveInstance, InstanceKey},
};

/// Free-list arena of [`ActiveInstance`] records
///
/// Records are never dropped; released slots are pushed onto the free list
/// and handed out again by the next `acquire`. The arena therefore grows to
/// the historical peak of concurrently active instances and stays there.
pub struct InstancePool {
    slots: Vec<ActiveInstance>,
    free_slots: Vec<u32>,
}

impl InstancePool {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    /// Takes a record from the free list, or allocates one, and binds it to `sequence_id`
    pub fn acquire(
        &mut self,
        sequence_id: SequenceId,
        definition: Rc<SequenceDefinition>,
    ) -> InstanceKey {
        let slot = match self.free_slots.pop() {
            Some(slot) => slot,
            None => {
                let slot = self.slots.len() as u32;
                debug!("InstancePool: allocating record #{}", slot);
                self.slots.push(ActiveInstance::new());
                slot
            }
        };

        let instance = &mut self.slots[slot as usize];
        instance.begin(sequence_id, definition);
        InstanceKey::new(slot, instance.generation)
    }

    /// Cancels the record's pending timer, resets it and returns it to the free list
    ///
    /// Returns false if `key` no longer refers to a live record.
    pub fn release<T: TimerScheduler + ?Sized>(&mut self, key: InstanceKey, timers: &mut T) -> bool {
        let Some(instance) = self.get_mut(key) else {
            return false;
        };

        if let Some(handle) = instance.pending_timer.take() {
            timers.cancel(handle);
        }
        instance.reset();

        self.free_slots.push(key.slot());
        true
    }

    pub fn get(&self, key: InstanceKey) -> Option<&ActiveInstance> {
        self.slots
            .get(key.slot() as usize)
            .filter(|instance| instance.is_live() && instance.generation == key.generation())
    }

    pub fn get_mut(&mut self, key: InstanceKey) -> Option<&mut ActiveInstance> {
        self.slots
            .get_mut(key.slot() as usize)
            .filter(|instance| instance.is_live() && instance.generation == key.generation())
    }

    pub fn contains(&self, key: InstanceKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of records ever allocated
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Number of records waiting in the free list
    pub fn available(&self) -> usize {
        self.free_slots.len()
    }
}

impl Default for InstancePool {
    fn default() -> Self {
        Self::new()
    }
}
