use std::rc::Rc;

use cadence_shared::{SequenceDefinition, SequenceId, StepIndex};

use crate::host::TimerHandle;

/// Identifies one pooled instance record for the span of a single run
///
/// The generation is bumped every time the record goes back to the pool, so a
/// key held across a stop no longer resolves, even after the record is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    slot: u32,
    generation: u32,
}

impl InstanceKey {
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstancePhase {
    /// Sitting in the pool
    Idle,
    Executing,
    Waiting,
    Delaying,
}

/// Runtime cursor for one in-flight execution of a definition
pub struct ActiveInstance {
    pub(crate) generation: u32,
    pub(crate) sequence_id: Option<SequenceId>,
    pub(crate) current_step: StepIndex,
    pub(crate) is_waiting: bool,
    pub(crate) pending_timer: Option<TimerHandle>,
    pub(crate) definition: Option<Rc<SequenceDefinition>>,
    // progress through the current step
    pub(crate) action_done: bool,
    pub(crate) wait_resolved: bool,
    pub(crate) delay_resolved: bool,
}

impl ActiveInstance {
    pub(crate) fn new() -> Self {
        Self {
            generation: 0,
            sequence_id: None,
            current_step: 0,
            is_waiting: false,
            pending_timer: None,
            definition: None,
            action_done: false,
            wait_resolved: false,
            delay_resolved: false,
        }
    }

    pub fn sequence_id(&self) -> Option<SequenceId> {
        self.sequence_id
    }

    pub fn current_step(&self) -> StepIndex {
        self.current_step
    }

    pub fn is_waiting(&self) -> bool {
        self.is_waiting
    }

    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.pending_timer
    }

    pub fn phase(&self) -> InstancePhase {
        if self.sequence_id.is_none() {
            InstancePhase::Idle
        } else if self.is_waiting {
            InstancePhase::Waiting
        } else if self.pending_timer.is_some() {
            InstancePhase::Delaying
        } else {
            InstancePhase::Executing
        }
    }

    pub(crate) fn is_live(&self) -> bool {
        self.sequence_id.is_some()
    }

    pub(crate) fn begin(&mut self, sequence_id: SequenceId, definition: Rc<SequenceDefinition>) {
        self.sequence_id = Some(sequence_id);
        self.definition = Some(definition);
    }

    pub(crate) fn advance(&mut self) {
        self.current_step += 1;
        self.action_done = false;
        self.wait_resolved = false;
        self.delay_resolved = false;
    }

    /// Back to sentinel values; the caller is responsible for the timer
    pub(crate) fn reset(&mut self) {
        self.sequence_id = None;
        self.current_step = 0;
        self.is_waiting = false;
        self.pending_timer = None;
        self.definition = None;
        self.action_done = false;
        self.wait_resolved = false;
        self.delay_resolved = false;
        self.generation = self.generation.wrapping_add(1);
    }
}
