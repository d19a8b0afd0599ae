use log::debug;

use crate::{
    definition::{check_delay, SequenceDefinition},
    error::StructuralError,
    event::{EventRef, Payload},
    step::{StepAction, WaitCondition},
    types::{EventId, SequenceId},
};

/// Accumulates steps in program order and seals them into a [`SequenceDefinition`]
///
/// Every `append_*` call pushes one entry onto each of the three step arrays,
/// so they can never drift out of alignment. `build` copies the arrays out;
/// the builder can be cleared and reused afterwards.
#[derive(Default)]
pub struct SequenceBuilder {
    actions: Vec<StepAction>,
    waits: Vec<Option<WaitCondition>>,
    delays: Vec<f32>,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `event_id` (with an optional payload), then optionally wait and/or delay
    pub fn append_single_event(
        &mut self,
        event_id: EventId,
        payload: Option<Payload>,
        wait_for: Option<EventId>,
        delay_seconds: f32,
    ) -> Result<&mut Self, StructuralError> {
        let event = EventRef { event_id, payload };
        self.push(
            StepAction::SingleEvent(event),
            wait_for.map(WaitCondition::any),
            delay_seconds,
        )
    }

    /// Publish every event of `events` in order, then optionally wait and/or delay
    pub fn append_parallel(
        &mut self,
        events: Vec<EventRef>,
        wait_for: Option<EventId>,
        delay_seconds: f32,
    ) -> Result<&mut Self, StructuralError> {
        if events.is_empty() {
            return Err(StructuralError::EmptyParallelStep { step: self.len() });
        }
        self.push(
            StepAction::ParallelEvents(events),
            wait_for.map(WaitCondition::any),
            delay_seconds,
        )
    }

    /// Wait for `event_id`, optionally requiring its payload to equal `expected`,
    /// then optionally delay
    pub fn append_wait(
        &mut self,
        event_id: EventId,
        expected: Option<Payload>,
        delay_seconds: f32,
    ) -> Result<&mut Self, StructuralError> {
        self.push(
            StepAction::WaitForEvent,
            Some(WaitCondition { event_id, expected }),
            delay_seconds,
        )
    }

    /// Delay for `seconds`, then optionally wait for `wait_for`
    pub fn append_delay(
        &mut self,
        seconds: f32,
        wait_for: Option<EventId>,
    ) -> Result<&mut Self, StructuralError> {
        self.push(StepAction::Delay, wait_for.map(WaitCondition::any), seconds)
    }

    /// Seals the accumulated steps into a validated definition
    pub fn build(&self, sequence_id: SequenceId) -> Result<SequenceDefinition, StructuralError> {
        debug!(
            "SequenceBuilder: building sequence {} with {} steps",
            sequence_id,
            self.len()
        );
        SequenceDefinition::from_parts(
            sequence_id,
            self.actions.clone(),
            self.waits.clone(),
            self.delays.clone(),
        )
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.waits.clear();
        self.delays.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn push(
        &mut self,
        action: StepAction,
        wait: Option<WaitCondition>,
        delay_seconds: f32,
    ) -> Result<&mut Self, StructuralError> {
        check_delay(self.len(), delay_seconds)?;

        self.actions.push(action);
        self.waits.push(wait);
        self.delays.push(delay_seconds);

        Ok(self)
    }
}
