use crate::{
    error::StructuralError,
    step::{Step, StepAction, WaitCondition},
    types::{SequenceId, StepIndex},
};

/// An immutable, validated description of an ordered sequence of steps
///
/// Steps are kept as three index-aligned arrays: the primary action, the
/// optional wait suffix and the delay suffix (`0.0` meaning none). Use
/// [`SequenceBuilder`](crate::SequenceBuilder) to keep them aligned, or
/// [`SequenceDefinition::from_parts`] for already-assembled arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceDefinition {
    sequence_id: SequenceId,
    actions: Vec<StepAction>,
    waits: Vec<Option<WaitCondition>>,
    delays: Vec<f32>,
}

impl SequenceDefinition {
    /// Assembles a definition from raw step arrays and validates it
    pub fn from_parts(
        sequence_id: SequenceId,
        actions: Vec<StepAction>,
        waits: Vec<Option<WaitCondition>>,
        delays: Vec<f32>,
    ) -> Result<Self, StructuralError> {
        let definition = Self {
            sequence_id,
            actions,
            waits,
            delays,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Checks array alignment, parallel-step and delay invariants
    pub fn validate(&self) -> Result<(), StructuralError> {
        if self.actions.len() != self.waits.len() || self.actions.len() != self.delays.len() {
            return Err(StructuralError::MismatchedArrayLengths {
                actions: self.actions.len(),
                waits: self.waits.len(),
                delays: self.delays.len(),
            });
        }

        for (step, (action, delay)) in self.actions.iter().zip(self.delays.iter()).enumerate() {
            if let StepAction::ParallelEvents(events) = action {
                if events.is_empty() {
                    return Err(StructuralError::EmptyParallelStep { step });
                }
            }
            check_delay(step, *delay)?;
        }

        Ok(())
    }

    pub fn sequence_id(&self) -> SequenceId {
        self.sequence_id
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn step(&self, index: StepIndex) -> Option<Step<'_>> {
        let action = self.actions.get(index)?;
        let wait = self.waits.get(index)?.as_ref();
        let delay_seconds = *self.delays.get(index)?;
        Some(Step {
            action,
            wait,
            delay_seconds,
        })
    }

    pub fn steps(&self) -> impl Iterator<Item = Step<'_>> {
        (0..self.len()).filter_map(move |index| self.step(index))
    }
}

pub(crate) fn check_delay(step: StepIndex, seconds: f32) -> Result<(), StructuralError> {
    if !seconds.is_finite() {
        return Err(StructuralError::NonFiniteDelay { step });
    }
    if seconds < 0.0 {
        return Err(StructuralError::NegativeDelay { step, seconds });
    }
    Ok(())
}
