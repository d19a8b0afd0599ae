use cadence_shared::{EventId, SequenceId, StepIndex};

/// Why an instance yielded control
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Suspension {
    Wait(EventId),
    Delay(f32),
}

/// Lifecycle transitions recorded by the [`SequenceManager`](crate::SequenceManager)
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceEvent {
    Started {
        sequence_id: SequenceId,
    },
    Suspended {
        sequence_id: SequenceId,
        step: StepIndex,
        suspension: Suspension,
    },
    Resumed {
        sequence_id: SequenceId,
        step: StepIndex,
    },
    Completed {
        sequence_id: SequenceId,
    },
    Stopped {
        sequence_id: SequenceId,
        step: StepIndex,
    },
    /// A delay above the configured maximum was skipped
    DelayClamped {
        sequence_id: SequenceId,
        step: StepIndex,
        requested_seconds: f32,
        max_seconds: f32,
    },
}

impl SequenceEvent {
    pub fn sequence_id(&self) -> SequenceId {
        match self {
            SequenceEvent::Started { sequence_id }
            | SequenceEvent::Suspended { sequence_id, .. }
            | SequenceEvent::Resumed { sequence_id, .. }
            | SequenceEvent::Completed { sequence_id }
            | SequenceEvent::Stopped { sequence_id, .. }
            | SequenceEvent::DelayClamped { sequence_id, .. } => *sequence_id,
        }
    }
}
