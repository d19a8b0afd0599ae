use thiserror::Error;

use crate::types::{SequenceId, StepIndex};

/// Errors raised while building, validating or registering a sequence definition
///
/// A definition that fails any of these checks is rejected as a whole; it is
/// never partially stored and never replaces a previously registered definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    /// The per-step arrays of a definition disagree on the number of steps
    #[error("Mismatched step arrays: {actions} actions, {waits} wait conditions, {delays} delays")]
    MismatchedArrayLengths {
        actions: usize,
        waits: usize,
        delays: usize,
    },

    /// A parallel step was given no events to publish
    #[error("Parallel step {step} has no events")]
    EmptyParallelStep { step: StepIndex },

    /// A step was given a delay below zero
    #[error("Step {step} has negative delay {seconds}")]
    NegativeDelay { step: StepIndex, seconds: f32 },

    /// A step was given a NaN or infinite delay
    #[error("Step {step} has non-finite delay")]
    NonFiniteDelay { step: StepIndex },

    /// A definition was registered under an id other than its own
    #[error("Definition for sequence {definition} cannot be registered as sequence {requested}")]
    SequenceIdMismatch {
        requested: SequenceId,
        definition: SequenceId,
    },

    /// The sequence id is larger than the scheduler's configured registry limit
    #[error("Sequence id {sequence_id} exceeds the registry limit of {max}")]
    SequenceIdOutOfRange {
        sequence_id: SequenceId,
        max: SequenceId,
    },
}
