pub type SequenceId = u32;
pub type EventId = u32;
pub type StepIndex = usize;
