//! # Cadence Scheduler
//! Drives many concurrent instances of sequence definitions to completion.
//! Instances publish events, suspend on incoming events or elapsed time, and
//! are resumed by the host through [`SequenceManager::on_event_published`] and
//! [`SequenceManager::on_timer_elapsed`]. Everything runs on the caller's
//! thread; the host supplies publishing and timers through [`SequenceHost`].

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod events;
mod host;
mod instance;
mod scheduler_config;
mod sequence_manager;
mod timer_queue;
mod wait_index;

#[cfg(test)]
mod tests;

pub use cadence_shared::{
    matches, EventId, EventRef, Payload, SequenceBuilder, SequenceDefinition, SequenceId, Step,
    StepAction, StepIndex, StructuralError, Suffix, WaitCondition,
};

pub use events::{SequenceEvent, Suspension};
pub use host::{EventPublisher, SequenceHost, TimerHandle, TimerScheduler};
pub use instance::{ActiveInstance, InstanceKey, InstancePhase, InstancePool};
pub use scheduler_config::SchedulerConfig;
pub use sequence_manager::SequenceManager;
pub use timer_queue::TimerQueue;
pub use wait_index::WaitIndex;
