//! # Cadence Shared
//! Step model, sequence definitions, the sequence builder and wait-condition
//! matching shared between the cadence scheduler and the hosts that feed it.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod builder;
mod definition;
mod error;
mod event;
mod matcher;
mod step;
mod types;

pub use builder::SequenceBuilder;
pub use definition::SequenceDefinition;
pub use error::StructuralError;
pub use event::{EventRef, Payload};
pub use matcher::matches;
pub use step::{Step, StepAction, Suffix, WaitCondition};
pub use types::{EventId, SequenceId, StepIndex};
