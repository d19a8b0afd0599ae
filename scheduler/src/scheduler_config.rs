use std::default::Default;

use cadence_shared::SequenceId;

/// Contains Config properties which will be used by the SequenceManager
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Longest delay a step may schedule, in seconds. Longer delays are
    /// replaced by no delay at all, and reported with a warning.
    pub max_delay_seconds: f32,
    /// Number of registry slots allocated up front. Rounded up to a power of two.
    pub initial_registry_capacity: usize,
    /// Highest sequence id accepted by `register`
    pub max_sequence_id: SequenceId,
    /// Whether lifecycle events are buffered for `SequenceManager::take_events`
    pub record_events: bool,
    /// Most lifecycle events held between two `take_events` calls. Once full,
    /// the oldest buffered event is dropped for each new one.
    pub max_buffered_events: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_delay_seconds: 3600.0,
            initial_registry_capacity: 16,
            max_sequence_id: 65_535,
            record_events: true,
            max_buffered_events: 4096,
        }
    }
}
