use cadence_shared::EventRef;

use crate::{instance::InstanceKey, sequence_manager::SequenceManager};

/// Opaque handle for a timer requested through [`TimerScheduler::schedule_after`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// The host's publish / subscribe transport, seen from the scheduler
///
/// `publish` receives the manager so a synchronous transport can deliver the
/// event straight back into [`SequenceManager::on_event_published`], and so
/// subscribers may start or stop sequences from inside their handlers.
pub trait EventPublisher {
    fn publish(&mut self, manager: &mut SequenceManager, event: &EventRef);
}

/// The host's tick facility, seen from the scheduler
///
/// When a scheduled timer elapses the host must call
/// [`SequenceManager::on_timer_elapsed`] with the `instance` it was given,
/// unless the timer was cancelled first.
pub trait TimerScheduler {
    fn schedule_after(&mut self, seconds: f32, instance: InstanceKey) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Everything the scheduler needs from its host
pub trait SequenceHost: EventPublisher + TimerScheduler {}

impl<T: EventPublisher + TimerScheduler + ?Sized> SequenceHost for T {}
