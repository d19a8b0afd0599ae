#![cfg(test)]


use crate::{
    EventId, EventPublisher, EventRef, InstanceKey, SequenceManager, TimerHandle, TimerQueue,
    TimerScheduler,
};

/// Loops every published event straight back into the manager
#[derive(Default)]
struct LoopbackHost {
    published: Vec<EventId>,
    timers: TimerQueue,
}

impl LoopbackHost {
    fn advance(&mut self, manager: &mut SequenceManager, seconds: f32) {
        for key in self.timers.advance(seconds) {
            manager.on_timer_elapsed(key, self);
        }
    }
}

impl EventPublisher for LoopbackHost {
    fn publish(&mut self, manager: &mut SequenceManager, event: &EventRef) {
        self.published.push(event.event_id);
        manager.on_event_published(event.event_id, event.payload.as_ref(), self);
    }
}

impl TimerScheduler for LoopbackHost {
    fn schedule_after(&mut self, seconds: f32, instance: InstanceKey) -> TimerHandle {
        self.timers.schedule_after(seconds, instance)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }
}
