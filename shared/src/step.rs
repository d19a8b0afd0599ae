use crate::{
    event::{EventRef, Payload},
    types::EventId,
};

/// The primary action of a step, run once when the step becomes current
#[derive(Clone, Debug, PartialEq)]
pub enum StepAction {
    /// Publish one event
    SingleEvent(EventRef),
    /// Publish every event, in order. Never empty in a valid definition.
    ParallelEvents(Vec<EventRef>),
    /// No emission; the step's wait condition is the whole behavior
    WaitForEvent,
    /// No emission; the step's delay is the whole behavior
    Delay,
}

impl StepAction {
    pub fn name(&self) -> &'static str {
        match self {
            StepAction::SingleEvent(_) => "SingleEvent",
            StepAction::ParallelEvents(_) => "ParallelEvents",
            StepAction::WaitForEvent => "WaitForEvent",
            StepAction::Delay => "Delay",
        }
    }

    /// Events published by this action, in emission order
    pub fn events(&self) -> &[EventRef] {
        match self {
            StepAction::SingleEvent(event) => std::slice::from_ref(event),
            StepAction::ParallelEvents(events) => events,
            StepAction::WaitForEvent | StepAction::Delay => &[],
        }
    }

    /// The order in which this step's wait and delay suffixes are resolved
    pub fn suffix_order(&self) -> [Suffix; 2] {
        match self {
            StepAction::Delay => [Suffix::Delay, Suffix::Wait],
            _ => [Suffix::Wait, Suffix::Delay],
        }
    }
}

/// One of the two suspension suffixes a step may carry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Suffix {
    Wait,
    Delay,
}

/// Suspends an instance until an event with `event_id` arrives
///
/// With `expected` set, the incoming payload must also be equal to it.
#[derive(Clone, Debug, PartialEq)]
pub struct WaitCondition {
    pub event_id: EventId,
    pub expected: Option<Payload>,
}

impl WaitCondition {
    pub fn any(event_id: EventId) -> Self {
        Self {
            event_id,
            expected: None,
        }
    }

    pub fn expecting(event_id: EventId, expected: impl Into<Payload>) -> Self {
        Self {
            event_id,
            expected: Some(expected.into()),
        }
    }
}

/// A borrowed view of one step of a definition
#[derive(Clone, Copy, Debug)]
pub struct Step<'a> {
    pub action: &'a StepAction,
    pub wait: Option<&'a WaitCondition>,
    pub delay_seconds: f32,
}

impl<'a> Step<'a> {
    pub fn has_wait(&self) -> bool {
        self.wait.is_some()
    }

    pub fn has_delay(&self) -> bool {
        self.delay_seconds > 0.0
    }

    pub fn suffix_order(&self) -> [Suffix; 2] {
        self.action.suffix_order()
    }
}
