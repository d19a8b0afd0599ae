use log::debug;

use crate::{event::Payload, step::WaitCondition, types::EventId};

/// Whether an incoming event satisfies `condition`
///
/// The event id must match. With no expected payload any such event passes;
/// otherwise the incoming payload must be present, of the same kind and equal.
pub fn matches(condition: &WaitCondition, event_id: EventId, payload: Option<&Payload>) -> bool {
    if condition.event_id != event_id {
        return false;
    }

    let Some(expected) = &condition.expected else {
        return true;
    };

    match payload {
        Some(incoming) if !incoming.same_kind(expected) => {
            debug!(
                "wait on event {} expects a {} payload, got {}",
                event_id,
                expected.kind_name(),
                incoming.kind_name()
            );
            false
        }
        Some(incoming) => incoming == expected,
        None => false,
    }
}
