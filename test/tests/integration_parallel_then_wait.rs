/// End-to-end run of a parallel step with a wait suffix followed by a delay step

use cadence_scheduler::{
    EventRef, SequenceBuilder, SequenceEvent, SequenceManager, Suspension,
};
use cadence_test::{register_built, TestHost, TraceEntry};

fn parallel_then_wait(manager: &mut SequenceManager) {
    let mut builder = SequenceBuilder::new();
    builder
        .append_parallel(vec![EventRef::new(10), EventRef::new(11)], Some(20), 0.0)
        .unwrap()
        .append_delay(0.5, None)
        .unwrap();
    register_built(manager, &mut builder, 1);
}

#[test]
fn parallel_then_wait_produces_expected_trace() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();
    parallel_then_wait(&mut manager);

    assert!(host.start(&mut manager, 1));
    assert_eq!(host.emitted(), vec![10, 11]);
    assert_eq!(manager.waiting_count(20), 1);

    host.deliver(&mut manager, 20, None);
    assert_eq!(manager.waiting_count(20), 0);
    assert_eq!(host.timers().len(), 1);

    host.advance(&mut manager, 0.5);
    assert!(!manager.is_running(1));

    assert_eq!(
        host.trace(),
        &[
            TraceEntry::Lifecycle(SequenceEvent::Started { sequence_id: 1 }),
            TraceEntry::Emit(10, None),
            TraceEntry::Emit(11, None),
            TraceEntry::Lifecycle(SequenceEvent::Suspended {
                sequence_id: 1,
                step: 0,
                suspension: Suspension::Wait(20),
            }),
            TraceEntry::Lifecycle(SequenceEvent::Resumed {
                sequence_id: 1,
                step: 0
            }),
            TraceEntry::Lifecycle(SequenceEvent::Suspended {
                sequence_id: 1,
                step: 1,
                suspension: Suspension::Delay(0.5),
            }),
            TraceEntry::Lifecycle(SequenceEvent::Resumed {
                sequence_id: 1,
                step: 1
            }),
            TraceEntry::Lifecycle(SequenceEvent::Completed { sequence_id: 1 }),
        ]
    );
}

#[test]
fn timer_callback_for_the_instance_completes_it() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();
    parallel_then_wait(&mut manager);

    host.start(&mut manager, 1);
    host.deliver(&mut manager, 20, None);

    let key = manager.instance_key(1).unwrap();
    assert!(manager.on_timer_elapsed(key, &mut host));
    assert!(!manager.is_running(1));
    assert_eq!(manager.active_count(), 0);

    // the same callback arriving again is ignored
    assert!(!manager.on_timer_elapsed(key, &mut host));
}

#[test]
fn early_timer_callback_is_ignored_while_waiting() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();
    parallel_then_wait(&mut manager);

    host.start(&mut manager, 1);
    let key = manager.instance_key(1).unwrap();

    assert!(!manager.on_timer_elapsed(key, &mut host));
    assert_eq!(manager.waiting_count(20), 1);
    assert!(manager.instance(1).unwrap().is_waiting());
}
