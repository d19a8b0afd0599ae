/// Start / stop calls made from inside publish callbacks

use cadence_scheduler::{EventRef, SequenceBuilder, SequenceEvent, SequenceManager};
use cadence_test::{assert_index_consistent, register_built, wait_then_emit, Reaction, TestHost};

#[test]
fn stopping_a_peer_during_resolution_does_not_resurrect_it() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();

    // B is started first so it is resolved first; its emission stops A
    wait_then_emit(&mut manager, 2, 5, 77);
    wait_then_emit(&mut manager, 1, 5, 88);
    host.on_event(77, Reaction::Stop(1));

    host.start(&mut manager, 2);
    host.start(&mut manager, 1);
    assert_eq!(manager.waiting_count(5), 2);

    host.deliver(&mut manager, 5, None);

    assert_eq!(host.emitted(), vec![77]);
    assert!(!manager.is_running(1));
    assert!(!manager.is_running(2));
    assert!(manager.wait_index().is_empty());
    assert_index_consistent!(manager);
    assert_eq!(
        host.lifecycle_of(1).last(),
        Some(&SequenceEvent::Stopped {
            sequence_id: 1,
            step: 0
        })
    );
}

#[test]
fn sequence_stopped_by_its_own_emission_publishes_nothing_more() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();

    let mut builder = SequenceBuilder::new();
    builder
        .append_parallel(vec![EventRef::new(30), EventRef::new(31)], None, 0.0)
        .unwrap()
        .append_single_event(32, None, None, 0.0)
        .unwrap();
    register_built(&mut manager, &mut builder, 1);
    host.on_event(30, Reaction::Stop(1));

    assert!(host.start(&mut manager, 1));

    assert_eq!(host.emitted(), vec![30]);
    assert!(!manager.is_running(1));
    assert_eq!(manager.pool_available(), 1);
    assert!(!host
        .lifecycle_of(1)
        .contains(&SequenceEvent::Completed { sequence_id: 1 }));
}

#[test]
fn restart_from_a_callback_invalidates_the_old_instance() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();

    let mut builder = SequenceBuilder::new();
    builder
        .append_delay(1.0, None)
        .unwrap()
        .append_single_event(10, None, None, 0.0)
        .unwrap();
    register_built(&mut manager, &mut builder, 1);
    wait_then_emit(&mut manager, 2, 5, 40);
    host.on_event(40, Reaction::Stop(1));
    host.on_event(40, Reaction::Start(1));

    host.start(&mut manager, 1);
    host.start(&mut manager, 2);
    let old_key = manager.instance_key(1).unwrap();

    host.deliver(&mut manager, 5, None);
    let new_key = manager.instance_key(1).unwrap();
    assert_ne!(old_key, new_key);
    assert_eq!(old_key.slot(), new_key.slot());

    assert!(!manager.on_timer_elapsed(old_key, &mut host));
    assert!(manager.is_running(1));
    assert_eq!(host.timers().len(), 1);

    host.advance(&mut manager, 1.0);
    assert_eq!(host.emitted(), vec![40, 10]);
    assert!(!manager.is_running(1));
}

#[test]
fn stopping_a_peer_from_a_timer_batch() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();

    let mut builder = SequenceBuilder::new();
    builder
        .append_delay(1.0, None)
        .unwrap()
        .append_single_event(50, None, None, 0.0)
        .unwrap();
    register_built(&mut manager, &mut builder, 1);
    builder
        .append_delay(1.0, None)
        .unwrap()
        .append_single_event(51, None, None, 0.0)
        .unwrap();
    register_built(&mut manager, &mut builder, 2);
    host.on_event(50, Reaction::Stop(2));

    host.start(&mut manager, 1);
    host.start(&mut manager, 2);

    // both timers come due in the same advance; the first one stops the second
    host.advance(&mut manager, 1.0);

    assert_eq!(host.emitted(), vec![50]);
    assert_eq!(manager.active_count(), 0);
}

#[test]
fn start_from_a_callback_runs_synchronously() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();

    let mut builder = SequenceBuilder::new();
    builder.append_single_event(1, None, None, 0.0).unwrap();
    register_built(&mut manager, &mut builder, 1);
    builder
        .append_single_event(2, None, None, 0.0)
        .unwrap()
        .append_single_event(3, None, None, 0.0)
        .unwrap();
    register_built(&mut manager, &mut builder, 2);
    host.on_event(1, Reaction::Start(2));

    host.start(&mut manager, 1);
    assert_eq!(host.emitted(), vec![1, 2, 3]);
    assert_eq!(manager.active_count(), 0);
}

#[test]
fn stop_all_from_a_callback() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();
    wait_then_emit(&mut manager, 1, 5, 90);
    wait_then_emit(&mut manager, 2, 5, 91);
    wait_then_emit(&mut manager, 3, 6, 92);
    host.on_event(90, Reaction::StopAll);

    for sequence_id in 1..=3 {
        host.start(&mut manager, sequence_id);
    }
    host.deliver(&mut manager, 5, None);

    assert_eq!(host.emitted(), vec![90]);
    assert_eq!(manager.active_count(), 0);
    assert!(manager.wait_index().is_empty());
}

#[test]
fn subscriber_republish_resumes_waiters() {
    let mut manager = SequenceManager::default();
    let mut host = TestHost::new();
    wait_then_emit(&mut manager, 1, 8, 99);
    host.on_event(7, Reaction::Publish(EventRef::new(8)));

    host.start(&mut manager, 1);
    host.deliver(&mut manager, 7, None);

    assert_eq!(host.emitted(), vec![8, 99]);
    assert!(!manager.is_running(1));
}
