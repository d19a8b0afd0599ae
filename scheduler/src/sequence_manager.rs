use std::{collections::VecDeque, mem, rc::Rc};

use log::{debug, info, warn};

use cadence_shared::{
    matches, EventId, Payload, SequenceDefinition, SequenceId, Step, StepIndex, StructuralError,
    Suffix,
};

use crate::{
    events::{SequenceEvent, Suspension},
    host::SequenceHost,
    instance::{ActiveInstance, InstanceKey, InstancePool},
    scheduler_config::SchedulerConfig,
    wait_index::WaitIndex,
};

enum Settled {
    Suspended,
    Advance,
}

/// Runs every active sequence instance
///
/// The manager owns the definition registry, the running table, the instance
/// pool and the wait index. All work happens synchronously inside `start`,
/// `on_event_published` and `on_timer_elapsed`; an instance that has to wait
/// simply stays in the index until one of those entry points resumes it.
///
/// Entry points may be re-entered from the host's `publish` callback. Every
/// resumption re-checks that its instance is still live, so a sequence stopped
/// from inside a handler is never resurrected by an event or timer already in
/// flight.
///
/// Lifecycle events accumulate until the host drains them with
/// [`SequenceManager::take_events`], which it should do once per tick. The
/// buffer holds at most `max_buffered_events`; past that the oldest are dropped.
pub struct SequenceManager {
    config: SchedulerConfig,
    registry: Vec<Option<Rc<SequenceDefinition>>>,
    running: Vec<Option<InstanceKey>>,
    active_count: usize,
    pool: InstancePool,
    wait_index: WaitIndex,
    waiter_scratch: Vec<(InstanceKey, StepIndex)>,
    outgoing_events: VecDeque<SequenceEvent>,
    dropped_events: usize,
}

impl SequenceManager {
    pub fn new(config: SchedulerConfig) -> Self {
        let capacity = config.initial_registry_capacity.max(1).next_power_of_two();

        let mut registry = Vec::new();
        registry.resize_with(capacity, || None);
        let mut running = Vec::new();
        running.resize_with(capacity, || None);

        Self {
            config,
            registry,
            running,
            active_count: 0,
            pool: InstancePool::new(),
            wait_index: WaitIndex::new(),
            waiter_scratch: Vec::new(),
            outgoing_events: VecDeque::new(),
            dropped_events: 0,
        }
    }

    // Registration

    /// Validates `definition` and stores it under `sequence_id`
    ///
    /// On error nothing changes; a definition already registered under the id
    /// stays in place. A running instance of a replaced definition finishes on
    /// the definition it started with.
    pub fn register(
        &mut self,
        sequence_id: SequenceId,
        definition: SequenceDefinition,
    ) -> Result<(), StructuralError> {
        if sequence_id > self.config.max_sequence_id {
            return Err(StructuralError::SequenceIdOutOfRange {
                sequence_id,
                max: self.config.max_sequence_id,
            });
        }
        if definition.sequence_id() != sequence_id {
            return Err(StructuralError::SequenceIdMismatch {
                requested: sequence_id,
                definition: definition.sequence_id(),
            });
        }
        definition.validate()?;

        self.ensure_capacity(sequence_id);

        let steps = definition.len();
        let replaced = self.registry[sequence_id as usize].replace(Rc::new(definition));
        if replaced.is_some() {
            info!(
                "SequenceManager: replaced definition of sequence {} ({} steps)",
                sequence_id, steps
            );
        } else {
            info!(
                "SequenceManager: registered sequence {} ({} steps)",
                sequence_id, steps
            );
        }

        Ok(())
    }

    /// Stops any running instance of `sequence_id`, then drops its definition
    pub fn unregister<H: SequenceHost + ?Sized>(
        &mut self,
        sequence_id: SequenceId,
        host: &mut H,
    ) -> Option<Rc<SequenceDefinition>> {
        self.stop(sequence_id, host);
        let removed = self.registry.get_mut(sequence_id as usize)?.take();
        if removed.is_some() {
            info!("SequenceManager: unregistered sequence {}", sequence_id);
        }
        removed
    }

    // Lifecycle

    /// Starts `sequence_id` and runs it until its first suspension or its end
    ///
    /// Returns false, doing nothing, if the id is unregistered or already running.
    pub fn start<H: SequenceHost + ?Sized>(&mut self, sequence_id: SequenceId, host: &mut H) -> bool {
        let index = sequence_id as usize;
        let Some(Some(definition)) = self.registry.get(index) else {
            debug!(
                "SequenceManager: start ignored, sequence {} is not registered",
                sequence_id
            );
            return false;
        };
        if self.running[index].is_some() {
            debug!(
                "SequenceManager: start ignored, sequence {} is already running",
                sequence_id
            );
            return false;
        }

        let definition = Rc::clone(definition);
        let key = self.pool.acquire(sequence_id, definition);
        self.running[index] = Some(key);
        self.active_count += 1;

        debug!("SequenceManager: started sequence {}", sequence_id);
        self.record(SequenceEvent::Started { sequence_id });

        self.run(key, host);
        true
    }

    /// Cancels the running instance of `sequence_id`, if there is one
    ///
    /// Safe to call from inside a `publish` callback, including for the
    /// sequence that is currently publishing.
    pub fn stop<H: SequenceHost + ?Sized>(&mut self, sequence_id: SequenceId, host: &mut H) -> bool {
        let Some(key) = self.running.get(sequence_id as usize).copied().flatten() else {
            debug!(
                "SequenceManager: stop ignored, sequence {} is not running",
                sequence_id
            );
            return false;
        };

        let step = self.pool.get(key).map_or(0, ActiveInstance::current_step);
        self.retire(sequence_id, key, host);

        debug!(
            "SequenceManager: stopped sequence {} at step {}",
            sequence_id, step
        );
        self.record(SequenceEvent::Stopped { sequence_id, step });
        true
    }

    /// Stops every running instance and empties the wait index. Definitions stay registered.
    pub fn stop_all<H: SequenceHost + ?Sized>(&mut self, host: &mut H) {
        for index in 0..self.running.len() {
            if self.running[index].is_some() {
                self.stop(index as SequenceId, host);
            }
        }
        self.wait_index.clear();
    }

    // Intake

    /// Resumes every instance waiting on `event_id` whose wait condition accepts `payload`
    ///
    /// Waiters are resolved in the order of a snapshot taken on entry. Instances
    /// stopped or resumed during the pass are skipped, and so are instances that
    /// start waiting on `event_id` during the pass; they are left for the next event.
    pub fn on_event_published<H: SequenceHost + ?Sized>(
        &mut self,
        event_id: EventId,
        payload: Option<&Payload>,
        host: &mut H,
    ) {
        if self.wait_index.waiting_count(event_id) == 0 {
            return;
        }

        let mut snapshot = mem::take(&mut self.waiter_scratch);
        snapshot.clear();
        for key in self.wait_index.waiters(event_id) {
            if let Some(instance) = self.pool.get(*key) {
                snapshot.push((*key, instance.current_step));
            }
        }

        for (key, snapshot_step) in snapshot.iter().copied() {
            // resolved, stopped or moved on to a later wait since the snapshot
            if !self.wait_index.contains(key, event_id) {
                continue;
            }
            if self.pool.get(key).map(ActiveInstance::current_step) != Some(snapshot_step) {
                continue;
            }
            if !self.wait_accepts(key, event_id, payload) {
                continue;
            }

            self.wait_index.remove_instance(key);
            let Some(instance) = self.pool.get_mut(key) else {
                continue;
            };
            instance.is_waiting = false;
            instance.wait_resolved = true;
            let (sequence_id, step) = (instance.sequence_id, instance.current_step);

            if let Some(sequence_id) = sequence_id {
                debug!(
                    "SequenceManager: sequence {} received event {} at step {}",
                    sequence_id, event_id, step
                );
                self.record(SequenceEvent::Resumed { sequence_id, step });
            }

            self.run(key, host);
        }

        snapshot.clear();
        if snapshot.capacity() > self.waiter_scratch.capacity() {
            self.waiter_scratch = snapshot;
        }
    }

    /// Resumes `instance` after its delay elapsed
    ///
    /// Returns false if the instance was stopped, or is not delaying, in which
    /// case the call is ignored.
    pub fn on_timer_elapsed<H: SequenceHost + ?Sized>(
        &mut self,
        instance: InstanceKey,
        host: &mut H,
    ) -> bool {
        let Some(active) = self.pool.get_mut(instance) else {
            debug!("SequenceManager: timer for a retired instance ignored");
            return false;
        };
        if active.pending_timer.take().is_none() {
            debug!("SequenceManager: timer for an instance that is not delaying ignored");
            return false;
        }
        active.delay_resolved = true;
        let (sequence_id, step) = (active.sequence_id, active.current_step);

        if let Some(sequence_id) = sequence_id {
            debug!(
                "SequenceManager: sequence {} delay elapsed at step {}",
                sequence_id, step
            );
            self.record(SequenceEvent::Resumed { sequence_id, step });
        }

        self.run(instance, host);
        true
    }

    // Events

    /// Swaps out the lifecycle events recorded since the last call
    pub fn take_events(&mut self) -> Vec<SequenceEvent> {
        self.dropped_events = 0;
        Vec::from(mem::take(&mut self.outgoing_events))
    }

    /// Events discarded since the last `take_events` because the buffer was full
    pub fn dropped_events(&self) -> usize {
        self.dropped_events
    }

    // Queries

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn is_registered(&self, sequence_id: SequenceId) -> bool {
        self.definition(sequence_id).is_some()
    }

    pub fn definition(&self, sequence_id: SequenceId) -> Option<&Rc<SequenceDefinition>> {
        self.registry.get(sequence_id as usize)?.as_ref()
    }

    pub fn is_running(&self, sequence_id: SequenceId) -> bool {
        self.instance_key(sequence_id).is_some()
    }

    pub fn instance_key(&self, sequence_id: SequenceId) -> Option<InstanceKey> {
        self.running.get(sequence_id as usize).copied().flatten()
    }

    pub fn instance(&self, sequence_id: SequenceId) -> Option<&ActiveInstance> {
        self.pool.get(self.instance_key(sequence_id)?)
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn waiting_count(&self, event_id: EventId) -> usize {
        self.wait_index.waiting_count(event_id)
    }

    pub fn wait_index(&self) -> &WaitIndex {
        &self.wait_index
    }

    pub fn registry_capacity(&self) -> usize {
        self.registry.len()
    }

    pub fn pool_allocated(&self) -> usize {
        self.pool.allocated()
    }

    pub fn pool_available(&self) -> usize {
        self.pool.available()
    }

    // Execution

    /// Drives `key` forward until it suspends, completes, or is stopped from a callback
    fn run<H: SequenceHost + ?Sized>(&mut self, key: InstanceKey, host: &mut H) {
        loop {
            let Some(instance) = self.pool.get_mut(key) else {
                return;
            };
            let Some(sequence_id) = instance.sequence_id else {
                return;
            };
            let Some(definition) = instance.definition.clone() else {
                return;
            };
            let step_index = instance.current_step;
            let emit = !instance.action_done;
            instance.action_done = true;

            let Some(step) = definition.step(step_index) else {
                debug!("SequenceManager: sequence {} completed", sequence_id);
                self.retire(sequence_id, key, host);
                self.record(SequenceEvent::Completed { sequence_id });
                return;
            };

            if emit {
                for event in step.action.events() {
                    debug!(
                        "SequenceManager: sequence {} step {} publishes event {}",
                        sequence_id, step_index, event.event_id
                    );
                    host.publish(self, event);
                    if !self.pool.contains(key) {
                        // stopped from inside the publish callback
                        return;
                    }
                }
            }

            match self.settle(sequence_id, step_index, key, &step, host) {
                Settled::Suspended => return,
                Settled::Advance => {
                    let Some(instance) = self.pool.get_mut(key) else {
                        return;
                    };
                    instance.advance();
                }
            }
        }
    }

    /// Suspends on the first unresolved suffix of `step`, in the step's suffix order
    fn settle<H: SequenceHost + ?Sized>(
        &mut self,
        sequence_id: SequenceId,
        step_index: StepIndex,
        key: InstanceKey,
        step: &Step<'_>,
        host: &mut H,
    ) -> Settled {
        for suffix in step.suffix_order() {
            let Some(instance) = self.pool.get_mut(key) else {
                return Settled::Suspended;
            };

            match suffix {
                Suffix::Wait => {
                    let Some(condition) = step.wait else {
                        continue;
                    };
                    if instance.wait_resolved {
                        continue;
                    }

                    instance.is_waiting = true;
                    self.wait_index.insert(key, condition.event_id);

                    debug!(
                        "SequenceManager: sequence {} step {} waits for event {}",
                        sequence_id, step_index, condition.event_id
                    );
                    self.record(SequenceEvent::Suspended {
                        sequence_id,
                        step: step_index,
                        suspension: Suspension::Wait(condition.event_id),
                    });
                    return Settled::Suspended;
                }
                Suffix::Delay => {
                    if !step.has_delay() || instance.delay_resolved {
                        continue;
                    }

                    let seconds = step.delay_seconds;
                    let max_seconds = self.config.max_delay_seconds;
                    if seconds > max_seconds {
                        instance.delay_resolved = true;
                        warn!(
                            "SequenceManager: sequence {} step {} delay of {}s exceeds the {}s maximum, skipping it",
                            sequence_id, step_index, seconds, max_seconds
                        );
                        self.record(SequenceEvent::DelayClamped {
                            sequence_id,
                            step: step_index,
                            requested_seconds: seconds,
                            max_seconds,
                        });
                        continue;
                    }

                    let handle = host.schedule_after(seconds, key);
                    if let Some(instance) = self.pool.get_mut(key) {
                        instance.pending_timer = Some(handle);
                    }

                    debug!(
                        "SequenceManager: sequence {} step {} delays {}s",
                        sequence_id, step_index, seconds
                    );
                    self.record(SequenceEvent::Suspended {
                        sequence_id,
                        step: step_index,
                        suspension: Suspension::Delay(seconds),
                    });
                    return Settled::Suspended;
                }
            }
        }

        Settled::Advance
    }

    fn wait_accepts(&self, key: InstanceKey, event_id: EventId, payload: Option<&Payload>) -> bool {
        let Some(instance) = self.pool.get(key) else {
            return false;
        };
        let Some(definition) = instance.definition.as_ref() else {
            return false;
        };
        definition
            .step(instance.current_step)
            .and_then(|step| step.wait)
            .map_or(false, |condition| matches(condition, event_id, payload))
    }

    /// Removes `key` from every index and returns it to the pool
    fn retire<H: SequenceHost + ?Sized>(
        &mut self,
        sequence_id: SequenceId,
        key: InstanceKey,
        host: &mut H,
    ) {
        self.wait_index.remove_instance(key);
        self.pool.release(key, host);

        if let Some(slot) = self.running.get_mut(sequence_id as usize) {
            if *slot == Some(key) {
                *slot = None;
                self.active_count -= 1;
            }
        }
    }

    fn ensure_capacity(&mut self, sequence_id: SequenceId) {
        let required = sequence_id as usize + 1;
        if required <= self.registry.len() {
            return;
        }

        let capacity = required.next_power_of_two();
        debug!(
            "SequenceManager: growing registry from {} to {} slots",
            self.registry.len(),
            capacity
        );
        self.registry.resize_with(capacity, || None);
        self.running.resize_with(capacity, || None);
    }

    fn record(&mut self, event: SequenceEvent) {
        let capacity = self.config.max_buffered_events;
        if !self.config.record_events || capacity == 0 {
            return;
        }

        if self.outgoing_events.len() >= capacity {
            if self.dropped_events == 0 {
                warn!(
                    "SequenceManager: event buffer full at {} entries, dropping the oldest until take_events is called",
                    capacity
                );
            }
            self.outgoing_events.pop_front();
            self.dropped_events += 1;
        }
        self.outgoing_events.push_back(event);
    }
}

impl Default for SequenceManager {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
