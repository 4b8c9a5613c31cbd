//! The serialization task.
//!
//! One spawned task per analyzer owns the update queue and is the only
//! writer of [`AnalyzerState`]. Commands from the handle and outcomes from
//! workers arrive on two unbounded channels and are handled one at a time,
//! so no two mutations ever interleave. Listeners are notified from here,
//! after the write lock is released.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::base::{SnapshotSource, StructuralElement};

use super::listener::ListenerRegistry;
use super::state::{AnalyzerState, Notifications};
use super::worker::{self, Computation, Job, WorkerOutcome};
use super::{AnalyzerConfig, UpdateQueue, UpdateRequest, ValidatorChain};

/// Requests sent from the [`Analyzer`](super::Analyzer) handle.
pub(crate) enum Command<E> {
    Queue {
        element: E,
        check: bool,
        collect_usages: bool,
    },
    Remove(E),
    RecheckElementsWithErrors,
    ClearCaches,
    Stop,
    Reset,
    Dispose,
    WaitIdle {
        flush: bool,
        reply: oneshot::Sender<()>,
    },
}

/// State visible to both the handle and the serialization task.
pub(crate) struct Shared<E: StructuralElement> {
    pub state: RwLock<AnalyzerState<E>>,
    pub listeners: ListenerRegistry<E>,
    /// Token of the current session; cancelled means stopped.
    pub session: Mutex<CancellationToken>,
    pub buffered: AtomicUsize,
    pub in_flight: AtomicUsize,
}

impl<E: StructuralElement> Shared<E> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(AnalyzerState::new()),
            listeners: ListenerRegistry::default(),
            session: Mutex::new(CancellationToken::new()),
            buffered: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }
}

pub(crate) struct Dispatcher<E: StructuralElement> {
    name: String,
    shared: Arc<Shared<E>>,
    source: Arc<dyn SnapshotSource<E::Model>>,
    chain: Arc<ValidatorChain<E>>,
    queue: UpdateQueue<E>,
    commands: UnboundedReceiver<Command<E>>,
    results_tx: UnboundedSender<WorkerOutcome<E>>,
    results: UnboundedReceiver<WorkerOutcome<E>>,
    token: CancellationToken,
    /// Newest sequence number handed out.
    seq: u64,
    /// Bumped whenever in-flight results must be ignored wholesale.
    epoch: u64,
    stopped: bool,
    in_flight: usize,
    idle_waiters: Vec<oneshot::Sender<()>>,
    flushing: bool,
}

impl<E: StructuralElement> Dispatcher<E> {
    pub fn new(
        config: &AnalyzerConfig,
        shared: Arc<Shared<E>>,
        source: Arc<dyn SnapshotSource<E::Model>>,
        chain: Arc<ValidatorChain<E>>,
        commands: UnboundedReceiver<Command<E>>,
    ) -> Self {
        let (results_tx, results) = mpsc::unbounded_channel();
        let token = shared.session.lock().clone();
        Self {
            name: config.name.clone(),
            shared,
            source,
            chain,
            queue: UpdateQueue::new(config.debounce(), config.restart_timer_on_add),
            commands,
            results_tx,
            results,
            token,
            seq: 0,
            epoch: 0,
            stopped: false,
            in_flight: 0,
            idle_waiters: Vec::new(),
            flushing: false,
        }
    }

    pub async fn run(mut self) {
        debug!("[ANALYZER:{}] started", self.name);

        loop {
            let deadline = self.queue.deadline();
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(Command::Dispose) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(outcome) = self.results.recv() => self.apply_outcome(outcome),
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.dispatch_buffered();
                }
            }

            if self.flushing && self.queue.deadline().is_some() {
                self.dispatch_buffered();
            }
            self.publish_counters();
            self.release_idle_waiters();
        }

        self.shutdown();
    }

    fn handle_command(&mut self, command: Command<E>) {
        match command {
            Command::Queue {
                element,
                check,
                collect_usages,
            } => self.queue_update(element, check, collect_usages),
            Command::Remove(element) => self.remove_element(element),
            Command::RecheckElementsWithErrors => self.recheck_elements_with_errors(),
            Command::ClearCaches => self.clear_caches(),
            Command::Stop => self.stop(),
            Command::Reset => self.reset(),
            Command::WaitIdle { flush, reply } => {
                self.idle_waiters.push(reply);
                self.flushing |= flush;
            }
            // Handled by the run loop.
            Command::Dispose => {}
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn queue_update(&mut self, element: E, check: bool, collect_usages: bool) {
        let seq = self.next_seq();
        let mut notify = Notifications::new();
        self.shared
            .state
            .write()
            .note_request(&element, collect_usages, seq, &mut notify);
        self.queue.queue(
            UpdateRequest::new(element, check, collect_usages, seq),
            Instant::now(),
        );
        self.emit(notify);
    }

    fn remove_element(&mut self, element: E) {
        self.queue.remove(&element);
        let mut notify = Notifications::new();
        self.shared
            .state
            .write()
            .remove_element(&element, self.seq, &self.chain, &mut notify);
        trace!("[ANALYZER:{}] removed {:?}", self.name, element);
        self.emit(notify);
    }

    fn recheck_elements_with_errors(&mut self) {
        let mut notify = Notifications::new();
        let elements = self
            .shared
            .state
            .write()
            .take_elements_with_problems(&mut notify);
        debug!(
            "[ANALYZER:{}] re-checking {} elements with problems",
            self.name,
            elements.len()
        );
        self.emit(notify);

        for element in elements {
            self.queue_update(element, true, false);
        }
    }

    fn clear_caches(&mut self) {
        self.epoch += 1;
        self.queue.cancel_all();
        let mut notify = Notifications::new();
        {
            let mut state = self.shared.state.write();
            state.take_elements_with_problems(&mut notify);
            state.clear();
        }
        debug!("[ANALYZER:{}] caches cleared", self.name);
        self.emit(notify);
    }

    fn stop(&mut self) {
        self.token.cancel();
        self.queue.cancel_all();
        self.queue.deactivate();
        self.stopped = true;

        // Requests buffered while stopped left bookkeeping behind; drop it too.
        let mut notify = Notifications::new();
        {
            let mut state = self.shared.state.write();
            state.take_elements_with_problems(&mut notify);
            state.clear();
        }
        debug!(
            "[ANALYZER:{}] stopped with {} updates in flight",
            self.name, self.in_flight
        );
        self.emit(notify);
    }

    fn reset(&mut self) {
        if !self.stopped {
            trace!("[ANALYZER:{}] reset ignored: already active", self.name);
            return;
        }
        self.stopped = false;
        self.epoch += 1;
        self.token = CancellationToken::new();
        *self.shared.session.lock() = self.token.clone();
        self.queue.activate(Instant::now());
        debug!("[ANALYZER:{}] reset, epoch {}", self.name, self.epoch);
    }

    fn dispatch_buffered(&mut self) {
        if !self.queue.is_active() {
            return;
        }
        let batch = self.queue.take_all();
        if batch.is_empty() {
            return;
        }
        debug!("[ANALYZER:{}] dispatching {} updates", self.name, batch.len());

        for request in batch {
            self.in_flight += 1;
            let job = Job {
                request,
                epoch: self.epoch,
                token: self.token.clone(),
                source: Arc::clone(&self.source),
                chain: Arc::clone(&self.chain),
            };
            worker::spawn(job, self.results_tx.clone());
        }
    }

    fn apply_outcome(&mut self, outcome: WorkerOutcome<E>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        if outcome.epoch != self.epoch || self.token.is_cancelled() {
            trace!(
                "[ANALYZER:{}] discarding result for {:?} from epoch {}",
                self.name, outcome.element, outcome.epoch
            );
            return;
        }

        let WorkerOutcome {
            element,
            seq,
            check,
            usages,
            ..
        } = outcome;
        let mut notify = Notifications::new();
        {
            let mut state = self.shared.state.write();
            if let Some(Computation::Done(holder)) = check {
                state.apply_check(&element, holder, seq, &mut notify);
            }
            match usages {
                Some(Computation::Done(edges)) => {
                    state.apply_usages(&element, edges, seq, &self.chain, &mut notify);
                }
                Some(Computation::Failed) => {
                    state.abandon_usages(&element, seq, &self.chain, &mut notify);
                }
                Some(Computation::Cancelled) | None => {}
            }
        }
        self.emit(notify);
    }

    fn emit(&self, notify: Notifications<E>) {
        for element in &notify {
            self.shared.listeners.emit(element);
        }
    }

    fn is_idle(&self) -> bool {
        self.in_flight == 0 && (self.queue.is_empty() || !self.queue.is_active())
    }

    fn publish_counters(&self) {
        self.shared.buffered.store(self.queue.len(), Ordering::Relaxed);
        self.shared.in_flight.store(self.in_flight, Ordering::Relaxed);
    }

    fn release_idle_waiters(&mut self) {
        if self.idle_waiters.is_empty() || !self.is_idle() || !self.commands.is_empty() {
            return;
        }
        self.flushing = false;
        for waiter in self.idle_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }

    fn shutdown(&mut self) {
        self.token.cancel();
        self.queue.cancel_all();
        self.queue.deactivate();
        self.shared.state.write().clear();
        self.idle_waiters.clear();
        self.publish_counters();
        debug!("[ANALYZER:{}] disposed", self.name);
    }
}
