//! Worker tasks: run strategies off the serialization task.
//!
//! A worker takes one snapshot of the model and runs the requested check
//! and/or usage collection against it on tokio's blocking pool. It never
//! touches shared state; the outcome is sent back to the dispatcher, which
//! decides whether it is still wanted.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::base::{SnapshotSource, StructuralElement, UsageEdge};
use crate::problems::ProblemsHolder;

use super::{UpdateRequest, ValidatorChain};

/// Result of one strategy invocation.
#[derive(Debug)]
pub(crate) enum Computation<T> {
    Done(T),
    /// The strategy returned an error or panicked; keep the previous state.
    Failed,
    /// The session was stopped before the strategy ran.
    Cancelled,
}

impl<T> Computation<T> {
    fn failed_if(requested: bool) -> Option<Self> {
        requested.then_some(Computation::Failed)
    }
}

/// Everything a worker needs, detached from the dispatcher.
pub(crate) struct Job<E: StructuralElement> {
    pub request: UpdateRequest<E>,
    pub epoch: u64,
    pub token: CancellationToken,
    pub source: Arc<dyn SnapshotSource<E::Model>>,
    pub chain: Arc<ValidatorChain<E>>,
}

#[derive(Debug)]
pub(crate) struct WorkerOutcome<E: StructuralElement> {
    pub element: E,
    pub seq: u64,
    pub epoch: u64,
    pub check: Option<Computation<ProblemsHolder<E>>>,
    pub usages: Option<Computation<Vec<UsageEdge<E>>>>,
}

/// Run `job` on the blocking pool and report back on `results`.
///
/// Exactly one outcome is sent per job, even when the strategy panics.
pub(crate) fn spawn<E: StructuralElement>(job: Job<E>, results: UnboundedSender<WorkerOutcome<E>>) {
    let element = job.request.element.clone();
    let seq = job.request.seq;
    let epoch = job.epoch;
    let (check, collect_usages) = (job.request.check, job.request.collect_usages);

    tokio::spawn(async move {
        let outcome = match tokio::task::spawn_blocking(move || run(job)).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("[WORKER] update of {:?} aborted: {}", element, err);
                WorkerOutcome {
                    element,
                    seq,
                    epoch,
                    check: Computation::failed_if(check),
                    usages: Computation::failed_if(collect_usages),
                }
            }
        };
        // The dispatcher is gone after dispose; nobody wants the outcome.
        let _ = results.send(outcome);
    });
}

fn run<E: StructuralElement>(job: Job<E>) -> WorkerOutcome<E> {
    let Job {
        request,
        epoch,
        token,
        source,
        chain,
    } = job;
    let element = request.element;

    if token.is_cancelled() {
        return WorkerOutcome {
            check: request.check.then_some(Computation::Cancelled),
            usages: request.collect_usages.then_some(Computation::Cancelled),
            element,
            seq: request.seq,
            epoch,
        };
    }

    let model = source.snapshot();

    let check = request.check.then(|| {
        let mut problems = ProblemsHolder::new();
        match chain.check(&element, &model, &mut problems) {
            Ok(()) => Computation::Done(problems),
            Err(err) => {
                warn!("[WORKER] check of {:?} failed: {}", element, err);
                Computation::Failed
            }
        }
    });

    let usages = request.collect_usages.then(|| {
        if token.is_cancelled() {
            return Computation::Cancelled;
        }
        match chain.collect_usages(&element, &model) {
            Ok(edges) => Computation::Done(edges),
            Err(err) => {
                warn!("[WORKER] usage collection of {:?} failed: {}", element, err);
                Computation::Failed
            }
        }
    });

    WorkerOutcome {
        element,
        seq: request.seq,
        epoch,
        check,
        usages,
    }
}
