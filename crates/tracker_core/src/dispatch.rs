//! Fire-and-forget background dispatcher.
//!
//! # Responsibility
//! - Accept units of work from request handlers without blocking them.
//! - Run each unit off the request path on the blocking thread pool.
//! - Report unit outcomes through logs only.
//!
//! # Invariants
//! - `schedule` never waits on a unit's body.
//! - A unit moves Pending → Done exactly once, whatever its outcome.
//! - No ordering across units, no retries, no persistence.
//! - Shutdown drains units already accepted; an aborted runtime may lose them.

use crate::mail::TransportError;
use log::{debug, error, info};
use std::fmt::{Display, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use uuid::Uuid;

/// Correlation id assigned to each scheduled unit.
pub type JobId = Uuid;

pub type WorkResult = Result<(), WorkError>;

/// Failure raised inside a unit of work. Never reaches the scheduling caller.
#[derive(Debug, Error)]
pub enum WorkError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Failed(String),
}

impl WorkError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport_failure",
            Self::Failed(_) => "work_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("background dispatcher is closed")]
    Closed,
}

/// Lifecycle of a scheduled unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Captured, not yet run.
    Pending,
    /// Ran, regardless of outcome.
    Done,
}

impl JobState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

impl Display for JobState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deferred side effect with its arguments already captured.
pub trait UnitOfWork: Send + 'static {
    /// Short stable name used in log lines.
    fn name(&self) -> &'static str;
    fn run(self: Box<Self>) -> WorkResult;
}

struct FnUnit<F> {
    name: &'static str,
    work: F,
}

impl<F> UnitOfWork for FnUnit<F>
where
    F: FnOnce() -> WorkResult + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(self: Box<Self>) -> WorkResult {
        (self.work)()
    }
}

struct Envelope {
    id: JobId,
    unit: Box<dyn UnitOfWork>,
}

#[derive(Debug, Default)]
struct Counters {
    scheduled: AtomicU64,
    done: AtomicU64,
}

/// Snapshot of dispatcher progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherStats {
    pub scheduled: u64,
    pub done: u64,
}

impl DispatcherStats {
    pub fn pending(&self) -> u64 {
        self.scheduled.saturating_sub(self.done)
    }
}

/// Cloneable scheduling handle given to request handlers.
#[derive(Clone)]
pub struct DispatcherHandle {
    tx: mpsc::UnboundedSender<Envelope>,
    counters: Arc<Counters>,
}

impl DispatcherHandle {
    /// Schedules a closure as a named unit of work.
    pub fn schedule<F>(&self, name: &'static str, work: F) -> Result<JobId, DispatchError>
    where
        F: FnOnce() -> WorkResult + Send + 'static,
    {
        self.schedule_unit(Box::new(FnUnit { name, work }))
    }

    /// Schedules a boxed unit of work. Returns as soon as the unit is queued.
    pub fn schedule_unit(&self, unit: Box<dyn UnitOfWork>) -> Result<JobId, DispatchError> {
        let id = Uuid::new_v4();
        let name = unit.name();

        self.counters.scheduled.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(Envelope { id, unit }).is_err() {
            self.counters.scheduled.fetch_sub(1, Ordering::SeqCst);
            debug!("event=job_scheduled module=dispatch status=error job={name} error_code=dispatcher_closed");
            return Err(DispatchError::Closed);
        }

        debug!(
            "event=job_scheduled module=dispatch status=ok job_id={id} job={name} state={}",
            JobState::Pending
        );
        Ok(id)
    }

    pub fn stats(&self) -> DispatcherStats {
        DispatcherStats {
            scheduled: self.counters.scheduled.load(Ordering::SeqCst),
            done: self.counters.done.load(Ordering::SeqCst),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owner of the dispatcher worker.
///
/// Dropping it without [`Dispatcher::shutdown`] stops intake as well, but
/// does not wait for in-flight units.
pub struct Dispatcher {
    handle: DispatcherHandle,
    shutdown_tx: oneshot::Sender<()>,
    worker: JoinHandle<()>,
}

impl Dispatcher {
    /// Starts the worker on the current Tokio runtime.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn start() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let counters = Arc::new(Counters::default());
        let worker = tokio::spawn(run_worker(rx, shutdown_rx, Arc::clone(&counters)));
        info!("event=dispatcher_start module=dispatch status=ok");

        Self {
            handle: DispatcherHandle { tx, counters },
            shutdown_tx,
            worker,
        }
    }

    pub fn handle(&self) -> DispatcherHandle {
        self.handle.clone()
    }

    /// Stops intake and waits for every unit already accepted to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(err) = self.worker.await {
            error!("event=dispatcher_stop module=dispatch status=error error={err}");
        }
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Envelope>,
    mut shutdown_rx: oneshot::Receiver<()>,
    counters: Arc<Counters>,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(envelope) => spawn_unit(&mut in_flight, envelope, &counters),
                None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                log_join_failure(joined);
            }
            _ = &mut shutdown_rx => break,
        }
    }

    rx.close();
    while let Ok(envelope) = rx.try_recv() {
        spawn_unit(&mut in_flight, envelope, &counters);
    }
    while let Some(joined) = in_flight.join_next().await {
        log_join_failure(joined);
    }

    let done = counters.done.load(Ordering::SeqCst);
    info!("event=dispatcher_stop module=dispatch status=ok done={done}");
}

fn spawn_unit(in_flight: &mut JoinSet<()>, envelope: Envelope, counters: &Arc<Counters>) {
    let counters = Arc::clone(counters);
    in_flight.spawn_blocking(move || execute_unit(envelope, &counters));
}

fn execute_unit(envelope: Envelope, counters: &Counters) {
    let Envelope { id, unit } = envelope;
    let name = unit.name();
    let started_at = Instant::now();

    let outcome = panic::catch_unwind(AssertUnwindSafe(move || unit.run()));
    let duration_ms = started_at.elapsed().as_millis();
    let state = JobState::Done;
    match outcome {
        Ok(Ok(())) => info!(
            "event=job_done module=dispatch status=ok job_id={id} job={name} state={state} duration_ms={duration_ms}"
        ),
        Ok(Err(err)) => error!(
            "event=job_done module=dispatch status=error job_id={id} job={name} state={state} duration_ms={duration_ms} error_code={} error={err}",
            err.code()
        ),
        Err(_) => error!(
            "event=job_done module=dispatch status=error job_id={id} job={name} state={state} duration_ms={duration_ms} error_code=job_panicked"
        ),
    }

    counters.done.fetch_add(1, Ordering::SeqCst);
}

fn log_join_failure(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        error!("event=job_join module=dispatch status=error error={err}");
    }
}

#[cfg(test)]
mod tests {
    use super::{DispatcherStats, FnUnit, JobState, UnitOfWork, WorkError};

    #[test]
    fn pending_is_scheduled_minus_done() {
        let stats = DispatcherStats {
            scheduled: 5,
            done: 3,
        };
        assert_eq!(stats.pending(), 2);
    }

    #[test]
    fn job_states_render_as_log_values() {
        assert_eq!(JobState::Pending.to_string(), "pending");
        assert_eq!(format!("state={}", JobState::Done), "state=done");
    }

    #[test]
    fn closure_unit_reports_name_and_result() {
        let unit = Box::new(FnUnit {
            name: "closure",
            work: || Err(WorkError::Failed("boom".to_string())),
        });
        assert_eq!(unit.name(), "closure");
        let err = unit.run().unwrap_err();
        assert_eq!(err.code(), "work_failed");
    }
}
