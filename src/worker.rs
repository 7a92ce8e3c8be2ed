//! Isolated execution contexts for generation jobs.
//!
//! A [`Worker`] owns a dedicated thread. Requests go in through a bounded
//! queue; each accepted job answers on its own channel with zero or more
//! progress events followed by exactly one terminal event. The pixel buffer
//! is moved through the channel, never shared.
//!
//! There is no cancellation. Dropping a worker abandons it: the thread exits
//! once its current job is done.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{Result, VizError};
use crate::render;
use crate::types::{GenerationRequest, GenerationResult};

/// How long the split view waits on one side before checking the other.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A message from a worker about one job.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Percentage complete, non-decreasing within a job.
    Progress(f64),
    /// The job's single terminal outcome.
    Finished(Result<GenerationResult>),
}

impl WorkerEvent {
    /// JSON form of the event, without the pixel buffer.
    pub fn to_message(&self) -> Value {
        match self {
            WorkerEvent::Progress(progress) => json!({ "type": "progress", "progress": progress }),
            WorkerEvent::Finished(outcome) => outcome_message(outcome),
        }
    }
}

/// JSON form of a job's terminal outcome, without the pixel buffer.
pub fn outcome_message(outcome: &Result<GenerationResult>) -> Value {
    match outcome {
        Ok(result) => {
            let mut message = json!({ "success": true });
            if let (Value::Object(fields), Ok(Value::Object(body))) =
                (&mut message, serde_json::to_value(result))
            {
                fields.extend(body);
            }
            message
        }
        Err(e) => json!({ "success": false, "error": e.to_string() }),
    }
}

struct Job {
    request: GenerationRequest,
    events: Sender<WorkerEvent>,
}

/// A single-job execution context backed by its own thread.
pub struct Worker {
    name: String,
    jobs: Option<SyncSender<Job>>,
    busy: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start a worker thread.
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (jobs_tx, jobs_rx) = mpsc::sync_channel::<Job>(1);
        let busy = Arc::new(AtomicBool::new(false));

        let thread = {
            let name = name.clone();
            let busy = Arc::clone(&busy);
            thread::Builder::new()
                .name(format!("bitviz-{}", name))
                .spawn(move || run_jobs(&name, jobs_rx, &busy))?
        };

        Ok(Self {
            name,
            jobs: Some(jobs_tx),
            busy,
            thread: Some(thread),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a job is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Hand a request to the worker.
    ///
    /// Fails with [`VizError::Busy`] while another job is in flight.
    pub fn submit(&self, request: GenerationRequest) -> Result<JobHandle> {
        let jobs = self.jobs.as_ref().ok_or(VizError::WorkerGone)?;
        if self.thread.as_ref().map_or(true, |t| t.is_finished()) {
            return Err(VizError::WorkerGone);
        }

        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(VizError::Busy);
        }

        let (events_tx, events_rx) = mpsc::channel();
        let job = Job {
            request,
            events: events_tx,
        };

        match jobs.try_send(job) {
            Ok(()) => {
                debug!(worker = %self.name, "job submitted");
                Ok(JobHandle { events: events_rx })
            }
            Err(TrySendError::Full(_)) => {
                self.busy.store(false, Ordering::Release);
                Err(VizError::Busy)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.busy.store(false, Ordering::Release);
                Err(VizError::WorkerGone)
            }
        }
    }

    /// Close the queue and wait for the thread to exit.
    pub fn shutdown(mut self) -> Result<()> {
        self.jobs.take();
        if let Some(thread) = self.thread.take() {
            thread.join().map_err(|_| VizError::WorkerGone)?;
        }
        Ok(())
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the queue lets the thread exit after its current job.
        self.jobs.take();
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("busy", &self.is_busy())
            .finish()
    }
}

fn run_jobs(name: &str, jobs: Receiver<Job>, busy: &AtomicBool) {
    debug!(worker = name, "worker thread starting");

    for Job { request, events } in jobs.iter() {
        let idle = IdleOnDrop(busy);
        let outcome = render::generate(&request, &mut |progress: f64| {
            // The caller may have stopped listening; keep generating regardless
            let _ = events.send(WorkerEvent::Progress(progress));
        });

        match &outcome {
            Ok(_) => debug!(worker = name, "job finished"),
            Err(e) => info!(worker = name, error = %e, "job rejected"),
        }

        // Idle before the terminal event, so the caller can resubmit on receipt
        drop(idle);
        if events.send(WorkerEvent::Finished(outcome)).is_err() {
            warn!(worker = name, "job result dropped: caller went away");
        }
    }

    debug!(worker = name, "job queue closed, worker thread exiting");
}

/// Clears the busy flag when a job ends, including by panic.
struct IdleOnDrop<'a>(&'a AtomicBool);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The caller's end of one submitted job.
#[derive(Debug)]
pub struct JobHandle {
    events: Receiver<WorkerEvent>,
}

impl JobHandle {
    /// Block for the next event. `None` once the job's channel is closed.
    pub fn recv(&self) -> Option<WorkerEvent> {
        self.events.recv().ok()
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` on timeout; `Err(WorkerGone)` if the worker died.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerEvent>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(VizError::WorkerGone),
        }
    }

    /// Wait for the terminal event, discarding progress.
    pub fn wait(self) -> Result<GenerationResult> {
        self.wait_with_progress(|_| {})
    }

    /// Wait for the terminal event, forwarding progress to `on_progress`.
    pub fn wait_with_progress(self, mut on_progress: impl FnMut(f64)) -> Result<GenerationResult> {
        for event in self.events.iter() {
            match event {
                WorkerEvent::Progress(progress) => on_progress(progress),
                WorkerEvent::Finished(outcome) => return outcome,
            }
        }
        Err(VizError::WorkerGone)
    }
}

/// Which half of a split view an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Outcomes of both halves of a split view.
#[derive(Debug)]
pub struct SplitOutcome {
    pub left: Result<GenerationResult>,
    pub right: Result<GenerationResult>,
}

/// Two fully independent workers generating side by side.
#[derive(Debug)]
pub struct SplitView {
    left: Worker,
    right: Worker,
}

impl SplitView {
    pub fn new() -> Result<Self> {
        Ok(Self {
            left: Worker::spawn("left")?,
            right: Worker::spawn("right")?,
        })
    }

    pub fn worker(&self, side: Side) -> &Worker {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Generate both images in parallel.
    pub fn run(&self, left: GenerationRequest, right: GenerationRequest) -> Result<SplitOutcome> {
        self.run_with_progress(left, right, |_, _| {})
    }

    /// Generate both images in parallel, reporting progress per side.
    pub fn run_with_progress(
        &self,
        left: GenerationRequest,
        right: GenerationRequest,
        mut on_progress: impl FnMut(Side, f64),
    ) -> Result<SplitOutcome> {
        let handles = [
            (Side::Left, self.left.submit(left)?),
            (Side::Right, self.right.submit(right)?),
        ];
        let mut outcomes: [Option<Result<GenerationResult>>; 2] = [None, None];

        while outcomes.iter().any(Option::is_none) {
            for (slot, (side, handle)) in outcomes.iter_mut().zip(&handles) {
                if slot.is_some() {
                    continue;
                }
                match handle.recv_timeout(POLL_INTERVAL) {
                    Ok(Some(WorkerEvent::Progress(progress))) => on_progress(*side, progress),
                    Ok(Some(WorkerEvent::Finished(outcome))) => *slot = Some(outcome),
                    Ok(None) => {}
                    Err(e) => *slot = Some(Err(e)),
                }
            }
        }

        let [left, right] = outcomes;
        Ok(SplitOutcome {
            left: left.unwrap_or(Err(VizError::WorkerGone)),
            right: right.unwrap_or(Err(VizError::WorkerGone)),
        })
    }
}
