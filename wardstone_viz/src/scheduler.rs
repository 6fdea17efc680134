// Deferred-task scheduler for the glow layer.
//
// Architecture: a single background thread draining an `mpsc` channel into
// a min-heap of `(due, sequence, job)` entries and running each job when
// its time comes. Jobs own every piece of data they need — a scheduled job
// never holds a live reference into engine state; anything shared goes
// through an `Arc<Mutex<_>>` the job carries.
//
// `SchedulerHandle` is the cheap, cloneable submission side. Jobs may
// schedule follow-ups through a handle they captured (the leak guard does
// exactly that). `wait_idle` blocks until every submitted job has run,
// which is how tests join deferred work without sleeping.
//
// Delays are expressed in ticks; one tick is `tick_duration_ms` from the
// config. Sequence numbers break ties between jobs due at the same
// instant, preserving submission order.
//
// Shutdown is cooperative: `stop()` flips the keep-running flag and joins
// the thread. Jobs still queued at shutdown are dropped unexecuted; every
// job in this engine is an idempotent cleanup or creation step, checked
// for staleness at execution time, so dropping is safe.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Idle poll interval when the heap is empty.
const IDLE_POLL: Duration = Duration::from_millis(50);

struct DeferredTask {
    due: Instant,
    sequence: u64,
    job: Box<dyn FnOnce() + Send>,
}

// Min-heap on (due, sequence): Rust's BinaryHeap is a max-heap, so the
// ordering is reversed. Equality ignores the job.
impl PartialEq for DeferredTask {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl Eq for DeferredTask {}

impl PartialOrd for DeferredTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeferredTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

struct SchedulerShared {
    pending: Mutex<usize>,
    idle: Condvar,
    keep_running: AtomicBool,
    next_sequence: AtomicU64,
    tick_duration: Duration,
}

/// Cloneable submission handle to the scheduler thread.
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: Sender<DeferredTask>,
    shared: Arc<SchedulerShared>,
}

impl SchedulerHandle {
    /// Run `job` after `delay_ticks` scheduler ticks. Jobs submitted for
    /// the same instant run in submission order.
    pub fn run_later(&self, delay_ticks: u64, job: impl FnOnce() + Send + 'static) {
        let due = Instant::now() + self.shared.tick_duration * delay_ticks as u32;
        let sequence = self.shared.next_sequence.fetch_add(1, AtomicOrdering::SeqCst);

        *self.shared.pending.lock().expect("scheduler pending poisoned") += 1;
        let task = DeferredTask {
            due,
            sequence,
            job: Box::new(job),
        };
        if self.tx.send(task).is_err() {
            // Scheduler already stopped; the job will never run.
            let mut pending = self.shared.pending.lock().expect("scheduler pending poisoned");
            *pending -= 1;
            self.shared.idle.notify_all();
            log::debug!("deferred job submitted after scheduler shutdown, dropped");
        }
    }

    /// Block until every submitted job has executed, or the timeout passes.
    /// Returns `true` if the scheduler went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.shared.pending.lock().expect("scheduler pending poisoned");
        while *pending > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .shared
                .idle
                .wait_timeout(pending, deadline - now)
                .expect("scheduler pending poisoned");
            pending = guard;
        }
        true
    }
}

/// Owner of the scheduler thread. Dropping without `stop()` detaches the
/// thread; it exits on its own once the last handle is dropped.
pub struct Scheduler {
    handle: SchedulerHandle,
    shared: Arc<SchedulerShared>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Scheduler {
    /// Start the scheduler thread with the given tick length.
    pub fn start(tick_duration: Duration) -> Self {
        let shared = Arc::new(SchedulerShared {
            pending: Mutex::new(0),
            idle: Condvar::new(),
            keep_running: AtomicBool::new(true),
            next_sequence: AtomicU64::new(0),
            tick_duration,
        });
        let (tx, rx) = mpsc::channel();

        let shared_thread = shared.clone();
        let thread = thread::spawn(move || run_scheduler(rx, shared_thread));

        Self {
            handle: SchedulerHandle { tx, shared: shared.clone() },
            shared,
            thread: Some(thread),
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Signal the thread to stop and wait for it to shut down. Queued jobs
    /// that have not run yet are dropped.
    pub fn stop(mut self) {
        self.shared.keep_running.store(false, AtomicOrdering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Scheduler loop: collect submissions into the heap, run due jobs in
/// `(due, sequence)` order.
fn run_scheduler(rx: Receiver<DeferredTask>, shared: Arc<SchedulerShared>) {
    let mut heap: BinaryHeap<DeferredTask> = BinaryHeap::new();

    while shared.keep_running.load(AtomicOrdering::SeqCst) {
        let timeout = heap
            .peek()
            .map(|task| task.due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        match rx.recv_timeout(timeout) {
            Ok(task) => heap.push(task),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        // Drain anything else that arrived while handling.
        while let Ok(task) = rx.try_recv() {
            heap.push(task);
        }

        while heap
            .peek()
            .is_some_and(|task| task.due <= Instant::now())
        {
            let task = heap.pop().expect("peeked task vanished");
            (task.job)();
            let mut pending = shared.pending.lock().expect("scheduler pending poisoned");
            *pending -= 1;
            shared.idle.notify_all();
        }
    }

    // Account for jobs dropped unexecuted so late waiters are released.
    if !heap.is_empty() {
        let mut pending = shared.pending.lock().expect("scheduler pending poisoned");
        *pending -= heap.len();
        shared.idle.notify_all();
    }
}
