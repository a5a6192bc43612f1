//! Concurrent enumeration-and-hashing pipeline.

use std::{
    collections::HashMap,
    mem,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, OnceLock,
    },
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, Receiver, Sender};
use num_bigint::BigUint;
use tracing::{debug, info};

use crate::{
    error::{BruteError, BruteResult},
    event::{Event, TableHandle},
    hash::HashEngine,
    writer, TableCtx,
};

/// Number of candidates per work batch.
const BATCH_SIZE: usize = 1024;

/// Minimum interval between two progress events.
const REPORT_INTERVAL: Duration = Duration::from_millis(100);

/// A matched target digest and the plaintext producing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub digest: String,
    pub plaintext: String,
}

/// What a table computation should do with each digest.
///
/// Exactly one of `output` and `target` may be set: an output destination
/// selects build mode, a target digest selects search mode, and neither is a
/// counting-only run.
#[derive(Clone, Debug, Default)]
pub struct TableRequest {
    pub output: Option<PathBuf>,
    pub overwrite: bool,
    pub target: Option<String>,
}

impl TableRequest {
    /// A build-mode request writing the full table to `output`.
    pub fn build(output: impl Into<PathBuf>) -> Self {
        Self {
            output: Some(output.into()),
            ..Self::default()
        }
    }

    /// A search-mode request stopping at the first candidate hashing to `target`.
    pub fn search(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// A counting-only request: hash the whole space, store nothing.
    pub fn count() -> Self {
        Self::default()
    }

    /// Allows replacing an existing output file.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;

        self
    }
}

/// The outcome of one table computation.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Candidates actually hashed.
    pub processed: u64,
    /// Theoretical size of the candidate space.
    pub total: BigUint,
    /// Entries committed to the table (build mode only).
    pub table_entries: usize,
    /// The match, if a target digest was supplied and found.
    pub hit: Option<SearchHit>,
    /// True when the run was stopped before exhausting the space without
    /// finding a target. Partial results are still valid and reported.
    pub cancelled: bool,
    pub elapsed: Duration,
}

pub(crate) enum RunMode {
    Build,
    Search(String),
    Count,
}

enum Job {
    Batch(Vec<String>),
    Done,
}

/// Per-invocation shared state, created when a run starts and torn down when
/// it completes or is cancelled.
struct RunState {
    processed: AtomicU64,
    table: Mutex<HashMap<String, String>>,
    found: OnceLock<SearchHit>,
    last_report: Mutex<Instant>,
}

impl RunState {
    fn new() -> Self {
        Self {
            processed: AtomicU64::new(0),
            table: Mutex::new(HashMap::new()),
            found: OnceLock::new(),
            last_report: Mutex::new(Instant::now()),
        }
    }
}

pub(crate) struct PipelineRun {
    pub(crate) processed: u64,
    pub(crate) table: HashMap<String, String>,
    pub(crate) hit: Option<SearchHit>,
    pub(crate) stopped: bool,
}

/// Releases the reentrancy flag when a run finishes, however it finishes.
pub(crate) struct RunGuard {
    running: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

/// Drives a pool of worker threads over the candidate space.
///
/// The generator itself only holds the immutable parameters, the reentrancy
/// flag and the shared stop flag; everything mutated during a run lives in a
/// per-invocation [`RunState`]. A generator is not reentrant: overlapping
/// runs on the same instance fail with [`BruteError::AlreadyRunning`].
#[derive(Clone)]
pub struct Generator {
    ctx: TableCtx,
    running: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl Generator {
    pub fn new(ctx: TableCtx) -> Self {
        Self {
            ctx,
            running: Arc::new(AtomicBool::new(false)),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn ctx(&self) -> &TableCtx {
        &self.ctx
    }

    /// Requests cooperative cancellation of the run in progress.
    ///
    /// Workers and the producer observe the flag at candidate and batch
    /// granularity, drain their own loops and are joined normally; results
    /// already committed remain valid.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Computes the digest table, blocking until done.
    ///
    /// Build mode (output set) persists the full digest table; search mode
    /// (target set) halts at the first match; with neither, the space is
    /// hashed and counted only.
    pub fn compute_table(&self, request: TableRequest) -> BruteResult<RunSummary> {
        let guard = self.begin()?;

        self.run_table(request, None, guard)
    }

    /// Like [`Generator::compute_table`], but runs in a background thread and
    /// returns a handle delivering progress events.
    pub fn compute_table_with_events(&self, request: TableRequest) -> BruteResult<TableHandle> {
        // acquire the guard here so an overlapping call fails immediately
        let guard = self.begin()?;
        let (sender, receiver) = crossbeam_channel::unbounded();

        let this = self.clone();
        let handle = thread::spawn(move || this.run_table(request, Some(sender), guard));

        Ok(TableHandle { handle, receiver })
    }

    pub(crate) fn begin(&self) -> BruteResult<RunGuard> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BruteError::AlreadyRunning);
        }

        // a stop requested against a previous run does not leak into this one
        self.stop.store(false, Ordering::SeqCst);

        Ok(RunGuard {
            running: Arc::clone(&self.running),
        })
    }

    fn run_table(
        &self,
        request: TableRequest,
        events: Option<Sender<Event>>,
        _guard: RunGuard,
    ) -> BruteResult<RunSummary> {
        let mode = validate_request(&request)?;
        let total = self.ctx.total_combinations();
        let start = Instant::now();

        info!(
            algorithm = %self.ctx.algorithm,
            charset_len = self.ctx.charset.len(),
            min_length = self.ctx.min_length,
            max_length = self.ctx.max_length,
            threads = self.ctx.threads,
            %total,
            "starting table computation"
        );

        if let Some(events) = &events {
            let _ = events.send(Event::Started {
                total: total.clone(),
            });
        }

        let run = self.run_pipeline(&mode, events.as_ref());

        if let Some(events) = &events {
            let _ = events.send(Event::Finished {
                processed: run.processed,
            });
        }

        // partial tables from a cancelled build run are written as-is
        if let Some(path) = &request.output {
            writer::write_table(path, &run.table)?;
            info!(entries = run.table.len(), path = %path.display(), "table persisted");
        }

        Ok(RunSummary {
            processed: run.processed,
            total,
            table_entries: run.table.len(),
            cancelled: run.stopped && run.hit.is_none(),
            hit: run.hit,
            elapsed: start.elapsed(),
        })
    }

    /// Runs the producer/worker pipeline to completion or cancellation.
    pub(crate) fn run_pipeline(
        &self,
        mode: &RunMode,
        events: Option<&Sender<Event>>,
    ) -> PipelineRun {
        let threads = self.ctx.threads;
        let mut state = RunState::new();
        let (job_tx, job_rx) = bounded::<Job>(threads * 2);

        let ctx = &self.ctx;
        let stop: &AtomicBool = &self.stop;
        let state_ref = &state;

        thread::scope(|s| {
            for _ in 0..threads {
                let jobs = job_rx.clone();
                s.spawn(move || worker_loop(ctx, mode, state_ref, stop, events, jobs));
            }
            drop(job_rx);

            s.spawn(move || producer_loop(ctx, stop, threads, job_tx));
        });

        let processed = state.processed.load(Ordering::Relaxed);
        debug!(processed, "pipeline drained");

        PipelineRun {
            processed,
            table: state.table.into_inner().unwrap(),
            hit: state.found.take(),
            stopped: self.stop.load(Ordering::Relaxed),
        }
    }
}

fn validate_request(request: &TableRequest) -> BruteResult<RunMode> {
    match (&request.output, &request.target) {
        (Some(_), Some(_)) => Err(BruteError::AmbiguousRequest),
        (Some(path), None) => {
            // reject unwritable destinations before any thread is spawned
            writer::OutputFormat::from_path(path)?;
            if path.exists() && !request.overwrite {
                return Err(BruteError::OutputConflict(path.clone()));
            }

            Ok(RunMode::Build)
        }
        (None, Some(target)) => Ok(RunMode::Search(target.to_ascii_lowercase())),
        (None, None) => Ok(RunMode::Count),
    }
}

fn producer_loop(ctx: &TableCtx, stop: &AtomicBool, workers: usize, jobs: Sender<Job>) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    for candidate in ctx.enumerator() {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        batch.push(candidate);
        if batch.len() == BATCH_SIZE {
            let full = mem::replace(&mut batch, Vec::with_capacity(BATCH_SIZE));
            if jobs.send(Job::Batch(full)).is_err() {
                return;
            }
        }
    }

    if !batch.is_empty() && !stop.load(Ordering::Relaxed) {
        let _ = jobs.send(Job::Batch(batch));
    }

    // one sentinel per worker
    for _ in 0..workers {
        if jobs.send(Job::Done).is_err() {
            return;
        }
    }
}

fn worker_loop(
    ctx: &TableCtx,
    mode: &RunMode,
    state: &RunState,
    stop: &AtomicBool,
    events: Option<&Sender<Event>>,
    jobs: Receiver<Job>,
) {
    let mut engine = HashEngine::new(ctx.algorithm, &ctx.salt);

    while let Ok(job) = jobs.recv() {
        let batch = match job {
            Job::Batch(batch) => batch,
            Job::Done => break,
        };

        let mut hashed = 0u64;
        for candidate in batch {
            // abandon the rest of the batch as soon as the stop flag is up
            if stop.load(Ordering::Relaxed) {
                break;
            }

            let digest = engine.digest_hex(&candidate);
            hashed += 1;

            match mode {
                RunMode::Build => {
                    state.table.lock().unwrap().insert(digest, candidate);
                }
                RunMode::Search(target) => {
                    if digest == *target {
                        // first worker to set the slot wins the tie
                        let _ = state.found.set(SearchHit {
                            digest,
                            plaintext: candidate,
                        });
                        stop.store(true, Ordering::Relaxed);
                        break;
                    }
                }
                RunMode::Count => {}
            }
        }

        state.processed.fetch_add(hashed, Ordering::Relaxed);
        if let Some(events) = events {
            report_progress(events, state);
        }
    }
}

/// Emits a progress event at most once per [`REPORT_INTERVAL`], whichever
/// worker gets there first.
fn report_progress(events: &Sender<Event>, state: &RunState) {
    let Ok(mut last_report) = state.last_report.try_lock() else {
        return;
    };

    if last_report.elapsed() >= REPORT_INTERVAL {
        *last_report = Instant::now();
        // loaded under the lock so deliveries stay monotonic
        let processed = state.processed.load(Ordering::Relaxed);
        let _ = events.send(Event::Progress { processed });
    }
}
