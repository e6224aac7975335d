use crate::errors::CollisionError;
use crate::scheduling::{chunk_range, Dispatcher};
use log::{debug, error, warn};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

/// Lifecycle of a [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    /// Threads are being spawned.
    Uninitialized,
    /// Idle and accepting work.
    Ready,
    /// A dispatch is in flight.
    Busy,
    /// Workers have been told to exit.
    ShuttingDown,
    /// All workers joined.
    Stopped,
}

type Task = dyn Fn(usize) + Sync + 'static;

#[derive(Clone, Copy)]
struct Job {
    task: *const Task,
    count: usize,
}

// The pointee is Sync and outlives every worker's use of it (see `dispatch`).
unsafe impl Send for Job {}

struct PoolState {
    status: PoolStatus,
    generation: u64,
    job: Option<Job>,
    pending: usize,
    started: usize,
}

struct Shared {
    state: Mutex<PoolState>,
    work_available: Condvar,
    work_finished: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fixed set of long-lived worker threads fed one dispatch at a time.
///
/// Worker `i` owns the contiguous chunk [`chunk_range`]`(i, workers, count)`
/// of every dispatch, so the split is deterministic. A panic inside a task
/// aborts the process.
pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
    worker_count: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, CollisionError> {
        if workers == 0 {
            return Err(CollisionError::InvalidWorkerCount);
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                status: PoolStatus::Uninitialized,
                generation: 0,
                job: None,
                pending: 0,
                started: 0,
            }),
            work_available: Condvar::new(),
            work_finished: Condvar::new(),
        });

        let mut pool = WorkerPool {
            shared,
            handles: Vec::with_capacity(workers),
            worker_count: workers,
        };

        for worker in 0..workers {
            let shared = Arc::clone(&pool.shared);
            let spawned = thread::Builder::new()
                .name(format!("rs-collide-worker-{}", worker))
                .spawn(move || worker_loop(shared, worker, workers));
            match spawned {
                Ok(handle) => pool.handles.push(handle),
                Err(e) => {
                    error!("Failed to spawn worker {} of {}: {}", worker, workers, e);
                    pool.shutdown();
                    return Err(CollisionError::ThreadSpawn(e.to_string()));
                }
            }
        }

        let mut state = pool.shared.lock();
        while state.started < workers {
            state = pool
                .shared
                .work_finished
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.status = PoolStatus::Ready;
        drop(state);

        debug!("Worker pool ready with {} threads", workers);
        Ok(pool)
    }

    /// One worker per hardware thread, leaving one for the caller.
    pub fn with_available_parallelism() -> Result<Self, CollisionError> {
        let hardware = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(hardware.saturating_sub(1).max(1))
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn status(&self) -> PoolStatus {
        self.shared.lock().status
    }

    /// Status reader that can be moved into tasks or other threads.
    pub fn status_handle(&self) -> StatusHandle {
        StatusHandle { shared: Arc::clone(&self.shared) }
    }

    /// Signals every worker to exit and joins them. Returns how many were
    /// joined; a second call joins none.
    pub fn shutdown(&mut self) -> usize {
        if self.handles.is_empty() {
            return 0;
        }

        {
            let mut state = self.shared.lock();
            state.status = PoolStatus::ShuttingDown;
            self.shared.work_available.notify_all();
        }

        let mut joined = 0;
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("A worker thread ended with a panic during shutdown");
            }
            joined += 1;
        }

        self.shared.lock().status = PoolStatus::Stopped;
        debug!("Worker pool stopped, joined {} threads", joined);
        joined
    }
}

unsafe impl Dispatcher for WorkerPool {
    fn thread_count(&self) -> usize {
        self.worker_count
    }

    fn dispatch(&mut self, count: usize, task: &(dyn Fn(usize) + Sync)) {
        if count == 0 {
            return;
        }
        if self.handles.is_empty() {
            warn!("Dispatch of {} tasks on a stopped pool runs on the caller", count);
            for index in 0..count {
                task(index);
            }
            return;
        }

        // SAFETY: this call blocks until `pending` reaches zero, and every worker
        // drops its reference to the task before decrementing it.
        let task: &'static Task =
            unsafe { std::mem::transmute::<&(dyn Fn(usize) + Sync), &'static Task>(task) };

        let mut state = self.shared.lock();
        state.status = PoolStatus::Busy;
        state.generation = state.generation.wrapping_add(1);
        state.job = Some(Job {
            task: task as *const Task,
            count,
        });
        state.pending = self.worker_count;
        self.shared.work_available.notify_all();

        while state.pending > 0 {
            state = self
                .shared
                .work_finished
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.job = None;
        state.status = PoolStatus::Ready;
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker_count", &self.worker_count)
            .field("status", &self.status())
            .finish()
    }
}

/// Shared read access to a [`WorkerPool`]'s [`PoolStatus`].
#[derive(Clone)]
pub struct StatusHandle {
    shared: Arc<Shared>,
}

impl StatusHandle {
    pub fn status(&self) -> PoolStatus {
        self.shared.lock().status
    }
}

fn worker_loop(shared: Arc<Shared>, worker: usize, workers: usize) {
    let mut seen_generation = 0;
    {
        let mut state = shared.lock();
        state.started += 1;
        shared.work_finished.notify_all();
    }

    loop {
        let job = {
            let mut state = shared.lock();
            loop {
                if state.status == PoolStatus::ShuttingDown {
                    return;
                }
                if state.generation != seen_generation {
                    if let Some(job) = state.job {
                        seen_generation = state.generation;
                        break job;
                    }
                }
                state = shared
                    .work_available
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        };

        {
            // SAFETY: the dispatcher keeps the task alive until this worker reports back.
            let task = unsafe { &*job.task };
            for index in chunk_range(worker, workers, job.count) {
                if catch_unwind(AssertUnwindSafe(|| task(index))).is_err() {
                    error!("Task {} panicked on worker {}; aborting", index, worker);
                    std::process::abort();
                }
            }
        }

        let mut state = shared.lock();
        state.pending -= 1;
        if state.pending == 0 {
            shared.work_finished.notify_all();
        }
    }
}
