use crate::errors::CollisionError;
use crate::scheduling::{chunk_range, Dispatcher};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// [`Dispatcher`] backed by a dedicated rayon pool, using the same
/// contiguous chunk split as [`crate::scheduling::WorkerPool`].
pub struct RayonDispatcher {
    pool: ThreadPool,
    workers: usize,
}

impl RayonDispatcher {
    pub fn new(workers: usize) -> Result<Self, CollisionError> {
        if workers == 0 {
            return Err(CollisionError::InvalidWorkerCount);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rs-collide-rayon-{}", i))
            .build()
            .map_err(|e| CollisionError::ThreadSpawn(e.to_string()))?;
        Ok(RayonDispatcher { pool, workers })
    }
}

unsafe impl Dispatcher for RayonDispatcher {
    fn thread_count(&self) -> usize {
        self.workers
    }

    fn dispatch(&mut self, count: usize, task: &(dyn Fn(usize) + Sync)) {
        if count == 0 {
            return;
        }
        let workers = self.workers;
        self.pool.install(|| {
            (0..workers).into_par_iter().for_each(|worker| {
                for index in chunk_range(worker, workers, count) {
                    task(index);
                }
            })
        });
    }
}
