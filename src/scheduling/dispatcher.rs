use std::mem::MaybeUninit;
use std::ops::Range;

/// Runs an index-addressed task over `[0, count)` and waits for all of it.
///
/// `dispatch` takes `&mut self`, so two dispatches can never overlap on the
/// same dispatcher. Per-call data travels in the task's captures.
///
/// # Safety
/// Implementors must call `task(index)` exactly once for every index in
/// `[0, count)` and return only after every call has finished, with all of
/// their effects visible to the caller. [`Dispatcher::dispatch_collect`]
/// writes into uninitialized slots relying on this.
pub unsafe trait Dispatcher {
    /// Number of threads the work is spread over.
    fn thread_count(&self) -> usize;

    fn dispatch(&mut self, count: usize, task: &(dyn Fn(usize) + Sync));

    /// Dispatches `task` and gathers its results in index order, one slot per index.
    ///
    /// # Example
    /// ```
    /// use rs_collide::scheduling::{Dispatcher, WorkerPool};
    ///
    /// let mut pool = WorkerPool::new(3).unwrap();
    /// let squares = pool.dispatch_collect(10, |i| i * i);
    /// assert_eq!(squares, (0..10).map(|i| i * i).collect::<Vec<_>>());
    /// ```
    fn dispatch_collect<T, F>(&mut self, count: usize, task: F) -> Vec<T>
    where
        Self: Sized,
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let mut slots: Vec<MaybeUninit<T>> = Vec::with_capacity(count);
        slots.resize_with(count, MaybeUninit::uninit);
        let writer = SlotWriter { base: slots.as_mut_ptr(), len: count };
        self.dispatch(count, &|index| {
            let value = task(index);
            // SAFETY: each index is handed out exactly once, so no two calls touch the same slot.
            unsafe { writer.write(index, value) }
        });
        slots
            .into_iter()
            // SAFETY: dispatch returned, so every slot in 0..count was written.
            .map(|slot| unsafe { slot.assume_init() })
            .collect()
    }
}

/// Shared handle to a buffer whose slots are written by disjoint indices.
struct SlotWriter<T> {
    base: *mut MaybeUninit<T>,
    len: usize,
}

unsafe impl<T: Send> Send for SlotWriter<T> {}
unsafe impl<T: Send> Sync for SlotWriter<T> {}

impl<T> SlotWriter<T> {
    /// # Safety
    /// No other thread may access slot `index` concurrently.
    unsafe fn write(&self, index: usize, value: T) {
        assert!(index < self.len, "slot {} out of range 0..{}", index, self.len);
        (*self.base.add(index)).write(value);
    }
}

/// Contiguous share of `[0, count)` owned by `worker` out of `workers`.
///
/// Chunks are `ceil(count / workers)` long; trailing workers may get an
/// empty range.
///
/// # Example
/// ```
/// use rs_collide::scheduling::chunk_range;
///
/// assert_eq!(chunk_range(0, 4, 10), 0..3);
/// assert_eq!(chunk_range(3, 4, 10), 9..10);
/// assert_eq!(chunk_range(3, 4, 2), 2..2);
/// ```
pub fn chunk_range(worker: usize, workers: usize, count: usize) -> Range<usize> {
    if workers == 0 {
        return 0..0;
    }
    let chunk = count.div_ceil(workers);
    let start = (worker * chunk).min(count);
    let end = (start + chunk).min(count);
    start..end
}

/// Runs every index on the calling thread. Useful where threads are not
/// available and as the reference for parallel results.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialDispatcher;

unsafe impl Dispatcher for SerialDispatcher {
    fn thread_count(&self) -> usize {
        1
    }

    fn dispatch(&mut self, count: usize, task: &(dyn Fn(usize) + Sync)) {
        for index in 0..count {
            task(index);
        }
    }
}
