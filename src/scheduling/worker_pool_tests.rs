use approx::assert_relative_eq;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use crate::errors::CollisionError;
use crate::scheduling::{Dispatcher, PoolStatus, SerialDispatcher, WorkerPool};

const VECTOR_A: [f64; 14] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.12, 0.13, 0.14, 0.15, 0.16];
const VECTOR_B: [f64; 14] = [0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.12, 0.13, 0.14, 0.15, 0.16, 1.0];

fn serial_dot() -> f64 {
    VECTOR_A.iter().zip(VECTOR_B.iter()).map(|(a, b)| a * b).sum()
}

fn atomic_add(target: &AtomicU64, value: f64) {
    let mut current = target.load(Ordering::Relaxed);
    loop {
        let next = (f64::from_bits(current) + value).to_bits();
        match target.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}

#[test]
fn test_zero_workers_is_rejected() {
    assert_eq!(WorkerPool::new(0).unwrap_err(), CollisionError::InvalidWorkerCount);
}

#[test]
fn test_available_parallelism_gives_at_least_one_worker() {
    let pool = WorkerPool::with_available_parallelism().unwrap();
    assert!(pool.worker_count() >= 1);
    assert_eq!(pool.thread_count(), pool.worker_count());
}

#[test]
fn test_every_index_runs_exactly_once() {
    let workers = 4;
    let mut pool = WorkerPool::new(workers).unwrap();
    for count in [0, 1, workers - 1, workers, workers * 7 + 3] {
        let hits: Vec<AtomicUsize> = (0..count).map(|_| AtomicUsize::new(0)).collect();
        pool.dispatch(count, &|index| {
            hits[index].fetch_add(1, Ordering::Relaxed);
        });
        assert!(hits.iter().all(|hit| hit.load(Ordering::Relaxed) == 1), "count {}", count);
    }
}

#[test]
fn test_tasks_run_on_named_workers() {
    let mut pool = WorkerPool::new(2).unwrap();
    let names = pool.dispatch_collect(6, |_| thread::current().name().map(str::to_owned));
    for name in names {
        let name = name.expect("worker threads are named");
        assert!(name.starts_with("rs-collide-worker-"), "{}", name);
    }
}

#[test]
fn test_parallel_results_match_serial() {
    let mut pool = WorkerPool::new(3).unwrap();
    let task = |i: usize| (i as f64 * 0.37).sin() * (i as f64 + 1.0).sqrt();
    let parallel = pool.dispatch_collect(1000, task);
    let serial = SerialDispatcher.dispatch_collect(1000, task);

    // Same per-index computation, so the bits agree
    let parallel_bits: Vec<u64> = parallel.iter().map(|v| v.to_bits()).collect();
    let serial_bits: Vec<u64> = serial.iter().map(|v| v.to_bits()).collect();
    assert_eq!(parallel_bits, serial_bits);
}

#[test]
fn test_repeated_dispatch_does_not_deadlock() {
    let mut pool = WorkerPool::new(4).unwrap();
    let total = AtomicUsize::new(0);
    for round in 0..500 {
        let count = round % 13;
        pool.dispatch(count, &|_| {
            total.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(pool.status(), PoolStatus::Ready);
    }
    let expected: usize = (0..500).map(|round| round % 13).sum();
    assert_eq!(total.load(Ordering::Relaxed), expected);
}

#[test]
fn test_status_transitions_and_shutdown() {
    let mut pool = WorkerPool::new(3).unwrap();
    assert_eq!(pool.status(), PoolStatus::Ready);

    let seen_busy = Mutex::new(Vec::new());
    let probe = pool.status_handle();
    pool.dispatch(3, &|_| seen_busy.lock().unwrap().push(probe.status()));
    assert!(seen_busy.lock().unwrap().iter().all(|status| *status == PoolStatus::Busy));
    assert_eq!(pool.status(), PoolStatus::Ready);

    assert_eq!(pool.shutdown(), 3);
    assert_eq!(pool.status(), PoolStatus::Stopped);
    assert_eq!(pool.shutdown(), 0);
    assert_eq!(probe.status(), PoolStatus::Stopped);
}

#[test]
fn test_stopped_pool_still_completes_work() {
    let mut pool = WorkerPool::new(2).unwrap();
    pool.shutdown();
    let doubled = pool.dispatch_collect(5, |i| i * 2);
    assert_eq!(doubled, vec![0, 2, 4, 6, 8]);
}

#[test]
fn test_fourteen_dot_product_with_mutex() {
    let mut pool = WorkerPool::new(4).unwrap();
    let sum = Mutex::new(0.0);
    pool.dispatch(VECTOR_A.len(), &|i| {
        let component = VECTOR_A[i] * VECTOR_B[i];
        *sum.lock().unwrap() += component;
    });
    assert_relative_eq!(sum.into_inner().unwrap(), serial_dot(), epsilon = 1e-12);
}

#[test]
fn test_fourteen_dot_product_with_atomic() {
    let mut pool = WorkerPool::new(4).unwrap();
    let sum = AtomicU64::new(0.0_f64.to_bits());
    pool.dispatch(VECTOR_A.len(), &|i| atomic_add(&sum, VECTOR_A[i] * VECTOR_B[i]));
    assert_relative_eq!(f64::from_bits(sum.load(Ordering::Acquire)), serial_dot(), epsilon = 1e-12);
}
