mod dispatcher;
mod worker_pool;
#[cfg(feature = "rayon_dispatch")]
mod rayon_dispatcher;

pub use dispatcher::*;
pub use worker_pool::*;
#[cfg(feature = "rayon_dispatch")]
pub use rayon_dispatcher::*;

#[cfg(test)]
mod worker_pool_tests;
