mod gjk_distance;
mod time_of_impact;
mod ray_casting;

pub use gjk_distance::*;
pub use time_of_impact::*;
pub use ray_casting::*;
