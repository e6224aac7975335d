mod constants;
mod constants_config;

pub use constants::*;
pub use constants_config::*;
