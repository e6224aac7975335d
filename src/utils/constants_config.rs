// src/utils/constants_config.rs
use crate::errors::CollisionError;
use crate::models::Vector3;
use crate::utils::DEFAULT_COLLISION_CONSTANTS;

/// How GJK asks a shape for its support points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportSearch {
    /// Scan every vertex.
    Exhaustive,
    /// Walk the adjacency graph starting from the previous support vertex.
    HillClimb,
}

/// Tunable tolerances and limits shared by every query in the crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConstants {
    /// Width of the band below zero that still classifies as non-negative.
    pub sign_epsilon: f64,
    /// GJK reports contact once the search direction is at most this long.
    pub zero_epsilon: f64,
    /// Static distance under which a time of impact is accepted.
    pub contact_threshold: f64,
    /// Bisection steps before a time of impact query gives up.
    pub max_toi_iterations: usize,
    /// First GJK search direction. Must be non-zero.
    pub initial_direction: Vector3,
    pub support_search: SupportSearch,
    /// Minimum `-(normal · direction)` for a face to count as facing the motion.
    pub facing_epsilon: f64,
    /// Ray/triangle determinants closer to zero than this are treated as parallel.
    pub parallel_epsilon: f64,
    /// Hits at or before this time are ignored (the ray starts on the surface).
    pub time_epsilon: f64,
    /// Hits are accepted up to `1 + time_upper_slack`.
    pub time_upper_slack: f64,
}

impl Default for CollisionConstants {
    fn default() -> Self {
        DEFAULT_COLLISION_CONSTANTS
    }
}

impl CollisionConstants {
    pub fn new(
        sign_epsilon: Option<f64>,
        contact_threshold: Option<f64>,
        max_toi_iterations: Option<usize>,
        support_search: Option<SupportSearch>,
    ) -> Self {
        let default = DEFAULT_COLLISION_CONSTANTS;
        Self {
            sign_epsilon: sign_epsilon.unwrap_or(default.sign_epsilon),
            contact_threshold: contact_threshold.unwrap_or(default.contact_threshold),
            max_toi_iterations: max_toi_iterations.unwrap_or(default.max_toi_iterations),
            support_search: support_search.unwrap_or(default.support_search),
            ..default
        }
    }

    pub fn with_support_search(mut self, support_search: SupportSearch) -> Self {
        self.support_search = support_search;
        self
    }

    pub fn with_zero_epsilon(mut self, zero_epsilon: f64) -> Self {
        self.zero_epsilon = zero_epsilon;
        self
    }

    pub fn with_initial_direction(mut self, direction: Vector3) -> Self {
        self.initial_direction = direction;
        self
    }

    /// Checks that every tolerance is usable.
    ///
    /// # Errors
    /// Returns `CollisionError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<(), CollisionError> {
        let tolerances = [
            ("sign_epsilon", self.sign_epsilon),
            ("zero_epsilon", self.zero_epsilon),
            ("contact_threshold", self.contact_threshold),
            ("facing_epsilon", self.facing_epsilon),
            ("parallel_epsilon", self.parallel_epsilon),
            ("time_epsilon", self.time_epsilon),
            ("time_upper_slack", self.time_upper_slack),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(CollisionError::InvalidParameter(format!("{} must be finite and non-negative, got {}", name, value)));
            }
        }
        if self.max_toi_iterations == 0 {
            return Err(CollisionError::InvalidParameter("max_toi_iterations must be positive".to_string()));
        }
        if self.initial_direction.is_zero() || !self.initial_direction.is_finite() {
            return Err(CollisionError::InvalidParameter("initial_direction must be finite and non-zero".to_string()));
        }
        Ok(())
    }
}
