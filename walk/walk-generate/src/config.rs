//! Generator parameters.
//!
//! # Example
//!
//! ```
//! use walk_generate::{GeneratorConfig, Parallelism, Point3, Vector3};
//!
//! let config = GeneratorConfig::new()
//!     .with_start(Point3::new(0.0, 0.0, 1.0))
//!     .with_spacing(Vector3::new(0.5, 0.5, 1.0))
//!     .with_max_nodes(10_000)
//!     .with_steps(0.3, 0.3)
//!     .with_parallelism(Parallelism::from_cores(4));
//! assert!(config.validate().is_ok());
//! ```

use nalgebra::{Point3, Vector3};

use crate::error::{GenerateError, GenerateResult};

/// How many workers evaluate candidate edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parallelism {
    /// The global rayon pool.
    #[default]
    All,
    /// The calling thread only.
    Single,
    /// A dedicated pool with this many threads.
    Threads(usize),
}

impl Parallelism {
    /// Map an integer core hint onto a parallelism mode.
    ///
    /// Negative values mean all cores, `0` and `1` mean single-threaded and
    /// anything larger is a thread count.
    ///
    /// ```
    /// use walk_generate::Parallelism;
    ///
    /// assert_eq!(Parallelism::from_cores(-1), Parallelism::All);
    /// assert_eq!(Parallelism::from_cores(1), Parallelism::Single);
    /// assert_eq!(Parallelism::from_cores(6), Parallelism::Threads(6));
    /// ```
    #[must_use]
    pub fn from_cores(cores: i32) -> Self {
        match usize::try_from(cores) {
            Err(_) => Self::All,
            Ok(0 | 1) => Self::Single,
            Ok(n) => Self::Threads(n),
        }
    }
}

/// Configuration for [`GraphGenerator`](crate::GraphGenerator).
///
/// The seed `start` should hover above the floor to be explored. Each
/// expanded node probes the lattice offsets `(i * spacing.x, j * spacing.y)`
/// for `-k <= i, j <= k` (`k` being `max_step_connections`), casting a ray
/// down from `spacing.z` above the node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    start: Point3<f64>,
    spacing: Vector3<f64>,
    max_nodes: Option<usize>,
    up_step: f64,
    down_step: f64,
    up_slope: f64,
    down_slope: f64,
    max_step_connections: usize,
    parallelism: Parallelism,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    ///
    /// Defaults:
    /// - Start: origin
    /// - Spacing: `(1, 1, 1)`
    /// - Max nodes: unbounded
    /// - Up/down step: 0.2
    /// - Up/down slope: 20 degrees
    /// - Max step connections: 1 (the 8-neighborhood)
    /// - Parallelism: all cores
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Point3::origin(),
            spacing: Vector3::new(1.0, 1.0, 1.0),
            max_nodes: None,
            up_step: 0.2,
            down_step: 0.2,
            up_slope: 20.0,
            down_slope: 20.0,
            max_step_connections: 1,
            parallelism: Parallelism::All,
        }
    }

    /// Sets the seed position.
    #[must_use]
    pub fn with_start(mut self, start: Point3<f64>) -> Self {
        self.start = start;
        self
    }

    /// Sets the lateral grid size (`x`, `y`) and the drop height (`z`).
    #[must_use]
    pub fn with_spacing(mut self, spacing: Vector3<f64>) -> Self {
        self.spacing = spacing;
        self
    }

    /// Caps the node count.
    ///
    /// Generation stops once the count reaches the cap; the final graph can
    /// exceed it by one node's neighborhood.
    #[must_use]
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Removes the node cap.
    #[must_use]
    pub const fn without_max_nodes(mut self) -> Self {
        self.max_nodes = None;
        self
    }

    /// Sets the node cap from a signed hint, where any negative value means
    /// unbounded.
    #[must_use]
    pub fn with_max_nodes_hint(mut self, hint: i64) -> Self {
        self.max_nodes = usize::try_from(hint).ok();
        self
    }

    /// Sets the maximum height climbed and descended by one edge.
    #[must_use]
    pub const fn with_steps(mut self, up: f64, down: f64) -> Self {
        self.up_step = up;
        self.down_step = down;
        self
    }

    /// Sets the maximum uphill and downhill edge angles in degrees.
    #[must_use]
    pub const fn with_slopes(mut self, up: f64, down: f64) -> Self {
        self.up_slope = up;
        self.down_slope = down;
        self
    }

    /// Sets how many lattice rings around a node are probed.
    #[must_use]
    pub const fn with_max_step_connections(mut self, k: usize) -> Self {
        self.max_step_connections = k;
        self
    }

    /// Sets the worker policy.
    #[must_use]
    pub const fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Returns the seed position.
    #[must_use]
    pub const fn start(&self) -> &Point3<f64> {
        &self.start
    }

    /// Returns the grid spacing.
    #[must_use]
    pub const fn spacing(&self) -> &Vector3<f64> {
        &self.spacing
    }

    /// Returns the node cap, `None` if unbounded.
    #[must_use]
    pub const fn max_nodes(&self) -> Option<usize> {
        self.max_nodes
    }

    /// Returns the maximum upward step.
    #[must_use]
    pub const fn up_step(&self) -> f64 {
        self.up_step
    }

    /// Returns the maximum downward step.
    #[must_use]
    pub const fn down_step(&self) -> f64 {
        self.down_step
    }

    /// Returns the maximum uphill angle in degrees.
    #[must_use]
    pub const fn up_slope(&self) -> f64 {
        self.up_slope
    }

    /// Returns the maximum downhill angle in degrees.
    #[must_use]
    pub const fn down_slope(&self) -> f64 {
        self.down_slope
    }

    /// Returns the number of probed lattice rings.
    #[must_use]
    pub const fn max_step_connections(&self) -> usize {
        self.max_step_connections
    }

    /// Returns the worker policy.
    #[must_use]
    pub const fn parallelism(&self) -> Parallelism {
        self.parallelism
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfig`] if:
    /// - the start is not finite
    /// - a spacing component is not strictly positive and finite
    /// - a step is negative or not finite
    /// - a slope is outside `[0, 90]` degrees
    /// - `max_step_connections` is zero
    /// - a dedicated pool is requested with zero threads
    pub fn validate(&self) -> GenerateResult<()> {
        if !self.start.iter().all(|c| c.is_finite()) {
            return Err(GenerateError::invalid_config(format!(
                "start must be finite, got {:?}",
                self.start
            )));
        }
        if !self.spacing.iter().all(|&c| c.is_finite() && c > 0.0) {
            return Err(GenerateError::invalid_config(format!(
                "spacing must be positive and finite, got {:?}",
                self.spacing
            )));
        }
        for (name, step) in [("up_step", self.up_step), ("down_step", self.down_step)] {
            if !step.is_finite() || step < 0.0 {
                return Err(GenerateError::invalid_config(format!(
                    "{name} must be finite and non-negative, got {step}"
                )));
            }
        }
        for (name, slope) in [("up_slope", self.up_slope), ("down_slope", self.down_slope)] {
            if !(0.0..=90.0).contains(&slope) {
                return Err(GenerateError::invalid_config(format!(
                    "{name} must be within [0, 90] degrees, got {slope}"
                )));
            }
        }
        if self.max_step_connections == 0 {
            return Err(GenerateError::invalid_config(
                "max_step_connections must be at least 1",
            ));
        }
        if self.parallelism == Parallelism::Threads(0) {
            return Err(GenerateError::invalid_config(
                "a dedicated pool needs at least one thread",
            ));
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
