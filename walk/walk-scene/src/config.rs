//! Scene construction parameters.
//!
//! # Example
//!
//! ```
//! use walk_scene::{Precision, SceneConfig};
//!
//! let config = SceneConfig::default()
//!     .with_precision(Precision::Fast)
//!     .with_max_leaf_size(4)
//!     .with_surface_offset(0.01);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{SceneError, SceneResult};

/// Floating-point precision of the BVH and its intersection math.
///
/// Fixed for the lifetime of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Precision {
    /// Single precision. Faster and smaller, but drifts at large coordinates.
    Fast,
    /// Double precision.
    #[default]
    Precise,
}

/// Configuration for building a [`Scene`](crate::Scene).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneConfig {
    precision: Precision,
    max_leaf_size: usize,
    parallel_threshold: usize,
    surface_offset: f64,
}

impl SceneConfig {
    /// Creates a configuration with default settings.
    ///
    /// Defaults:
    /// - Precision: precise (`f64`)
    /// - Max leaf size: 8 triangles
    /// - Parallel build threshold: 1024 triangles
    /// - Surface offset: 0.001 world units
    #[must_use]
    pub const fn new() -> Self {
        Self {
            precision: Precision::Precise,
            max_leaf_size: 8,
            parallel_threshold: 1024,
            surface_offset: 0.001,
        }
    }

    /// Sets the precision mode.
    #[must_use]
    pub const fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Sets the maximum number of triangles per BVH leaf.
    #[must_use]
    pub const fn with_max_leaf_size(mut self, size: usize) -> Self {
        self.max_leaf_size = size;
        self
    }

    /// Sets the subtree size above which the BVH is built in parallel.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the height above the surface used for line-of-sight rays.
    ///
    /// Should be small relative to the walker's step height but larger than
    /// the positional rounding of graph nodes.
    #[must_use]
    pub const fn with_surface_offset(mut self, offset: f64) -> Self {
        self.surface_offset = offset;
        self
    }

    /// Returns the precision mode.
    #[must_use]
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Returns the maximum leaf size.
    #[must_use]
    pub const fn max_leaf_size(&self) -> usize {
        self.max_leaf_size
    }

    /// Returns the parallel build threshold.
    #[must_use]
    pub const fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Returns the line-of-sight surface offset.
    #[must_use]
    pub const fn surface_offset(&self) -> f64 {
        self.surface_offset
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] if the leaf size is zero or the
    /// surface offset is negative or not finite.
    pub fn validate(&self) -> SceneResult<()> {
        if self.max_leaf_size == 0 {
            return Err(SceneError::invalid_config("max_leaf_size must be at least 1"));
        }
        if !self.surface_offset.is_finite() || self.surface_offset < 0.0 {
            return Err(SceneError::invalid_config(format!(
                "surface_offset must be finite and non-negative, got {}",
                self.surface_offset
            )));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.precision(), Precision::Precise);
        assert_eq!(config.max_leaf_size(), 8);
        assert_eq!(config.surface_offset(), 0.001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(SceneConfig::new().with_max_leaf_size(0).validate().is_err());
        assert!(SceneConfig::new().with_surface_offset(-1.0).validate().is_err());
        assert!(SceneConfig::new().with_surface_offset(f64::NAN).validate().is_err());
    }
}
