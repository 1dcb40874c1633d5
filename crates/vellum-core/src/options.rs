//! Configuration options for the editor core.

use serde::{Deserialize, Serialize};

use crate::curve::DEFAULT_CURVE_STEPS;
use crate::surface::DEFAULT_SURFACE_STEPS;

/// Editor-level configuration.
///
/// Serializable so a front end can persist it between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Sample steps per curve segment chain.
    pub curve_steps: usize,

    /// Sample steps per surface patch, in each direction.
    pub surface_steps: usize,

    /// World-space distance of one pan step.
    pub pan_step: f32,

    /// Zoom step as a percentage of the zoom factor.
    pub zoom_step_pct: f32,

    /// Window rotation step in radians.
    pub rotate_step: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            curve_steps: DEFAULT_CURVE_STEPS,
            surface_steps: DEFAULT_SURFACE_STEPS,
            pan_step: 5.0,
            zoom_step_pct: 5.0,
            rotate_step: 15f32.to_radians(),
        }
    }
}
