pub mod boids;
pub mod config;
pub mod error;
pub mod hypot;
pub mod population;
pub mod render;

use serde::Deserialize;

use crate::config::Config;

/// Which pairs feed the alignment sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignmentGate {
    /// Any neighbour inside the alignment radius, separating ones included.
    #[default]
    Independent,
    /// Only neighbours outside the separation radius.
    OutsideSeparation,
}

/// Tunables as the kernel consumes them: limits and radii squared, with the
/// plain limit values kept for rescaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub speed_limit_root: f64,
    pub speed_limit: f64,
    pub acceleration_limit_root: f64,
    pub acceleration_limit: f64,
    pub separation_distance: f64,
    pub alignment_distance: f64,
    pub cohesion_distance: f64,
    pub separation_force: f64,
    pub cohesion_force: f64,
    pub alignment_force: f64,
    pub alignment_gate: AlignmentGate,
    pub parallel: bool,
}

impl From<&Config> for Parameters {
    fn from(config: &Config) -> Self {
        Parameters {
            speed_limit_root: config.speed_limit,
            speed_limit: config.speed_limit.powi(2),
            acceleration_limit_root: config.acceleration_limit,
            acceleration_limit: config.acceleration_limit.powi(2),
            separation_distance: config.separation_distance.powi(2),
            alignment_distance: config.alignment_distance.powi(2),
            cohesion_distance: config.cohesion_distance.powi(2),
            separation_force: config.separation_force,
            cohesion_force: config.cohesion_force,
            alignment_force: config.alignment_force,
            alignment_gate: config.alignment_gate,
            parallel: config.parallel,
        }
    }
}
