use std::path::Path;

use serde::Deserialize;

use crate::AlignmentGate;
use crate::boids::Attractor;
use crate::error::ConfigError;

/// Construction-time settings for a [`crate::boids::Simulation`].
///
/// Keys use the camelCase option names, every one of them optional. Limits and
/// distances are given as plain (not squared) values; a zero limit turns the
/// matching clamp off. Nothing here is validated, negative values simply give
/// degenerate motion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub speed_limit: f64,
    pub acceleration_limit: f64,
    pub separation_distance: f64,
    pub alignment_distance: f64,
    pub cohesion_distance: f64,
    pub separation_force: f64,
    pub cohesion_force: f64,
    #[serde(alias = "alignment")]
    pub alignment_force: f64,
    pub attractors: Vec<Attractor>,
    /// Initial population.
    pub boids: usize,
    /// Seed for initial placement, random when absent.
    pub seed: Option<u64>,
    /// Run the force pass on the rayon pool.
    pub parallel: bool,
    pub alignment_gate: AlignmentGate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed_limit: 0.0,
            acceleration_limit: 1.0,
            separation_distance: 60.0,
            alignment_distance: 180.0,
            cohesion_distance: 180.0,
            separation_force: 0.15,
            cohesion_force: 0.1,
            alignment_force: 0.25,
            attractors: Vec::new(),
            boids: 50,
            seed: None,
            parallel: false,
            alignment_gate: AlignmentGate::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.boids, 50);
        assert_eq!(config.speed_limit, 0.0);
        assert_eq!(config.acceleration_limit, 1.0);
    }

    #[test]
    fn test_camel_case_keys() {
        let config = Config::from_json_str(
            r#"{ "boids": 150, "speedLimit": 2, "accelerationLimit": 0.5, "separationDistance": 30 }"#,
        )
        .unwrap();
        assert_eq!(config.boids, 150);
        assert_eq!(config.speed_limit, 2.0);
        assert_eq!(config.acceleration_limit, 0.5);
        assert_eq!(config.separation_distance, 30.0);
        assert_eq!(config.cohesion_distance, 180.0);
    }

    #[test]
    fn test_alignment_alias() {
        let config = Config::from_json_str(r#"{ "alignment": 0.4 }"#).unwrap();
        assert_eq!(config.alignment_force, 0.4);
    }

    #[test]
    fn test_attractors() {
        let config = Config::from_json_str(
            r#"{ "attractors": [ { "position": [10, -5], "dist": 150, "spd": 0.25 }, { "position": [0, 0], "spd": 1 } ] }"#,
        )
        .unwrap();
        assert_eq!(config.attractors.len(), 2);
        assert_eq!(config.attractors[0].position.x, 10.0);
        assert_eq!(config.attractors[0].position.y, -5.0);
        assert_eq!(config.attractors[0].dist, 150.0);
        assert_eq!(config.attractors[1].dist, f64::INFINITY);
        assert_eq!(config.attractors[1].spd, 1.0);
    }

    #[test]
    fn test_alignment_gate() {
        let config = Config::from_json_str(r#"{ "alignmentGate": "outsideSeparation" }"#).unwrap();
        assert_eq!(config.alignment_gate, AlignmentGate::OutsideSeparation);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_json_str(r#"{ "boids": "many" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/nonexistent/flocking.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
