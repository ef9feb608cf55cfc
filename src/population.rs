//! Adaptive population sizing.
//!
//! A [`FrameRate`] meter smooths the observed tick rate and reports it every
//! few ticks; [`AdaptivePopulation`] then grows the flock while the rate is
//! healthy and shrinks it when the rate drops.

use std::time::Instant;

use log::debug;
use rand::Rng;

use crate::boids::{Boid, Simulation};

/// Exponentially smoothed ticks-per-second meter.
#[derive(Debug, Clone)]
pub struct FrameRate {
    /// Report the smoothed rate once per this many ticks.
    pub every: u32,
    /// Weight of the newest sample.
    pub decay: f64,
    rate: f64,
    ticks: u32,
    last: Option<Instant>,
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new(10, 0.04)
    }
}

impl FrameRate {
    pub fn new(every: u32, decay: f64) -> Self {
        FrameRate {
            every,
            decay,
            rate: 0.0,
            ticks: 0,
            last: None,
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Records a tick at `now`. Returns the smoothed rate on every `every`th
    /// timed tick. The first call only starts the clock, the first timed tick
    /// seeds the average.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let last = self.last.replace(now)?;
        let elapsed = now.saturating_duration_since(last).as_secs_f64();
        if elapsed > 0.0 {
            let instant = 1.0 / elapsed;
            if self.rate == 0.0 {
                self.rate = instant;
            } else {
                self.rate += self.decay * (instant - self.rate);
            }
        }
        self.ticks += 1;
        if self.ticks >= self.every {
            self.ticks = 0;
            Some(self.rate)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptivePopulation {
    pub min: usize,
    pub max: usize,
    /// At or below this rate, boids are removed.
    pub low_rate: f64,
    /// At or above this rate, boids are added.
    pub high_rate: f64,
    /// Adjustments per report.
    pub step: usize,
    /// New boids start at the origin with each velocity component uniform in
    /// `[-spawn_speed, spawn_speed)`. Zero or less spawns them at rest.
    pub spawn_speed: f64,
}

impl Default for AdaptivePopulation {
    fn default() -> Self {
        AdaptivePopulation {
            min: 10,
            max: 500,
            low_rate: 56.0,
            high_rate: 60.0,
            step: 3,
            spawn_speed: 3.0,
        }
    }
}

impl AdaptivePopulation {
    /// Adjusts the population of `simulation` for a reported `rate`. Must be
    /// called between ticks. Returns the new population size.
    pub fn adjust<R: Rng>(&self, simulation: &mut Simulation, rate: f64, rng: &mut R) -> usize {
        let before = simulation.len();
        for _ in 0..self.step {
            if rate <= self.low_rate && simulation.len() > self.min {
                simulation.pop_boid();
            }
            if rate >= self.high_rate && simulation.len() < self.max {
                let xv = self.spawn_component(rng);
                let yv = self.spawn_component(rng);
                simulation.push_boid(Boid::new(0.0, 0.0, xv, yv));
            }
        }
        let after = simulation.len();
        if after != before {
            debug!("Population {} -> {} at {:.1} ticks/s", before, after, rate);
        }
        after
    }

    fn spawn_component<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.spawn_speed > 0.0 {
            rng.random_range(-self.spawn_speed..self.spawn_speed)
        } else {
            0.0
        }
    }
}
