use log::{debug, trace};
use nalgebra::Vector2;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::hypot::{finite_or_zero, length, length_squared};
use crate::{AlignmentGate, Parameters};

/// Side of the square new boids are scattered over.
const SPAWN_EXTENT: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boid {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub acceleration: Vector2<f64>,
}

impl Boid {
    pub fn new(x: f64, y: f64, xv: f64, yv: f64) -> Self {
        Boid {
            position: Vector2::new(x, y),
            velocity: Vector2::new(xv, yv),
            acceleration: Vector2::zeros(),
        }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0)
    }
}

/// A point pulling the velocity of every boid closer than `dist` towards
/// itself, by `spd` per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attractor {
    pub position: Vector2<f64>,
    #[serde(default = "unbounded")]
    pub dist: f64,
    pub spd: f64,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

impl Attractor {
    pub fn new(x: f64, y: f64, dist: f64, spd: f64) -> Self {
        Attractor {
            position: Vector2::new(x, y),
            dist,
            spd,
        }
    }
}

pub type TickCallback = Box<dyn FnMut(&mut [Boid])>;

/// Owns the flock and the attractors and advances them one tick at a time.
///
/// Between ticks the population and the attractors may be changed freely
/// through [`Simulation::boids_mut`] and [`Simulation::attractors_mut`]; the
/// `&mut self` receiver of [`Simulation::tick`] keeps them fixed during one.
pub struct Simulation {
    params: Parameters,
    boids: Vec<Boid>,
    attractors: Vec<Attractor>,
    on_tick: Option<TickCallback>,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: &Config) -> Self {
        match config.seed {
            Some(seed) => Self::with_rng(config, &mut StdRng::seed_from_u64(seed)),
            None => Self::with_rng(config, &mut rand::rng()),
        }
    }

    pub fn with_rng<R: Rng>(config: &Config, rng: &mut R) -> Self {
        let params = Parameters::from(config);
        let boids: Vec<Boid> = (0..config.boids)
            .map(|_| {
                Boid::at(
                    rng.random_range(0.0..SPAWN_EXTENT),
                    rng.random_range(0.0..SPAWN_EXTENT),
                )
            })
            .collect();
        debug!(
            "Spawned {} boids, {} attractors, speed limit {}, acceleration limit {}",
            boids.len(),
            config.attractors.len(),
            params.speed_limit_root,
            params.acceleration_limit_root
        );
        Simulation {
            params,
            boids,
            attractors: config.attractors.clone(),
            on_tick: None,
            ticks: 0,
        }
    }

    /// Registers the observer called at the end of every tick with the live
    /// flock. Writes it makes to positions carry into the next tick.
    pub fn on_tick(mut self, callback: impl FnMut(&mut [Boid]) + 'static) -> Self {
        self.set_on_tick(callback);
        self
    }

    pub fn set_on_tick(&mut self, callback: impl FnMut(&mut [Boid]) + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn boids_mut(&mut self) -> &mut Vec<Boid> {
        &mut self.boids
    }

    pub fn push_boid(&mut self, boid: Boid) {
        self.boids.push(boid);
    }

    pub fn pop_boid(&mut self) -> Option<Boid> {
        self.boids.pop()
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    pub fn attractors_mut(&mut self) -> &mut [Attractor] {
        &mut self.attractors
    }

    pub fn add_attractor(&mut self, attractor: Attractor) {
        self.attractors.push(attractor);
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advances the flock by one step.
    ///
    /// Every boid first steers against the state all boids had when the tick
    /// started, then all of them integrate. The observer runs last.
    pub fn tick(&mut self) {
        let params = &self.params;
        let attractors = &self.attractors;
        let boids = &self.boids;

        // Steering reads the pass-start state only, so gather, then apply
        let steered: Vec<(Vector2<f64>, Vector2<f64>)> = if params.parallel {
            (0..boids.len())
                .into_par_iter()
                .map(|current| steer(params, attractors, boids, current))
                .collect()
        } else {
            (0..boids.len())
                .map(|current| steer(params, attractors, boids, current))
                .collect()
        };

        for (boid, (velocity, acceleration)) in self.boids.iter_mut().zip(steered) {
            boid.velocity = velocity;
            boid.acceleration = acceleration;
        }

        for boid in self.boids.iter_mut() {
            integrate(boid, &self.params);
        }

        self.ticks += 1;
        trace!("tick {} done, {} boids", self.ticks, self.boids.len());

        if let Some(on_tick) = self.on_tick.as_mut() {
            on_tick(&mut self.boids);
        }
    }
}

/// Velocity and acceleration of `boids[current]` after the attractor pull and
/// the three flocking rules.
fn steer(
    params: &Parameters,
    attractors: &[Attractor],
    boids: &[Boid],
    current: usize,
) -> (Vector2<f64>, Vector2<f64>) {
    let boid = &boids[current];

    // Attractors act on velocity straight away, not through acceleration
    let mut velocity = boid.velocity;
    for attractor in attractors.iter().rev() {
        let spare = boid.position - attractor.position;
        if length_squared(&spare) < attractor.dist * attractor.dist {
            let length = length(&spare);
            velocity.x -= finite_or_zero(attractor.spd * spare.x / length);
            velocity.y -= finite_or_zero(attractor.spd * spare.y / length);
        }
    }

    let mut separation: Vector2<f64> = Vector2::zeros();
    let mut cohesion: Vector2<f64> = Vector2::zeros();
    let mut alignment: Vector2<f64> = Vector2::zeros();

    for (other_idx, other) in boids.iter().enumerate().rev() {
        if other_idx == current {
            continue;
        }
        let spare = boid.position - other.position;
        let dist_squared = length_squared(&spare);

        let separating = dist_squared < params.separation_distance;
        if separating {
            separation += spare;
        } else if dist_squared < params.cohesion_distance {
            cohesion += spare;
        }

        let gated = match params.alignment_gate {
            AlignmentGate::Independent => true,
            AlignmentGate::OutsideSeparation => !separating,
        };
        if gated && dist_squared < params.alignment_distance {
            alignment += other.velocity;
        }
    }

    let mut acceleration = boid.acceleration;
    acceleration += unit_force(params.separation_force, &separation);
    acceleration -= unit_force(params.cohesion_force, &cohesion);
    acceleration -= unit_force(params.alignment_force, &alignment);

    (velocity, acceleration)
}

/// `force * sum / |sum|`, with each non-finite component dropped to zero.
fn unit_force(force: f64, sum: &Vector2<f64>) -> Vector2<f64> {
    let length = length(sum);
    Vector2::new(
        finite_or_zero(force * sum.x / length),
        finite_or_zero(force * sum.y / length),
    )
}

fn integrate(boid: &mut Boid, params: &Parameters) {
    if params.acceleration_limit != 0.0
        && length_squared(&boid.acceleration) > params.acceleration_limit
    {
        let ratio = params.acceleration_limit_root / length(&boid.acceleration);
        boid.acceleration *= ratio;
    }

    boid.velocity += boid.acceleration;

    if params.speed_limit != 0.0 && length_squared(&boid.velocity) > params.speed_limit {
        let ratio = params.speed_limit_root / length(&boid.velocity);
        boid.velocity *= ratio;
    }

    boid.position += boid.velocity;
}
