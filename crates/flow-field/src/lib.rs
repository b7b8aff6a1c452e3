#![deny(unsafe_code)]
//! Particle flow-field engine.
//!
//! Thousands of particles drift through a vector field whose direction at
//! each point comes from 3D gradient noise, with time as the third axis so
//! the field slowly evolves. Each frame draws a short segment from every
//! particle's previous position to its new one over a faint dark overlay,
//! which leaves long fading trails.
//!
//! A hovering pointer bends the field into a vortex within 200 px; a click
//! bursts a handful of particles out of the click point.

use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use canvas_lab_core::params::{param_f64_in, param_seed, param_usize_in};
use canvas_lab_core::surface::clamp_extent;
use canvas_lab_core::{Engine, GradientNoise, Rgba, Segment, Surface, Xorshift64};
use glam::DVec2;
use rand::Rng;
use serde_json::{json, Value};

const DEFAULT_MAX_PARTICLES: usize = 3000;
/// Surface pixels per particle before the cap applies.
const DEFAULT_AREA_PER_PARTICLE: usize = 300;
/// Scale from surface pixels to noise space.
const DEFAULT_NOISE_SCALE: f64 = 0.003;
/// Noise-time advance per update.
const DEFAULT_TIME_STEP: f64 = 0.003;

const MAX_LIFE: i32 = 250;
const MIN_SPAWN_LIFE: i32 = 50;

const VORTEX_RADIUS: f64 = 200.0;
const VORTEX_WEIGHT: f64 = 0.7;
const DAMPING: f64 = 0.95;
const THRUST: f64 = 0.5;

const HUE_BUCKET: f64 = 30.0;
const HUE_BUCKETS: usize = 12;
/// Particles younger than this (in remaining life) are not drawn.
const MIN_VISIBLE_LIFE: i32 = 20;

const BURST_COUNT: usize = 50;
const BURST_JITTER: f64 = 20.0;
const BURST_SPEED: f64 = 4.0;

const BACKGROUND: Rgba = Rgba::rgb(0, 0, 8);
const TRAIL_OVERLAY: Rgba = Rgba {
    r: 0,
    g: 0,
    b: 8,
    a: 0.04,
};

/// Tunable constants for [`FlowField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowParams {
    pub max_particles: usize,
    pub area_per_particle: usize,
    pub noise_scale: f64,
    pub time_step: f64,
    /// Seeds both the particle PRNG and the noise table. `None` uses fresh
    /// entropy and the process-wide noise table.
    pub seed: Option<u64>,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            area_per_particle: DEFAULT_AREA_PER_PARTICLE,
            noise_scale: DEFAULT_NOISE_SCALE,
            time_step: DEFAULT_TIME_STEP,
            seed: None,
        }
    }
}

impl FlowParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            max_particles: param_usize_in(
                params,
                "max_particles",
                DEFAULT_MAX_PARTICLES,
                0..=100_000,
            ),
            area_per_particle: param_usize_in(
                params,
                "area_per_particle",
                DEFAULT_AREA_PER_PARTICLE,
                1..=1_000_000,
            ),
            noise_scale: param_f64_in(params, "noise_scale", DEFAULT_NOISE_SCALE, 0.0..=1.0),
            time_step: param_f64_in(params, "time_step", DEFAULT_TIME_STEP, 0.0..=1.0),
            seed: param_seed(params),
        }
    }

    /// `min(max_particles, floor(width * height / area_per_particle))`.
    pub fn particle_count(&self, width: usize, height: usize) -> usize {
        (width.saturating_mul(height) / self.area_per_particle).min(self.max_particles)
    }
}

/// A single tracer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    pub prev: DVec2,
    pub vel: DVec2,
    pub life: i32,
    pub max_life: i32,
    /// Degrees in [0, 360).
    pub hue: f64,
}

/// Flow-field engine.
pub struct FlowField {
    params: FlowParams,
    rng: Xorshift64,
    noise: Arc<GradientNoise>,
    width: usize,
    height: usize,
    time: f64,
    particles: Vec<Particle>,
    pointer: Option<DVec2>,
}

impl FlowField {
    pub fn new(params: FlowParams) -> Self {
        let mut rng = Xorshift64::from_optional_seed(params.seed);
        let noise = match params.seed {
            Some(_) => Arc::new(GradientNoise::shuffled(&mut rng)),
            None => GradientNoise::global(),
        };
        Self {
            params,
            rng,
            noise,
            width: 0,
            height: 0,
            time: 0.0,
            particles: Vec::new(),
            pointer: None,
        }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(FlowParams::from_json(params))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    fn random_position(&mut self) -> DVec2 {
        DVec2::new(
            self.rng.gen::<f64>() * self.width as f64,
            self.rng.gen::<f64>() * self.height as f64,
        )
    }

    fn spawn_life(&mut self) -> i32 {
        self.rng.gen_range(MIN_SPAWN_LIFE..MAX_LIFE)
    }

    fn spawn(&mut self) -> Particle {
        let pos = self.random_position();
        Particle {
            pos,
            prev: pos,
            vel: DVec2::ZERO,
            life: self.spawn_life(),
            max_life: MAX_LIFE,
            hue: self.rng.gen_range(0.0..360.0),
        }
    }

    /// Replaces the particle set for `width × height`.
    fn populate(&mut self, width: usize, height: usize) {
        self.width = clamp_extent(width);
        self.height = clamp_extent(height);
        let count = self.params.particle_count(self.width, self.height);
        self.particles = (0..count).map(|_| self.spawn()).collect();
        log::debug!(
            "flow-field: {}x{} surface -> {} particles",
            self.width,
            self.height,
            count
        );
    }

    /// Flow direction in radians at `pos`, bent toward a tangential vortex
    /// when the pointer is near.
    fn flow_angle(&self, pos: DVec2) -> f64 {
        let scale = self.params.noise_scale;
        let mut angle = self.noise.sample(pos.x * scale, pos.y * scale, self.time) * PI * 4.0;

        if let Some(pointer) = self.pointer {
            let offset = pos - pointer;
            let dist = offset.length();
            if dist < VORTEX_RADIUS {
                let influence = 1.0 - dist / VORTEX_RADIUS;
                let vortex = offset.y.atan2(offset.x) + FRAC_PI_2;
                let w = influence * VORTEX_WEIGHT;
                angle = angle * (1.0 - w) + vortex * w;
            }
        }
        angle
    }

    fn in_bounds(&self, pos: DVec2) -> bool {
        (0.0..=self.width as f64).contains(&pos.x) && (0.0..=self.height as f64).contains(&pos.y)
    }
}

/// Hue bucket index: `floor(hue / 30)`, kept inside the 12 buckets.
fn hue_bucket(hue: f64) -> usize {
    ((hue / HUE_BUCKET).floor().max(0.0) as usize).min(HUE_BUCKETS - 1)
}

impl Engine for FlowField {
    fn init(&mut self, surface: &mut dyn Surface) {
        self.time = 0.0;
        self.populate(surface.width(), surface.height());
        surface.fill(BACKGROUND);
    }

    fn update(&mut self) {
        self.time += self.params.time_step;
        let time = self.time;

        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            p.prev = p.pos;

            let angle = self.flow_angle(p.pos);
            p.vel = p.vel * DAMPING + DVec2::from_angle(angle) * THRUST;
            p.hue = (p.vel.length() * 40.0 + time * 20.0) % 360.0;
            p.pos += p.vel;
            p.life -= 1;

            if !self.in_bounds(p.pos) || p.life <= 0 {
                p.pos = self.random_position();
                p.prev = p.pos;
                p.vel = DVec2::ZERO;
                p.life = self.spawn_life();
            }
            self.particles[i] = p;
        }
    }

    /// Draws one stroke per hue bucket covering every visible particle's
    /// latest movement.
    fn render(&mut self, ctx: &mut dyn Surface) {
        ctx.fill_rect(
            0.0,
            0.0,
            self.width as f64,
            self.height as f64,
            TRAIL_OVERLAY,
        );

        let mut buckets: [Vec<Segment>; HUE_BUCKETS] = Default::default();
        for p in self.particles.iter().filter(|p| p.life >= MIN_VISIBLE_LIFE) {
            buckets[hue_bucket(p.hue)].push(Segment::new(p.prev.x, p.prev.y, p.pos.x, p.pos.y));
        }

        for (i, segments) in buckets.iter().enumerate() {
            if segments.is_empty() {
                continue;
            }
            let color = Rgba::hsla(i as f64 * HUE_BUCKET, 0.7, 0.6, 0.5);
            ctx.stroke_segments(segments, color, 1.0);
        }
    }

    fn on_mouse_move(&mut self, x: f64, y: f64) {
        self.pointer = (x >= 0.0 && y >= 0.0).then(|| DVec2::new(x, y));
    }

    /// Teleports the first 50 particles into a 20 px square around the
    /// click with random velocity and full life.
    fn on_mouse_click(&mut self, x: f64, y: f64) {
        let count = BURST_COUNT.min(self.particles.len());
        log::trace!("flow-field: burst of {count} at ({x}, {y})");
        let center = DVec2::new(x, y);
        for i in 0..count {
            let jitter = DVec2::new(self.rng.gen::<f64>() - 0.5, self.rng.gen::<f64>() - 0.5);
            let vel = DVec2::new(self.rng.gen::<f64>() - 0.5, self.rng.gen::<f64>() - 0.5);
            let p = &mut self.particles[i];
            p.pos = center + jitter * BURST_JITTER;
            p.prev = p.pos;
            p.vel = vel * BURST_SPEED;
            p.life = p.max_life;
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.populate(width, height);
    }

    fn destroy(&mut self) {
        self.particles = Vec::new();
        self.pointer = None;
        log::debug!("flow-field: destroyed");
    }

    fn params(&self) -> Value {
        json!({
            "max_particles": self.params.max_particles,
            "area_per_particle": self.params.area_per_particle,
            "noise_scale": self.params.noise_scale,
            "time_step": self.params.time_step,
            "seed": self.params.seed,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "max_particles": {
                "type": "integer",
                "default": DEFAULT_MAX_PARTICLES,
                "min": 0,
                "max": 100_000,
                "description": "Upper bound on the particle count"
            },
            "area_per_particle": {
                "type": "integer",
                "default": DEFAULT_AREA_PER_PARTICLE,
                "min": 1,
                "max": 1_000_000,
                "description": "Surface pixels per particle"
            },
            "noise_scale": {
                "type": "number",
                "default": DEFAULT_NOISE_SCALE,
                "min": 0.0,
                "max": 1.0,
                "description": "Spatial frequency of the flow field"
            },
            "time_step": {
                "type": "number",
                "default": DEFAULT_TIME_STEP,
                "min": 0.0,
                "max": 1.0,
                "description": "How fast the field evolves per frame"
            },
            "seed": {
                "type": "integer",
                "default": null,
                "description": "Seed for particles and noise table; omitted means random"
            }
        })
    }
}
