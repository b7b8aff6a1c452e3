#![deny(unsafe_code)]
//! Conway's Game of Life on a toroidal grid, coloured by cell age.
//!
//! The surface is divided into square cells (4–8 px depending on surface
//! size). Every few frames the grid advances one generation under the
//! standard B3/S23 rule. Each cell carries an age that climbs while it lives
//! and decays quickly once it dies, so living cells sweep through a
//! blue → cyan → green → yellow → red gradient and dead ones leave a fading
//! blue-grey ghost.
//!
//! Pointer hover and clicks stochastically bring cells to life around the
//! pointer.

use canvas_lab_core::grid::{disc_offsets, DoubleBuffer, GridSize};
use canvas_lab_core::params::{param_f64_in, param_seed, param_usize_in};
use canvas_lab_core::surface::clamp_extent;
use canvas_lab_core::{Engine, Rgba, Surface, Xorshift64};
use rand::Rng;
use serde_json::{json, Value};

/// Frames per generation.
const DEFAULT_TICK_INTERVAL: usize = 3;
/// Probability that a cell starts alive.
const DEFAULT_SEED_DENSITY: f64 = 0.15;
/// Disc radius (cells) stirred around a hovering pointer on every generation.
const DEFAULT_HOVER_RADIUS: usize = 3;
/// Disc radius (cells) activated by a click.
const DEFAULT_CLICK_RADIUS: usize = 8;
/// Chance that each candidate cell in a stirred disc is brought to life.
const DEFAULT_ACTIVATION_PROBABILITY: f64 = 0.4;

const MIN_CELL_SIZE: usize = 4;
const MAX_CELL_SIZE: usize = 8;
/// Surface pixels (of the shorter side) per unit of cell size.
const CELL_SIZE_DIVISOR: usize = 150;

const MAX_AGE: f32 = 255.0;
const AGE_GROWTH: f32 = 1.0;
const AGE_DECAY: f32 = 8.0;
/// Age at which a living cell reaches the red end of the gradient.
const AGE_GRADIENT_SPAN: f32 = 120.0;

const TRAIL_OVERLAY: Rgba = Rgba {
    r: 0,
    g: 0,
    b: 8,
    a: 0.3,
};

/// Tunable constants for [`GameOfLife`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifeParams {
    pub tick_interval: usize,
    pub seed_density: f64,
    pub hover_radius: usize,
    pub click_radius: usize,
    pub activation_probability: f64,
    /// PRNG seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for LifeParams {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            seed_density: DEFAULT_SEED_DENSITY,
            hover_radius: DEFAULT_HOVER_RADIUS,
            click_radius: DEFAULT_CLICK_RADIUS,
            activation_probability: DEFAULT_ACTIVATION_PROBABILITY,
            seed: None,
        }
    }
}

impl LifeParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            tick_interval: param_usize_in(
                params,
                "tick_interval",
                DEFAULT_TICK_INTERVAL,
                1..=600,
            ),
            seed_density: param_f64_in(params, "seed_density", DEFAULT_SEED_DENSITY, 0.0..=1.0),
            hover_radius: param_usize_in(params, "hover_radius", DEFAULT_HOVER_RADIUS, 0..=64),
            click_radius: param_usize_in(params, "click_radius", DEFAULT_CLICK_RADIUS, 0..=64),
            activation_probability: param_f64_in(
                params,
                "activation_probability",
                DEFAULT_ACTIVATION_PROBABILITY,
                0.0..=1.0,
            ),
            seed: param_seed(params),
        }
    }
}

/// Game of Life engine.
///
/// `alive` holds 0/1 per cell and is double-buffered; `age` is a single
/// buffer updated in the same pass that writes the next generation.
pub struct GameOfLife {
    params: LifeParams,
    rng: Xorshift64,
    width: usize,
    height: usize,
    cell_size: usize,
    grid: GridSize,
    alive: DoubleBuffer<u8>,
    age: Vec<f32>,
    pointer: Option<(f64, f64)>,
    frame_count: u64,
}

impl GameOfLife {
    /// Creates an engine with no grid; [`Engine::init`] allocates it.
    pub fn new(params: LifeParams) -> Self {
        Self {
            rng: Xorshift64::from_optional_seed(params.seed),
            params,
            width: 0,
            height: 0,
            cell_size: MIN_CELL_SIZE,
            grid: GridSize::default(),
            alive: DoubleBuffer::default(),
            age: Vec::new(),
            pointer: None,
            frame_count: 0,
        }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(LifeParams::from_json(params))
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    /// Current generation, one byte (0/1) per cell, row-major.
    pub fn cells(&self) -> &[u8] {
        self.alive.front()
    }

    /// Per-cell age in [0, 255], row-major.
    pub fn ages(&self) -> &[f32] {
        &self.age
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.alive.front()[self.grid.index(x, y)] != 0
    }

    pub fn live_count(&self) -> usize {
        self.alive.front().iter().filter(|&&c| c != 0).count()
    }

    /// Cell size for a surface: a 150th of the shorter side, within 4–8 px.
    pub fn cell_size_for(width: usize, height: usize) -> usize {
        (width.min(height) / CELL_SIZE_DIVISOR).clamp(MIN_CELL_SIZE, MAX_CELL_SIZE)
    }

    /// Reallocates every buffer for `width × height` and reseeds randomly.
    fn allocate(&mut self, width: usize, height: usize) {
        self.width = clamp_extent(width);
        self.height = clamp_extent(height);
        self.cell_size = Self::cell_size_for(self.width, self.height);
        self.grid = GridSize::new(
            self.width.div_ceil(self.cell_size),
            self.height.div_ceil(self.cell_size),
        );

        let density = self.params.seed_density;
        let rng = &mut self.rng;
        let seeded: Vec<u8> = (0..self.grid.len())
            .map(|_| u8::from(rng.gen_bool(density)))
            .collect();
        self.alive = DoubleBuffer::from_front(seeded, 0);
        self.age = vec![0.0; self.grid.len()];

        log::debug!(
            "life: {}x{} surface -> {}x{} cells of {}px, {} alive",
            self.width,
            self.height,
            self.grid.cols,
            self.grid.rows,
            self.cell_size,
            self.live_count()
        );
    }

    /// Computes the next generation into the back buffer, ages every cell,
    /// then makes the back buffer current.
    fn step_generation(&mut self) {
        let grid = self.grid;
        let age = &mut self.age;
        let (current, next) = self.alive.split();

        for y in 0..grid.rows {
            for x in 0..grid.cols {
                let idx = grid.index(x, y);
                let neighbors = live_neighbors(current, grid, x, y);
                let lives = matches!((current[idx] != 0, neighbors), (true, 2 | 3) | (false, 3));
                next[idx] = u8::from(lives);

                age[idx] = if lives {
                    (age[idx] + AGE_GROWTH).min(MAX_AGE)
                } else {
                    (age[idx] - AGE_DECAY).max(0.0)
                };
            }
        }

        self.alive.swap();
    }

    /// Brings cells to life in a disc around surface point `(px, py)`,
    /// wrapping toroidally. Each candidate survives the activation roll with
    /// `activation_probability`; activated cells restart at age 1.
    fn activate(&mut self, px: f64, py: f64, radius: usize) {
        if self.grid.is_empty() {
            return;
        }
        let cs = self.cell_size as f64;
        // Reduce onto the torus first so the offsets below cannot overflow.
        let cx = ((px / cs).floor() as isize).rem_euclid(self.grid.cols as isize);
        let cy = ((py / cs).floor() as isize).rem_euclid(self.grid.rows as isize);
        let probability = self.params.activation_probability;

        for (dx, dy) in disc_offsets(radius as isize) {
            if !self.rng.gen_bool(probability) {
                continue;
            }
            let idx = self.grid.wrapped_index(cx + dx, cy + dy);
            self.alive.front_mut()[idx] = 1;
            self.age[idx] = 1.0;
        }
    }
}

/// Live cells among the 8 toroidal neighbours of `(x, y)`.
fn live_neighbors(cells: &[u8], grid: GridSize, x: usize, y: usize) -> u8 {
    let xs = [(x + grid.cols - 1) % grid.cols, x, (x + 1) % grid.cols];
    let ys = [(y + grid.rows - 1) % grid.rows, y, (y + 1) % grid.rows];
    let mut count = 0;
    for (j, &ny) in ys.iter().enumerate() {
        for (i, &nx) in xs.iter().enumerate() {
            if i == 1 && j == 1 {
                continue;
            }
            count += u8::from(cells[grid.index(nx, ny)] != 0);
        }
    }
    count
}

/// Gradient for living cells: blue → cyan → green → yellow → red as the
/// cell ages from 0 to [`AGE_GRADIENT_SPAN`].
pub fn age_color(age: f32) -> Rgba {
    let t = (age / AGE_GRADIENT_SPAN).min(1.0);
    let g = if t < 0.5 {
        t * 2.0 * 200.0
    } else {
        (1.0 - t) * 2.0 * 200.0 + 55.0
    };
    Rgba::rgb(
        (t * 255.0).floor() as u8,
        g.floor() as u8,
        ((1.0 - t) * 255.0).floor() as u8,
    )
}

/// Translucent blue-grey for a dead cell that is still ageing out.
pub fn ghost_color(age: f32) -> Rgba {
    Rgba::rgba(60, 80, 120, f64::from(age) / 255.0 * 0.4)
}

impl Engine for GameOfLife {
    fn init(&mut self, surface: &mut dyn Surface) {
        self.frame_count = 0;
        self.allocate(surface.width(), surface.height());
    }

    /// Counts frames; only every `tick_interval`-th call runs a generation,
    /// followed by a stir around the hovering pointer, if any.
    fn update(&mut self) {
        if self.grid.is_empty() {
            return;
        }
        self.frame_count += 1;
        if self.frame_count % self.params.tick_interval as u64 != 0 {
            return;
        }
        self.step_generation();
        if let Some((x, y)) = self.pointer {
            self.activate(x, y, self.params.hover_radius);
        }
    }

    fn render(&mut self, ctx: &mut dyn Surface) {
        ctx.fill_rect(
            0.0,
            0.0,
            self.width as f64,
            self.height as f64,
            TRAIL_OVERLAY,
        );

        let cs = self.cell_size as f64;
        let cells = self.alive.front();
        for y in 0..self.grid.rows {
            for x in 0..self.grid.cols {
                let idx = self.grid.index(x, y);
                let age = self.age[idx];
                if age <= 0.0 {
                    continue;
                }
                let color = if cells[idx] != 0 {
                    age_color(age)
                } else {
                    ghost_color(age)
                };
                ctx.fill_rect(x as f64 * cs, y as f64 * cs, cs - 1.0, cs - 1.0, color);
            }
        }
    }

    /// Tracks the pointer; a negative coordinate means it left the surface.
    fn on_mouse_move(&mut self, x: f64, y: f64) {
        self.pointer = (x >= 0.0 && y >= 0.0).then_some((x, y));
    }

    fn on_mouse_click(&mut self, x: f64, y: f64) {
        log::trace!("life: click at ({x}, {y})");
        self.activate(x, y, self.params.click_radius);
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.allocate(width, height);
    }

    fn destroy(&mut self) {
        self.alive.release();
        self.age = Vec::new();
        self.grid = GridSize::default();
        self.pointer = None;
        log::debug!("life: destroyed");
    }

    fn params(&self) -> Value {
        json!({
            "tick_interval": self.params.tick_interval,
            "seed_density": self.params.seed_density,
            "hover_radius": self.params.hover_radius,
            "click_radius": self.params.click_radius,
            "activation_probability": self.params.activation_probability,
            "seed": self.params.seed,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "tick_interval": {
                "type": "integer",
                "default": DEFAULT_TICK_INTERVAL,
                "min": 1,
                "max": 600,
                "description": "Frames per generation"
            },
            "seed_density": {
                "type": "number",
                "default": DEFAULT_SEED_DENSITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Probability that a cell starts alive"
            },
            "hover_radius": {
                "type": "integer",
                "default": DEFAULT_HOVER_RADIUS,
                "min": 0,
                "max": 64,
                "description": "Radius in cells stirred around a hovering pointer each generation"
            },
            "click_radius": {
                "type": "integer",
                "default": DEFAULT_CLICK_RADIUS,
                "min": 0,
                "max": 64,
                "description": "Radius in cells activated by a click"
            },
            "activation_probability": {
                "type": "number",
                "default": DEFAULT_ACTIVATION_PROBABILITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Chance that each cell in a stirred disc comes alive"
            },
            "seed": {
                "type": "integer",
                "default": null,
                "description": "PRNG seed; omitted means a fresh random seed"
            }
        })
    }
}
