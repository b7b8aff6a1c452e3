#![deny(unsafe_code)]
//! Gray-Scott reaction-diffusion engine.
//!
//! Two chemicals (A substrate, B activator) react and diffuse on a grid a
//! half or third of the surface resolution. A is fed at rate F and consumed
//! by the reaction A + 2B → 3B; B is removed at rate (F + k). The coral
//! preset (F=0.055, k=0.062) grows branching structures from a few seeded
//! patches.
//!
//! The B concentration is colour-mapped into an offscreen [`Raster`] at grid
//! resolution and blitted up to the surface with nearest-neighbour sampling,
//! which keeps the blocky look of the low-resolution grid.

use canvas_lab_core::grid::{disc_offsets, DoubleBuffer, GridSize};
use canvas_lab_core::params::{param_f64_in, param_seed, param_usize_in};
use canvas_lab_core::surface::clamp_extent;
use canvas_lab_core::{Engine, ImageSmoothing, Raster, Surface, Xorshift64};
use rand::Rng;
use serde_json::{json, Value};

/// Default feed rate: how fast A is replenished.
const DEFAULT_FEED_RATE: f64 = 0.055;
/// Default kill rate: how fast B is removed.
const DEFAULT_KILL_RATE: f64 = 0.062;
const DEFAULT_DIFFUSION_A: f64 = 1.0;
const DEFAULT_DIFFUSION_B: f64 = 0.5;
const DEFAULT_DT: f64 = 1.0;
/// Solver sub-steps per `update()`.
const DEFAULT_SUBSTEPS: usize = 8;

/// Surfaces wider than this use a coarser grid.
const WIDE_SURFACE: usize = 1000;
const FINE_SCALE: usize = 2;
const COARSE_SCALE: usize = 3;

const SEED_RADIUS: usize = 6;
const SEED_MARGIN: f64 = 10.0;
const MIN_SEED_PATCHES: usize = 5;
const MAX_SEED_PATCHES: usize = 9;

const HOVER_RADIUS: usize = 4;
const CLICK_RADIUS: usize = 8;

/// Simulation parameters for the Gray-Scott model.
///
/// Use [`Default`] for the coral preset (F=0.055, k=0.062).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionDiffusionParams {
    /// Feed rate (F): how fast substrate A is replenished.
    pub feed_rate: f64,
    /// Kill rate (k): how fast activator B is removed.
    pub kill_rate: f64,
    /// Diffusion rate for A.
    pub diffusion_a: f64,
    /// Diffusion rate for B.
    pub diffusion_b: f64,
    /// Time step per sub-step.
    pub dt: f64,
    pub substeps: usize,
    /// Seed for the initial patches; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ReactionDiffusionParams {
    fn default() -> Self {
        Self {
            feed_rate: DEFAULT_FEED_RATE,
            kill_rate: DEFAULT_KILL_RATE,
            diffusion_a: DEFAULT_DIFFUSION_A,
            diffusion_b: DEFAULT_DIFFUSION_B,
            dt: DEFAULT_DT,
            substeps: DEFAULT_SUBSTEPS,
            seed: None,
        }
    }
}

impl ReactionDiffusionParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            feed_rate: param_f64_in(params, "feed_rate", DEFAULT_FEED_RATE, 0.0..=0.1),
            kill_rate: param_f64_in(params, "kill_rate", DEFAULT_KILL_RATE, 0.0..=0.1),
            diffusion_a: param_f64_in(params, "diffusion_a", DEFAULT_DIFFUSION_A, 0.0..=2.0),
            diffusion_b: param_f64_in(params, "diffusion_b", DEFAULT_DIFFUSION_B, 0.0..=2.0),
            dt: param_f64_in(params, "dt", DEFAULT_DT, 0.0..=2.0),
            substeps: param_usize_in(params, "substeps", DEFAULT_SUBSTEPS, 0..=64),
            seed: param_seed(params),
        }
    }
}

/// Gray-Scott engine with a 5-point Laplacian and explicit Euler steps.
///
/// Only interior cells are integrated; the one-cell border keeps whatever
/// was written there (A=1, B=0 unless a pointer injection reached it).
pub struct ReactionDiffusion {
    params: ReactionDiffusionParams,
    rng: Xorshift64,
    width: usize,
    height: usize,
    scale: usize,
    grid: GridSize,
    a: DoubleBuffer<f32>,
    b: DoubleBuffer<f32>,
    offscreen: Raster,
}

impl ReactionDiffusion {
    pub fn new(params: ReactionDiffusionParams) -> Self {
        Self {
            rng: Xorshift64::from_optional_seed(params.seed),
            params,
            width: 0,
            height: 0,
            scale: FINE_SCALE,
            grid: GridSize::default(),
            a: DoubleBuffer::default(),
            b: DoubleBuffer::default(),
            offscreen: Raster::new(1, 1),
        }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(ReactionDiffusionParams::from_json(params))
    }

    /// Surface pixels per grid cell: 3 on surfaces wider than 1000 px, else 2.
    pub fn scale_for(width: usize) -> usize {
        if width > WIDE_SURFACE {
            COARSE_SCALE
        } else {
            FINE_SCALE
        }
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    /// Current substrate concentrations, row-major.
    pub fn a_field(&self) -> &[f32] {
        self.a.front()
    }

    /// Current activator concentrations, row-major.
    pub fn b_field(&self) -> &[f32] {
        self.b.front()
    }

    pub fn feed_rate(&self) -> f64 {
        self.params.feed_rate
    }

    pub fn kill_rate(&self) -> f64 {
        self.params.kill_rate
    }

    /// The grid-resolution image blitted by `render`.
    pub fn offscreen(&self) -> &Raster {
        &self.offscreen
    }

    /// Reallocates both fields and the offscreen raster, then seeds patches.
    fn allocate(&mut self, width: usize, height: usize) {
        self.width = clamp_extent(width);
        self.height = clamp_extent(height);
        self.scale = Self::scale_for(self.width);
        self.grid = GridSize::new(
            self.width.div_ceil(self.scale),
            self.height.div_ceil(self.scale),
        );
        self.a = DoubleBuffer::filled(self.grid.len(), 1.0);
        self.b = DoubleBuffer::filled(self.grid.len(), 0.0);
        self.offscreen = Raster::new(self.grid.cols, self.grid.rows);

        let patches = self.seed_patches();
        log::debug!(
            "reaction-diffusion: {}x{} surface -> {}x{} grid at scale {}, {} patches",
            self.width,
            self.height,
            self.grid.cols,
            self.grid.rows,
            self.scale,
            patches
        );
    }

    /// Drops 5–9 radius-6 patches of B, centred at least 10 cells in from
    /// each edge where the grid allows it.
    fn seed_patches(&mut self) -> usize {
        let count = self.rng.gen_range(MIN_SEED_PATCHES..=MAX_SEED_PATCHES);
        let span_x = self.grid.cols as f64 - 2.0 * SEED_MARGIN;
        let span_y = self.grid.rows as f64 - 2.0 * SEED_MARGIN;
        for _ in 0..count {
            let cx = (self.rng.gen::<f64>() * span_x + SEED_MARGIN).floor() as isize;
            let cy = (self.rng.gen::<f64>() * span_y + SEED_MARGIN).floor() as isize;
            self.inject(cx, cy, SEED_RADIUS);
        }
        count
    }

    /// Sets B=1 in a disc around grid cell `(cx, cy)`, clipped to the grid.
    fn inject(&mut self, cx: isize, cy: isize, radius: usize) {
        for (dx, dy) in disc_offsets(radius as isize) {
            let (x, y) = (cx.saturating_add(dx), cy.saturating_add(dy));
            if let Some(idx) = self.grid.checked_index(x, y) {
                self.b.set_both(idx, 1.0);
            }
        }
    }

    /// Injects around surface point `(x, y)`.
    fn inject_at(&mut self, x: f64, y: f64, radius: usize) {
        if self.grid.is_empty() {
            return;
        }
        let s = self.scale as f64;
        self.inject((x / s).floor() as isize, (y / s).floor() as isize, radius);
    }

    /// One explicit Euler sub-step over interior cells, then swap.
    fn substep(&mut self) {
        let GridSize { cols, rows } = self.grid;
        let f = self.params.feed_rate as f32;
        let k = self.params.kill_rate as f32;
        let da = self.params.diffusion_a as f32;
        let db = self.params.diffusion_b as f32;
        let dt = self.params.dt as f32;

        let (a, a_next) = self.a.split();
        let (b, b_next) = self.b.split();

        for y in 1..rows.saturating_sub(1) {
            for x in 1..cols.saturating_sub(1) {
                let idx = y * cols + x;
                let av = a[idx];
                let bv = b[idx];
                let lap_a = laplacian_5pt(a, idx, cols);
                let lap_b = laplacian_5pt(b, idx, cols);
                let abb = av * bv * bv;

                a_next[idx] = (av + (da * lap_a - abb + f * (1.0 - av)) * dt).clamp(0.0, 1.0);
                b_next[idx] = (bv + (db * lap_b + abb - (k + f) * bv) * dt).clamp(0.0, 1.0);
            }
        }

        self.a.swap();
        self.b.swap();
    }
}

/// 5-point Laplacian at interior index `idx`:
///
/// ```text
///        1
///    1  -4   1
///        1
/// ```
fn laplacian_5pt(data: &[f32], idx: usize, cols: usize) -> f32 {
    data[idx - 1] + data[idx + 1] + data[idx - cols] + data[idx + cols] - 4.0 * data[idx]
}

/// Maps a B concentration onto the dark → teal → white ramp.
pub fn concentration_color(b: f32) -> [u8; 4] {
    let t = (b * 2.5).min(1.0);
    [
        (t * t * 200.0).floor() as u8,
        (t * 220.0 + (1.0 - t) * 8.0).floor() as u8,
        (t * 180.0 + (1.0 - t) * 15.0).floor() as u8,
        255,
    ]
}

impl Engine for ReactionDiffusion {
    fn init(&mut self, surface: &mut dyn Surface) {
        self.allocate(surface.width(), surface.height());
    }

    fn update(&mut self) {
        for _ in 0..self.params.substeps {
            self.substep();
        }
    }

    fn render(&mut self, ctx: &mut dyn Surface) {
        if self.b.len() != self.grid.len() || self.grid.is_empty() {
            return;
        }
        let pixels = self.offscreen.pixels_mut();
        for (px, &b) in pixels.chunks_exact_mut(4).zip(self.b.front()) {
            px.copy_from_slice(&concentration_color(b));
        }
        ctx.draw_image(
            &self.offscreen,
            0.0,
            0.0,
            self.width as f64,
            self.height as f64,
            ImageSmoothing::Disabled,
        );
    }

    /// Dragging paints B continuously.
    fn on_mouse_move(&mut self, x: f64, y: f64) {
        self.inject_at(x, y, HOVER_RADIUS);
    }

    fn on_mouse_click(&mut self, x: f64, y: f64) {
        log::trace!("reaction-diffusion: click at ({x}, {y})");
        self.inject_at(x, y, CLICK_RADIUS);
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.allocate(width, height);
    }

    fn destroy(&mut self) {
        self.a.release();
        self.b.release();
        self.grid = GridSize::default();
        self.offscreen = Raster::new(1, 1);
        log::debug!("reaction-diffusion: destroyed");
    }

    fn params(&self) -> Value {
        json!({
            "feed_rate": self.params.feed_rate,
            "kill_rate": self.params.kill_rate,
            "diffusion_a": self.params.diffusion_a,
            "diffusion_b": self.params.diffusion_b,
            "dt": self.params.dt,
            "substeps": self.params.substeps,
            "seed": self.params.seed,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "feed_rate": {
                "type": "number",
                "default": DEFAULT_FEED_RATE,
                "min": 0.0,
                "max": 0.1,
                "description": "Feed rate (F): how fast substrate A is replenished"
            },
            "kill_rate": {
                "type": "number",
                "default": DEFAULT_KILL_RATE,
                "min": 0.0,
                "max": 0.1,
                "description": "Kill rate (k): how fast activator B is removed"
            },
            "diffusion_a": {
                "type": "number",
                "default": DEFAULT_DIFFUSION_A,
                "min": 0.0,
                "max": 2.0,
                "description": "Diffusion rate for A (substrate)"
            },
            "diffusion_b": {
                "type": "number",
                "default": DEFAULT_DIFFUSION_B,
                "min": 0.0,
                "max": 2.0,
                "description": "Diffusion rate for B (activator)"
            },
            "dt": {
                "type": "number",
                "default": DEFAULT_DT,
                "min": 0.0,
                "max": 2.0,
                "description": "Time step per sub-step"
            },
            "substeps": {
                "type": "integer",
                "default": DEFAULT_SUBSTEPS,
                "min": 0,
                "max": 64,
                "description": "Solver sub-steps per frame"
            },
            "seed": {
                "type": "integer",
                "default": null,
                "description": "Seed for the initial patches; omitted means random"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> ReactionDiffusionParams {
        ReactionDiffusionParams {
            seed: Some(seed),
            ..ReactionDiffusionParams::default()
        }
    }

    fn rd_with(width: usize, height: usize, params: ReactionDiffusionParams) -> ReactionDiffusion {
        let mut engine = ReactionDiffusion::new(params);
        engine.init(&mut Raster::new(width, height));
        engine
    }

    fn rd(width: usize, height: usize, seed: u64) -> ReactionDiffusion {
        rd_with(width, height, seeded(seed))
    }

    /// Resets both fields to the unreacted state A=1, B=0.
    fn clear(engine: &mut ReactionDiffusion) {
        let len = engine.grid.len();
        engine.a = DoubleBuffer::filled(len, 1.0);
        engine.b = DoubleBuffer::filled(len, 0.0);
    }

    // ---- Construction tests ----

    #[test]
    fn scale_depends_on_surface_width() {
        assert_eq!(ReactionDiffusion::scale_for(1000), 2);
        assert_eq!(ReactionDiffusion::scale_for(1001), 3);
    }

    #[test]
    fn grid_dimensions_round_up() {
        let engine = rd(201, 99, 1);
        assert_eq!(engine.grid_size(), GridSize::new(101, 50));
        let wide = rd(1920, 1080, 1);
        assert_eq!(wide.scale(), 3);
        assert_eq!(wide.grid_size(), GridSize::new(640, 360));
        assert_eq!(wide.offscreen().width(), 640);
        assert_eq!(wide.offscreen().height(), 360);
    }

    #[test]
    fn init_has_unit_substrate_and_seeded_patches() {
        let engine = rd(200, 200, 42);
        assert!(engine.a_field().iter().all(|&a| a == 1.0));
        let seeded = engine.b_field().iter().filter(|&&b| b == 1.0).count();
        // 5–9 radius-6 discs of 113 cells, possibly overlapping.
        assert!(seeded >= 113, "got {seeded}");
        assert!(seeded <= 9 * 113, "got {seeded}");
        assert!(engine.b_field().iter().all(|&b| b == 0.0 || b == 1.0));
    }

    #[test]
    fn patches_avoid_the_margin() {
        let engine = rd(200, 200, 7);
        let GridSize { cols, rows } = engine.grid_size();
        // Centres lie in [10, cols - 10), so nothing lands within 3 cells of an edge.
        for y in 0..rows {
            for x in 0..cols {
                if x < 4 || y < 4 || x >= cols - 4 || y >= rows - 4 {
                    assert_eq!(engine.b_field()[y * cols + x], 0.0, "({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn tiny_surface_seeds_without_panicking() {
        let mut engine = rd(0, 0, 3);
        assert_eq!(engine.grid_size(), GridSize::new(1, 1));
        engine.update();
        engine.render(&mut Raster::new(1, 1));
    }

    #[test]
    fn from_json_extracts_custom_values() {
        let params = json!({
            "feed_rate": 0.04,
            "kill_rate": 0.06,
            "diffusion_a": 0.8,
            "diffusion_b": 0.4,
            "dt": 0.5,
            "substeps": 2,
        });
        let engine = ReactionDiffusion::from_json(&params);
        assert!((engine.feed_rate() - 0.04).abs() < f64::EPSILON);
        assert!((engine.kill_rate() - 0.06).abs() < f64::EPSILON);
        let p = engine.params();
        assert!((p["diffusion_a"].as_f64().unwrap() - 0.8).abs() < f64::EPSILON);
        assert!((p["diffusion_b"].as_f64().unwrap() - 0.4).abs() < f64::EPSILON);
        assert!((p["dt"].as_f64().unwrap() - 0.5).abs() < f64::EPSILON);
        assert_eq!(p["substeps"], 2);
    }

    #[test]
    fn param_schema_covers_every_parameter() {
        let engine = ReactionDiffusion::new(ReactionDiffusionParams::default());
        let schema = engine.param_schema();
        for key in [
            "feed_rate",
            "kill_rate",
            "diffusion_a",
            "diffusion_b",
            "dt",
            "substeps",
            "seed",
        ] {
            assert!(schema.get(key).is_some(), "schema missing parameter: {key}");
            assert!(schema[key].get("type").is_some(), "{key} missing 'type'");
            assert!(
                schema[key].get("description").is_some(),
                "{key} missing 'description'"
            );
        }
    }

    // ---- Determinism tests ----

    #[test]
    fn same_seed_identical_after_steps() {
        let mut a = rd(120, 120, 12345);
        let mut b = rd(120, 120, 12345);
        for _ in 0..20 {
            a.update();
            b.update();
        }
        assert_eq!(a.a_field(), b.a_field());
        assert_eq!(a.b_field(), b.b_field());
    }

    #[test]
    fn resize_to_same_size_reseeds() {
        let mut engine = rd(200, 200, 9);
        let before = engine.b_field().to_vec();
        engine.resize(200, 200);
        assert_eq!(engine.grid_size(), GridSize::new(100, 100));
        assert_ne!(engine.b_field(), &before[..]);
    }

    // ---- Step correctness tests ----

    #[test]
    fn unreacted_field_is_steady_without_feed_or_kill() {
        let params = ReactionDiffusionParams {
            feed_rate: 0.0,
            kill_rate: 0.0,
            ..seeded(42)
        };
        let mut engine = rd_with(64, 64, params);
        clear(&mut engine);
        for _ in 0..10 {
            engine.update();
        }
        assert!(engine.a_field().iter().all(|&a| a == 1.0));
        assert!(engine.b_field().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn values_remain_in_unit_interval() {
        let mut engine = rd(96, 96, 42);
        for _ in 0..60 {
            engine.update();
        }
        assert!(engine.a_field().iter().all(|&a| (0.0..=1.0).contains(&a)));
        assert!(engine.b_field().iter().all(|&b| (0.0..=1.0).contains(&b)));
    }

    #[test]
    fn border_cells_are_never_integrated() {
        let mut engine = rd(64, 64, 5);
        clear(&mut engine);
        engine.on_mouse_click(0.0, 0.0);
        let corner = engine.b_field()[0];
        for _ in 0..5 {
            engine.update();
        }
        assert_eq!(engine.b_field()[0], corner);
        assert_eq!(engine.a_field()[0], 1.0);
    }

    #[test]
    fn buffers_swap_once_per_substep() {
        let params = ReactionDiffusionParams {
            substeps: 3,
            ..seeded(6)
        };
        let mut engine = rd_with(32, 32, params);
        engine.update();
        assert_eq!(engine.a.current_index(), 1);
        assert_eq!(engine.b.current_index(), 1);
    }

    #[test]
    fn laplacian_of_uniform_field_is_zero() {
        let data = vec![0.5_f32; 16 * 16];
        assert_eq!(laplacian_5pt(&data, 5 * 16 + 5, 16), 0.0);
    }

    #[test]
    fn laplacian_of_spike_is_negative_at_centre_and_positive_beside() {
        let mut data = vec![0.0_f32; 8 * 8];
        data[3 * 8 + 3] = 1.0;
        assert_eq!(laplacian_5pt(&data, 3 * 8 + 3, 8), -4.0);
        assert_eq!(laplacian_5pt(&data, 3 * 8 + 4, 8), 1.0);
        assert_eq!(laplacian_5pt(&data, 4 * 8 + 4, 8), 0.0);
    }

    #[test]
    fn zero_dt_produces_no_change() {
        let params = ReactionDiffusionParams {
            dt: 0.0,
            ..seeded(42)
        };
        let mut engine = rd_with(64, 64, params);
        let a_before = engine.a_field().to_vec();
        let b_before = engine.b_field().to_vec();
        engine.update();
        assert_eq!(engine.a_field(), &a_before[..]);
        assert_eq!(engine.b_field(), &b_before[..]);
    }

    #[test]
    fn coral_preset_grows_activator() {
        let mut engine = rd(160, 160, 42);
        let initial: f32 = engine.b_field().iter().sum();
        for _ in 0..100 {
            engine.update();
        }
        let grown: f32 = engine.b_field().iter().sum();
        assert!(grown > 0.0, "activator died out");
        assert!(grown != initial);
    }

    // ---- Interaction tests ----

    #[test]
    fn click_at_origin_fills_clipped_disc() {
        let mut engine = rd(200, 200, 11);
        clear(&mut engine);
        engine.on_mouse_click(0.0, 0.0);
        let GridSize { cols, .. } = engine.grid_size();
        let expected: Vec<usize> = disc_offsets(8)
            .filter(|&(dx, dy)| dx >= 0 && dy >= 0)
            .map(|(dx, dy)| dy as usize * cols + dx as usize)
            .collect();
        assert_eq!(expected.len(), 58);
        for (i, &b) in engine.b_field().iter().enumerate() {
            let inside = expected.contains(&i);
            assert_eq!(b, if inside { 1.0 } else { 0.0 }, "cell {i}");
        }
    }

    #[test]
    fn move_injects_radius_four_at_scaled_position() {
        let mut engine = rd(200, 200, 12);
        clear(&mut engine);
        engine.on_mouse_move(101.0, 61.0);
        let cols = engine.grid_size().cols;
        let count = engine.b_field().iter().filter(|&&b| b == 1.0).count();
        assert_eq!(count, disc_offsets(4).count());
        assert_eq!(engine.b_field()[30 * cols + 50], 1.0);
        assert_eq!(engine.b_field()[30 * cols + 54], 1.0);
        assert_eq!(engine.b_field()[30 * cols + 55], 0.0);
    }

    #[test]
    fn far_out_of_bounds_pointer_is_ignored() {
        let mut engine = rd(100, 100, 13);
        clear(&mut engine);
        engine.on_mouse_move(-500.0, -500.0);
        engine.on_mouse_click(10_000.0, 50.0);
        assert!(engine.b_field().iter().all(|&b| b == 0.0));
    }

    #[test]
    fn extreme_pointer_coordinates_are_ignored() {
        let mut engine = rd(100, 100, 14);
        clear(&mut engine);
        engine.on_mouse_click(f64::MAX, 0.0);
        engine.on_mouse_move(f64::INFINITY, 0.0);
        engine.on_mouse_move(f64::NEG_INFINITY, f64::MIN);
        assert!(engine.b_field().iter().all(|&b| b == 0.0));
    }

    // ---- Rendering tests ----

    #[test]
    fn concentration_ramp_endpoints() {
        assert_eq!(concentration_color(0.0), [0, 8, 15, 255]);
        assert_eq!(concentration_color(0.4), [200, 220, 180, 255]);
        assert_eq!(concentration_color(1.0), [200, 220, 180, 255]);
    }

    #[test]
    fn render_blits_blocky_grid_to_full_surface() {
        let mut engine = rd(20, 20, 14);
        clear(&mut engine);
        let cols = engine.grid_size().cols;
        engine.b.set_both(2 * cols + 3, 1.0);

        let mut surface = Raster::new(20, 20);
        engine.render(&mut surface);
        // Grid cell (3, 2) covers surface pixels x 6..8, y 4..6.
        for (x, y) in [(6, 4), (7, 4), (6, 5), (7, 5)] {
            assert_eq!(surface.pixel(x, y), [200, 220, 180, 255]);
        }
        assert_eq!(surface.pixel(8, 4), [0, 8, 15, 255]);
        assert_eq!(surface.pixel(0, 0), [0, 8, 15, 255]);
        assert_eq!(surface.pixel(19, 19), [0, 8, 15, 255]);
    }

    // ---- Lifecycle tests ----

    #[test]
    fn destroy_is_idempotent() {
        let mut engine = rd(100, 100, 15);
        engine.destroy();
        engine.destroy();
        assert!(engine.a_field().is_empty());
        engine.update();
        engine.on_mouse_click(1.0, 1.0);
        engine.on_mouse_move(1.0, 1.0);
        engine.render(&mut Raster::new(4, 4));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn concentrations_stay_in_unit_interval(
                w in 4_usize..120,
                h in 4_usize..120,
                seed: u64,
                feed in 0.0_f64..0.1,
                kill in 0.0_f64..0.1,
            ) {
                let params = ReactionDiffusionParams {
                    feed_rate: feed,
                    kill_rate: kill,
                    ..seeded(seed)
                };
                let mut engine = rd_with(w, h, params);
                engine.on_mouse_click(w as f64 / 2.0, h as f64 / 2.0);
                for _ in 0..4 {
                    engine.update();
                    for &v in engine.a_field().iter().chain(engine.b_field()) {
                        prop_assert!((0.0..=1.0).contains(&v));
                    }
                }
            }

            #[test]
            fn injection_never_writes_outside_grid(
                x in -400.0_f64..400.0,
                y in -400.0_f64..400.0,
            ) {
                let mut engine = rd(100, 60, 1);
                clear(&mut engine);
                engine.on_mouse_click(x, y);
                prop_assert_eq!(engine.b_field().len(), 50 * 30);
            }
        }
    }
}
