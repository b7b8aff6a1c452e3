#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations, drives them with a
//! host frame loop, and writes PNG snapshots of the result.
//!
//! This crate sits between `canvas-lab-core` (which defines the `Engine`
//! trait) and the individual engine crates. The CLI depends on it so that
//! dispatch and the frame loop live in one place.

pub mod host;
pub mod version;

#[cfg(feature = "png")]
pub mod snapshot;

use canvas_lab_core::{Engine, EngineError, Surface};
use canvas_lab_flow_field::FlowField;
use canvas_lab_life::GameOfLife;
use canvas_lab_reaction_diffusion::ReactionDiffusion;
use serde_json::Value;

pub use host::{Cadence, FrameLoop, ResizeDebounce};
pub use version::EngineVersion;

/// Enumeration of all available simulations.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction.
pub enum EngineKind {
    Life(GameOfLife),
    Flow(FlowField),
    Diffusion(ReactionDiffusion),
}

impl EngineKind {
    /// Constructs the engine for `version` with JSON parameter overrides.
    pub fn create(version: EngineVersion, params: &Value) -> Self {
        match version {
            EngineVersion::Life => EngineKind::Life(GameOfLife::from_json(params)),
            EngineVersion::Flow => EngineKind::Flow(FlowField::from_json(params)),
            EngineVersion::Diffusion => {
                EngineKind::Diffusion(ReactionDiffusion::from_json(params))
            }
        }
    }

    /// Constructs an engine by tag, label or slug.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, EngineError> {
        let version: EngineVersion = name.parse()?;
        log::debug!("creating engine {} ({})", version.slug(), version.tag());
        Ok(Self::create(version, params))
    }

    pub fn version(&self) -> EngineVersion {
        match self {
            EngineKind::Life(_) => EngineVersion::Life,
            EngineKind::Flow(_) => EngineVersion::Flow,
            EngineKind::Diffusion(_) => EngineVersion::Diffusion,
        }
    }

    /// Every available engine, in tag order.
    pub fn list_engines() -> &'static [EngineVersion] {
        &EngineVersion::ALL
    }
}

impl Engine for EngineKind {
    fn init(&mut self, surface: &mut dyn Surface) {
        match self {
            EngineKind::Life(e) => e.init(surface),
            EngineKind::Flow(e) => e.init(surface),
            EngineKind::Diffusion(e) => e.init(surface),
        }
    }

    fn update(&mut self) {
        match self {
            EngineKind::Life(e) => e.update(),
            EngineKind::Flow(e) => e.update(),
            EngineKind::Diffusion(e) => e.update(),
        }
    }

    fn render(&mut self, ctx: &mut dyn Surface) {
        match self {
            EngineKind::Life(e) => e.render(ctx),
            EngineKind::Flow(e) => e.render(ctx),
            EngineKind::Diffusion(e) => e.render(ctx),
        }
    }

    fn on_mouse_move(&mut self, x: f64, y: f64) {
        match self {
            EngineKind::Life(e) => e.on_mouse_move(x, y),
            EngineKind::Flow(e) => e.on_mouse_move(x, y),
            EngineKind::Diffusion(e) => e.on_mouse_move(x, y),
        }
    }

    fn on_mouse_click(&mut self, x: f64, y: f64) {
        match self {
            EngineKind::Life(e) => e.on_mouse_click(x, y),
            EngineKind::Flow(e) => e.on_mouse_click(x, y),
            EngineKind::Diffusion(e) => e.on_mouse_click(x, y),
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        match self {
            EngineKind::Life(e) => e.resize(width, height),
            EngineKind::Flow(e) => e.resize(width, height),
            EngineKind::Diffusion(e) => e.resize(width, height),
        }
    }

    fn destroy(&mut self) {
        match self {
            EngineKind::Life(e) => e.destroy(),
            EngineKind::Flow(e) => e.destroy(),
            EngineKind::Diffusion(e) => e.destroy(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Life(e) => e.params(),
            EngineKind::Flow(e) => e.params(),
            EngineKind::Diffusion(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Life(e) => e.param_schema(),
            EngineKind::Flow(e) => e.param_schema(),
            EngineKind::Diffusion(e) => e.param_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_lab_core::Raster;
    use serde_json::json;

    #[test]
    fn from_name_accepts_every_spelling() {
        for name in ["v1", "Flow", "reaction-diffusion"] {
            assert!(EngineKind::from_name(name, &json!({})).is_ok(), "{name}");
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = EngineKind::from_name("nonexistent", &json!({}));
        assert!(matches!(result, Err(EngineError::UnknownEngine(_))));
    }

    #[test]
    fn list_engines_covers_all_versions() {
        let names: Vec<_> = EngineKind::list_engines().iter().map(|v| v.tag()).collect();
        assert_eq!(names, vec!["v1", "v2", "v3"]);
    }

    #[test]
    fn create_maps_version_to_variant() {
        for v in EngineVersion::ALL {
            assert_eq!(EngineKind::create(v, &json!({})).version(), v);
        }
    }

    #[test]
    fn trait_delegation_params_and_schema() {
        let life = EngineKind::from_name("v1", &json!({"tick_interval": 4})).unwrap();
        assert_eq!(life.params()["tick_interval"], 4);
        let flow = EngineKind::from_name("v2", &json!({})).unwrap();
        assert!(flow.param_schema().get("noise_scale").is_some());
        let diffusion = EngineKind::from_name("v3", &json!({})).unwrap();
        assert!(diffusion.params().get("feed_rate").is_some());
    }

    #[test]
    fn determinism_same_seed() {
        for v in EngineVersion::ALL {
            let mut a = EngineKind::create(v, &json!({"seed": 99}));
            let mut b = EngineKind::create(v, &json!({"seed": 99}));
            let mut ra = Raster::new(64, 48);
            let mut rb = Raster::new(64, 48);
            a.init(&mut ra);
            b.init(&mut rb);
            for _ in 0..10 {
                a.update();
                a.render(&mut ra);
                b.update();
                b.render(&mut rb);
            }
            assert_eq!(ra.pixels(), rb.pixels(), "{v}");
        }
    }

    #[test]
    fn object_safety() {
        let engine = EngineKind::from_name("v3", &json!({})).unwrap();
        let mut boxed: Box<dyn Engine> = Box::new(engine);
        let mut raster = Raster::new(16, 16);
        boxed.init(&mut raster);
        boxed.update();
        boxed.render(&mut raster);
        boxed.destroy();
    }
}
