//! The `Engine` trait every canvas simulation implements.
//!
//! A host creates an engine, calls [`Engine::init`] once with its surface,
//! then alternates [`Engine::update`] and [`Engine::render`] every frame.
//! Pointer and resize notifications may arrive between any two frames.
//! No method returns an error or blocks.
//!
//! The trait is object-safe so hosts can hold a `Box<dyn Engine>` and swap
//! simulations at runtime.

use serde_json::Value;

use crate::surface::Surface;

/// Lifecycle and input contract shared by all simulations.
///
/// Coordinates are surface pixels relative to the top-left corner.
pub trait Engine {
    /// Allocates and seeds all state for the surface's current size. May
    /// paint an initial background onto `surface`.
    fn init(&mut self, surface: &mut dyn Surface);

    /// Advances the simulation by one frame.
    fn update(&mut self);

    /// Draws the current state.
    fn render(&mut self, ctx: &mut dyn Surface);

    fn on_mouse_move(&mut self, x: f64, y: f64);

    fn on_mouse_click(&mut self, x: f64, y: f64);

    /// Hard reset at a new size: every buffer is reallocated and reseeded.
    /// Zero extents are treated as 1.
    fn resize(&mut self, width: usize, height: usize);

    /// Releases all large buffers. Safe to call more than once.
    fn destroy(&mut self);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter: type, default, range, description.
    fn param_schema(&self) -> Value;
}
