#![deny(unsafe_code)]
//! Core types and traits for canvas-lab, a set of real-time generative-art
//! simulations drawn onto a pixel canvas.
//!
//! Provides the `Engine` trait, the `Surface` drawing boundary and its CPU
//! `Raster` implementation, CSS-style `Rgba` colours, the `GradientNoise`
//! primitive, grid/double-buffer helpers, the `Xorshift64` PRNG, JSON
//! parameter helpers, and the `Seed` run description.

pub mod color;
pub mod engine;
pub mod error;
pub mod grid;
pub mod noise;
pub mod params;
pub mod prng;
pub mod raster;
pub mod seed;
pub mod surface;

pub use color::Rgba;
pub use engine::Engine;
pub use error::EngineError;
pub use grid::{DoubleBuffer, GridSize};
pub use crate::noise::{noise3d, GradientNoise};
pub use prng::Xorshift64;
pub use raster::Raster;
pub use seed::{PointerEvent, PointerKind, Seed};
pub use surface::{ImageSmoothing, Segment, Surface};
