//! Reproducible description of a canvas run.
//!
//! A [`Seed`] captures everything a headless host needs to replay a session:
//! engine tag, surface size, parameter overrides, PRNG seed, frame count,
//! frame cadence, and a script of pointer events keyed by frame number.

use crate::error::EngineError;
use crate::params::SEED_KEY;
use serde::{Deserialize, Serialize};

/// Which pointer callback a scripted event triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Move,
    Click,
}

/// A pointer event delivered before the frame with index `frame` runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub frame: usize,
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}

/// Reproducible description of a canvas run.
///
/// Two identical `Seed` values with a `seed` set produce bit-identical
/// rasters. Without `seed` each run draws fresh entropy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub width: usize,
    pub height: usize,
    #[serde(default = "empty_object")]
    pub params: serde_json::Value,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub frames: usize,
    /// Run `update`/`render` every `cadence`-th frame (1 = every frame).
    #[serde(default = "full_cadence")]
    pub cadence: usize,
    #[serde(default)]
    pub events: Vec<PointerEvent>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn full_cadence() -> usize {
    1
}

impl Seed {
    /// A seed with empty params, no frames, full cadence, and no events.
    pub fn new(engine: &str, width: usize, height: usize, seed: Option<u64>) -> Self {
        Self {
            engine: engine.to_string(),
            width,
            height,
            params: empty_object(),
            seed,
            frames: 0,
            cadence: full_cadence(),
            events: Vec::new(),
        }
    }

    /// Validates non-zero dimensions (without `width * height` overflow) and
    /// a non-zero cadence.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 || self.cadence == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(())
    }

    /// `params` with the `seed` key merged in (an explicit `seed` field
    /// overrides one inside `params`).
    pub fn engine_params(&self) -> serde_json::Value {
        let mut params = match &self.params {
            serde_json::Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        if let Some(seed) = self.seed {
            params.insert(SEED_KEY.to_string(), seed.into());
        }
        serde_json::Value::Object(params)
    }

    /// Events scheduled for `frame`, in script order.
    pub fn events_at(&self, frame: usize) -> impl Iterator<Item = &PointerEvent> {
        self.events.iter().filter(move |e| e.frame == frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_defaults() {
        let s = Seed::new("v3", 512, 512, Some(42));
        assert_eq!(s.engine, "v3");
        assert_eq!(s.frames, 0);
        assert_eq!(s.cadence, 1);
        assert!(s.events.is_empty());
        assert_eq!(s.params, json!({}));
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let s: Seed =
            serde_json::from_str(r#"{"engine":"flow-field","width":64,"height":32}"#).unwrap();
        assert_eq!(s.cadence, 1);
        assert_eq!(s.seed, None);
        assert_eq!(s.params, json!({}));
    }

    #[test]
    fn json_round_trip_with_events() {
        let mut s = Seed::new("v1", 300, 200, Some(7));
        s.frames = 120;
        s.cadence = 3;
        s.params = json!({"tick_interval": 2});
        s.events.push(PointerEvent {
            frame: 10,
            kind: PointerKind::Click,
            x: 50.0,
            y: 60.0,
        });
        let json = serde_json::to_string_pretty(&s).unwrap();
        assert!(json.contains("\"click\""));
        let restored: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(s, restored);
    }

    #[test]
    fn validate_rejects_zero_sizes_and_cadence() {
        assert!(Seed::new("v1", 0, 10, None).validate().is_err());
        assert!(Seed::new("v1", 10, 0, None).validate().is_err());
        let mut s = Seed::new("v1", 10, 10, None);
        s.cadence = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_overflow() {
        assert!(Seed::new("v1", usize::MAX, 2, None).validate().is_err());
    }

    #[test]
    fn engine_params_merges_seed() {
        let mut s = Seed::new("v2", 10, 10, Some(99));
        s.params = json!({"seed": 1, "noise_scale": 0.01});
        let p = s.engine_params();
        assert_eq!(p["seed"], 99);
        assert_eq!(p["noise_scale"], 0.01);
    }

    #[test]
    fn events_at_filters_by_frame() {
        let mut s = Seed::new("v3", 10, 10, None);
        let script = [
            (1, PointerKind::Move),
            (2, PointerKind::Click),
            (1, PointerKind::Click),
        ];
        for (frame, kind) in script {
            s.events.push(PointerEvent {
                frame,
                kind,
                x: 0.0,
                y: 0.0,
            });
        }
        let kinds: Vec<_> = s.events_at(1).map(|e| e.kind).collect();
        assert_eq!(kinds, vec![PointerKind::Move, PointerKind::Click]);
        assert_eq!(s.events_at(5).count(), 0);
    }
}
