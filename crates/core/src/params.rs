//! Typed lookups into an engine's JSON parameter object.
//!
//! Every helper takes the params value, a key, and a default, and never
//! fails: a missing key or a value of the wrong JSON type yields the
//! default. The `_in` variants also clamp into a range so that a host can
//! never configure an engine into a degenerate state (zero tick interval,
//! negative radius, and so on).

use std::ops::RangeInclusive;

use serde_json::Value;

/// Key under which every engine accepts an optional PRNG seed.
pub const SEED_KEY: &str = "seed";

/// `params[name]` as `f64` (integers are accepted), else `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Like [`param_f64`], clamped into `range`.
pub fn param_f64_in(params: &Value, name: &str, default: f64, range: RangeInclusive<f64>) -> f64 {
    param_f64(params, name, default).clamp(*range.start(), *range.end())
}

/// `params[name]` as a non-negative integer, else `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Like [`param_usize`], clamped into `range`.
pub fn param_usize_in(
    params: &Value,
    name: &str,
    default: usize,
    range: RangeInclusive<usize>,
) -> usize {
    param_usize(params, name, default).clamp(*range.start(), *range.end())
}

/// The optional `seed` key. `None` means "seed from entropy".
pub fn param_seed(params: &Value) -> Option<u64> {
    params.get(SEED_KEY).and_then(Value::as_u64)
}
