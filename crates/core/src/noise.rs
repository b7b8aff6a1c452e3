//! Improved Perlin gradient noise over a shuffled permutation table.
//!
//! A [`GradientNoise`] is an immutable lookup table: 256 shuffled byte values
//! duplicated to 512 entries so corner hashes never need masking. The
//! process-wide instance behind [`noise3d`] is shuffled from OS entropy the
//! first time it is used and never changes afterwards; tests and reproducible
//! runs build their own with [`GradientNoise::with_seed`].

use std::sync::{Arc, OnceLock};

use ::noise::NoiseFn;
use rand::{Rng, RngCore, SeedableRng};

use crate::prng::Xorshift64;

/// The 12 edge-midpoint gradients of a cube.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

static GLOBAL: OnceLock<Arc<GradientNoise>> = OnceLock::new();

/// 3D gradient noise generator. Output is roughly in [-1, 1] and is not
/// normalized.
#[derive(Clone)]
pub struct GradientNoise {
    perm: [u8; 512],
}

impl GradientNoise {
    /// Builds a table shuffled by a seeded [`Xorshift64`].
    pub fn with_seed(seed: u64) -> Self {
        Self::shuffled(&mut Xorshift64::new(seed))
    }

    /// Builds a table shuffled from OS entropy.
    pub fn from_entropy() -> Self {
        Self::shuffled(&mut Xorshift64::from_entropy())
    }

    /// Fisher–Yates shuffle of `0..=255`, then duplicated to 512 entries.
    pub fn shuffled<R: RngCore>(rng: &mut R) -> Self {
        let mut p = [0u8; 256];
        for (i, v) in p.iter_mut().enumerate() {
            *v = i as u8;
        }
        for i in (1..256).rev() {
            let j = rng.gen_range(0..=i);
            p.swap(i, j);
        }
        let mut perm = [0u8; 512];
        for (i, v) in perm.iter_mut().enumerate() {
            *v = p[i & 255];
        }
        Self { perm }
    }

    /// The process-wide table, built on first use.
    pub fn global() -> Arc<GradientNoise> {
        Arc::clone(global_table())
    }

    /// Samples noise at `(x, y, z)`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xf, yf, zf) = (x.floor(), y.floor(), z.floor());
        let xi = lattice(xf);
        let yi = lattice(yf);
        let zi = lattice(zf);

        let x = x - xf;
        let y = y - yf;
        let z = z - zf;

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        let g = |hash: usize, dx: f64, dy: f64, dz: f64| {
            let grad = GRAD3[p[hash] as usize % 12];
            grad[0] * dx + grad[1] * dy + grad[2] * dz
        };

        lerp(
            lerp(
                lerp(g(aa, x, y, z), g(ba, x - 1.0, y, z), u),
                lerp(g(ab, x, y - 1.0, z), g(bb, x - 1.0, y - 1.0, z), u),
                v,
            ),
            lerp(
                lerp(g(aa + 1, x, y, z - 1.0), g(ba + 1, x - 1.0, y, z - 1.0), u),
                lerp(
                    g(ab + 1, x, y - 1.0, z - 1.0),
                    g(bb + 1, x - 1.0, y - 1.0, z - 1.0),
                    u,
                ),
                v,
            ),
            w,
        )
    }
}

impl std::fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientNoise")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

impl NoiseFn<f64, 3> for GradientNoise {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.sample(point[0], point[1], point[2])
    }
}

/// Samples the process-wide noise table.
pub fn noise3d(x: f64, y: f64, z: f64) -> f64 {
    global_table().sample(x, y, z)
}

fn global_table() -> &'static Arc<GradientNoise> {
    GLOBAL.get_or_init(|| {
        log::debug!("initializing process-wide noise permutation table");
        Arc::new(GradientNoise::from_entropy())
    })
}

/// Lattice coordinate wrapped into the 256-entry period.
fn lattice(floor: f64) -> usize {
    (floor as i64 & 255) as usize
}

/// Quintic fade curve `6t⁵ - 15t⁴ + 10t³`.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}
