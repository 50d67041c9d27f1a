//! Classic 2D gradient noise with a shuffled permutation table

use ember_core::RandomSource;

/// Number of distinct lattice hashes
pub const TABLE_SIZE: usize = 256;

const MASK: i64 = TABLE_SIZE as i64 - 1;

/// Deterministic-per-table gradient noise field.
///
/// The permutation is immutable after construction, so a field can be
/// shared across threads and sampled concurrently.
#[derive(Clone)]
pub struct NoiseField {
    /// Permutation of 0..256 stored twice so `perm[i + 1]` never wraps
    perm: [u8; TABLE_SIZE * 2],
}

impl NoiseField {
    /// Build a field from a Fisher-Yates shuffle of 0..256.
    pub fn new(rng: &mut impl RandomSource) -> Self {
        let mut p = [0u8; TABLE_SIZE];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..TABLE_SIZE).rev() {
            let j = rng.next_index(i + 1);
            p.swap(i, j);
        }
        log::debug!("Built noise permutation table ({TABLE_SIZE} entries)");
        Self::from_permutation(p)
    }

    /// Build a field from a fixed table. The caller is responsible for it
    /// being a permutation; repeated entries degrade the noise.
    pub fn from_permutation(p: [u8; TABLE_SIZE]) -> Self {
        let mut perm = [0u8; TABLE_SIZE * 2];
        perm[..TABLE_SIZE].copy_from_slice(&p);
        perm[TABLE_SIZE..].copy_from_slice(&p);
        Self { perm }
    }

    /// The base (undoubled) permutation
    pub fn permutation(&self) -> &[u8] {
        &self.perm[..TABLE_SIZE]
    }

    /// Sample the field at `(x, y)`. Returns a value in [-1, 1], exactly 0 at
    /// integer lattice points.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();

        // Non-finite input has no lattice cell; treat it as the origin cell
        let xi = if x0.is_finite() { (x0 as i64 & MASK) as usize } else { 0 };
        let yi = if y0.is_finite() { (y0 as i64 & MASK) as usize } else { 0 };

        let xf = finite_or_zero(x - x0);
        let yf = finite_or_zero(y - y0);

        let u = fade(xf);
        let v = fade(yf);

        let a = self.perm[xi] as usize + yi;
        let b = self.perm[xi + 1] as usize + yi;

        let aa = self.perm[a];
        let ab = self.perm[a + 1];
        let ba = self.perm[b];
        let bb = self.perm[b + 1];

        lerp(
            lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u),
            lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u),
            v,
        )
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("table_size", &TABLE_SIZE)
            .finish()
    }
}

/// Quintic smoothstep `6t^5 - 15t^4 + 10t^3`
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot the offset with one of the four diagonal gradients picked by the low 2 bits
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ParticleRng;
    use proptest::prelude::*;

    fn field(seed: u32) -> NoiseField {
        NoiseField::new(&mut ParticleRng::new(seed))
    }

    #[test]
    fn table_is_a_permutation() {
        let f = field(1);
        let mut seen = [false; TABLE_SIZE];
        for &v in f.permutation() {
            assert!(!seen[v as usize], "value {v} repeated");
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn doubled_half_mirrors_first_half() {
        let f = field(2);
        assert_eq!(&f.perm[..TABLE_SIZE], &f.perm[TABLE_SIZE..]);
    }

    #[test]
    fn same_seed_same_table() {
        assert_eq!(field(9).permutation(), field(9).permutation());
        assert_ne!(field(9).permutation(), field(10).permutation());
    }

    #[test]
    fn sample_is_repeatable() {
        let f = field(5);
        for i in 0..50 {
            let x = i as f64 * 0.37 - 4.0;
            let y = i as f64 * 0.73 + 1.5;
            assert_eq!(f.sample(x, y).to_bits(), f.sample(x, y).to_bits());
        }
    }

    #[test]
    fn zero_at_lattice_points() {
        let f = field(11);
        for x in -5..5 {
            for y in -5..5 {
                assert_eq!(f.sample(x as f64, y as f64), 0.0);
            }
        }
    }

    #[test]
    fn varies_between_lattice_points() {
        let f = field(13);
        let distinct = (0..64)
            .map(|i| f.sample(i as f64 * 0.5 + 0.25, 0.5))
            .filter(|v| v.abs() > 1e-6)
            .count();
        assert!(distinct > 0);
    }

    #[test]
    fn wraps_with_table_period() {
        let f = field(17);
        let a = f.sample(3.3, 7.6);
        let b = f.sample(3.3 + TABLE_SIZE as f64, 7.6 - TABLE_SIZE as f64);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn identity_table_is_accepted() {
        let mut p = [0u8; TABLE_SIZE];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let f = NoiseField::from_permutation(p);
        assert_eq!(f.permutation()[255], 255);
        assert_eq!(f.sample(1.0, 2.0), 0.0);
    }

    #[test]
    fn non_finite_input_is_total() {
        let f = field(19);
        for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let s = f.sample(v, 0.5);
            assert!(s.is_finite());
        }
    }

    #[test]
    fn field_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoiseField>();

        let f = field(21);
        let expected = f.sample(3.7, -1.2);
        let results: Vec<f64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| f.sample(3.7, -1.2))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.iter().all(|&v| v == expected));
    }

    proptest! {
        #[test]
        fn sample_stays_in_unit_range(x in -1.0e6f64..1.0e6, y in -1.0e6f64..1.0e6) {
            let f = field(23);
            let v = f.sample(x, y);
            prop_assert!(v.is_finite());
            prop_assert!(v.abs() <= 1.0 + 1e-9);
        }
    }
}
