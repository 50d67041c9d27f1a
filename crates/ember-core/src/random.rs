//! Injected randomness for emission and noise-table construction
//!
//! Engines never reach for an ambient generator; callers hand them a
//! `RandomSource`. Tests use a seeded `ParticleRng` for reproducible runs,
//! hosts that want entropy wrap any `rand` generator in `RandAdapter`.

/// A source of uniform floats in [0, 1)
pub trait RandomSource {
    /// Returns a float in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Returns a float in [min, max)
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an index uniformly chosen from [0, upper). `upper` must be non-zero.
    fn next_index(&mut self, upper: usize) -> usize {
        debug_assert!(upper > 0);
        ((self.next_f32() * upper as f32) as usize).min(upper - 1)
    }

    /// Returns a random unit vector (uniformly on sphere surface)
    fn unit_vector(&mut self) -> [f32; 3] {
        // Marsaglia method for uniform sphere sampling
        loop {
            let x = self.range(-1.0, 1.0);
            let y = self.range(-1.0, 1.0);
            let s = x * x + y * y;
            if s < 1.0 {
                let factor = 2.0 * (1.0 - s).sqrt();
                return [x * factor, y * factor, 1.0 - 2.0 * s];
            }
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// Lightweight xorshift32 PRNG, deterministic per seed
#[derive(Debug, Clone)]
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for ParticleRng {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Adapts any `rand` generator, e.g. `StdRng::from_os_rng()`
#[derive(Debug, Clone)]
pub struct RandAdapter<R>(pub R);

impl<R: rand::Rng> RandomSource for RandAdapter<R> {
    fn next_f32(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!((0.0..10.0).contains(&v));
        }
    }

    #[test]
    fn rng_same_seed_same_sequence() {
        let mut a = ParticleRng::new(7);
        let mut b = ParticleRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut rng = ParticleRng::new(0);
        let first = rng.next_f32();
        let second = rng.next_f32();
        assert_ne!(first, second);
    }

    #[test]
    fn next_index_stays_in_bounds() {
        let mut rng = ParticleRng::new(3);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let i = rng.next_index(5);
            assert!(i < 5);
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn unit_vector_has_unit_length() {
        let mut rng = ParticleRng::new(123);
        for _ in 0..100 {
            let d = rng.unit_vector();
            let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
            assert!((len - 1.0).abs() < 0.01);
        }
    }

    #[test]
    fn boxed_sources_delegate() {
        let mut boxed: Box<dyn RandomSource> = Box::new(ParticleRng::new(7));
        let mut plain = ParticleRng::new(7);
        assert_eq!(boxed.next_f32(), plain.next_f32());
        assert_eq!(boxed.next_index(10), plain.next_index(10));
    }

    #[test]
    fn rand_adapter_is_a_random_source() {
        let mut rng = RandAdapter(StdRng::seed_from_u64(99));
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
