//! Noise-driven placement jitter for cloned objects

use crate::field::NoiseField;

/// Noise rows sampled for each axis; offset by half a cell so no row sits on the lattice
const AXIS_ROWS: [f64; 3] = [0.5, 17.5, 42.5];

/// Lays clones out along +X and perturbs each one with noise
#[derive(Debug, Clone, Copy)]
pub struct PlacementJitter {
    /// Distance between neighbouring clones before jitter
    pub spacing: f32,
    /// Maximum displacement per axis
    pub amplitude: f32,
    /// Noise units advanced per clone index
    pub frequency: f64,
}

impl Default for PlacementJitter {
    fn default() -> Self {
        Self {
            spacing: 2.0,
            amplitude: 0.5,
            frequency: 0.37,
        }
    }
}

impl PlacementJitter {
    /// Jitter offset for clone `index`
    pub fn offset(&self, field: &NoiseField, index: usize) -> [f32; 3] {
        let x = index as f64 * self.frequency;
        AXIS_ROWS.map(|row| field.sample(x, row) as f32 * self.amplitude)
    }

    /// Jittered position of clone `index`
    pub fn position(&self, field: &NoiseField, index: usize) -> [f32; 3] {
        let [dx, dy, dz] = self.offset(field, index);
        [index as f32 * self.spacing + dx, dy, dz]
    }

    /// Positions for clones `0..count`
    pub fn positions(&self, field: &NoiseField, count: usize) -> Vec<[f32; 3]> {
        (0..count).map(|i| self.position(field, i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ParticleRng;

    fn field() -> NoiseField {
        NoiseField::new(&mut ParticleRng::new(77))
    }

    #[test]
    fn offsets_are_bounded_by_amplitude() {
        let f = field();
        let jitter = PlacementJitter {
            amplitude: 0.25,
            ..Default::default()
        };
        for i in 0..200 {
            for c in jitter.offset(&f, i) {
                assert!(c.abs() <= 0.25 + 1e-6);
            }
        }
    }

    #[test]
    fn zero_amplitude_gives_even_spacing() {
        let f = field();
        let jitter = PlacementJitter {
            spacing: 3.0,
            amplitude: 0.0,
            ..Default::default()
        };
        let positions = jitter.positions(&f, 4);
        assert_eq!(positions.len(), 4);
        for (i, p) in positions.iter().enumerate() {
            assert_eq!(p[0], i as f32 * 3.0);
            assert_eq!(p[1], 0.0);
            assert_eq!(p[2], 0.0);
        }
    }

    #[test]
    fn placement_is_deterministic_per_field() {
        let f = field();
        let jitter = PlacementJitter::default();
        assert_eq!(jitter.positions(&f, 10), jitter.positions(&f, 10));
    }

    #[test]
    fn jitter_moves_some_clones() {
        let f = field();
        let jitter = PlacementJitter::default();
        let moved = (1..50)
            .filter(|&i| jitter.offset(&f, i).iter().any(|c| c.abs() > 1e-4))
            .count();
        assert!(moved > 0);
    }
}
