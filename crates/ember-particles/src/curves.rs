//! Piecewise-linear value-over-lifetime ramps

use ember_core::{Color, EmberError, Result};

/// Linear interpolation between two values of the same type
pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

impl Lerp for Color {
    fn lerp(a: Color, b: Color, t: f32) -> Color {
        a.lerp(&b, t)
    }
}

/// One `(t, value)` control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampStop<T> {
    pub t: f32,
    pub value: T,
}

/// Ordered stops over normalized life [0, 1].
///
/// Queries outside the stop range clamp to the nearest end stop; the last
/// stop does not need to reach 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct Ramp<T> {
    stops: Vec<RampStop<T>>,
}

impl<T: Lerp> Ramp<T> {
    /// Build a ramp. Stops must be non-empty, lie in [0, 1] and have strictly
    /// increasing `t`.
    pub fn new(stops: Vec<(f32, T)>) -> Result<Self> {
        if stops.is_empty() {
            return Err(EmberError::config("ramp needs at least one stop"));
        }
        for (i, &(t, _)) in stops.iter().enumerate() {
            if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                return Err(EmberError::config(format!(
                    "ramp stop {i} has t = {t}, expected a value in [0, 1]"
                )));
            }
            if i > 0 && t <= stops[i - 1].0 {
                return Err(EmberError::config(format!(
                    "ramp stop {i} (t = {t}) does not follow t = {}",
                    stops[i - 1].0
                )));
            }
        }
        Ok(Self {
            stops: stops
                .into_iter()
                .map(|(t, value)| RampStop { t, value })
                .collect(),
        })
    }

    pub fn stops(&self) -> &[RampStop<T>] {
        &self.stops
    }

    /// Value at normalized life `t`
    pub fn sample(&self, t: f32) -> T {
        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if t.is_nan() || t <= first.t {
            return first.value;
        }
        if t >= last.t {
            return last.value;
        }

        // First stop strictly after t; t < last.t guarantees one exists and idx >= 1
        let idx = self.stops.partition_point(|s| s.t <= t);
        let lo = &self.stops[idx - 1];
        if lo.t == t {
            return lo.value;
        }
        let hi = &self.stops[idx];
        T::lerp(lo.value, hi.value, (t - lo.t) / (hi.t - lo.t))
    }
}

impl Ramp<Color> {
    /// Pale yellow through orange to smoke grey
    pub fn fire_colors() -> Self {
        Self {
            stops: vec![
                RampStop {
                    t: 0.0,
                    value: Color::from_hex(0xFFFEBA),
                },
                RampStop {
                    t: 0.25,
                    value: Color::from_hex(0xFFED59),
                },
                RampStop {
                    t: 0.5,
                    value: Color::from_hex(0xF88200),
                },
                RampStop {
                    t: 0.75,
                    value: Color::from_hex(0x706E6E),
                },
            ],
        }
    }
}

impl Ramp<f32> {
    /// Swells to a peak just past mid-life, then shrinks as smoke
    pub fn fire_sizes() -> Self {
        let stops = [(0.0, 0.8), (0.55, 1.8), (0.7, 2.0), (0.75, 1.2), (1.0, 0.9)];
        Self {
            stops: stops
                .into_iter()
                .map(|(t, value)| RampStop { t, value })
                .collect(),
        }
    }
}
