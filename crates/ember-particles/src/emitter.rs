//! Emitter configuration (parsed from TOML) and its derived values

use ember_core::{Color, EmberError, Result};
use glam::{Quat, Vec3};

use crate::curves::Ramp;

/// Hard cap on stored particles unless configured otherwise
pub const DEFAULT_POOL_LIMIT: usize = 10_000;

/// Configuration for one emitter. All fields can be changed live through
/// `ParticleSystem` setters; changes affect the next emission batch only.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Disk center in world space
    pub source: Vec3,
    /// Emitter rotation; applied to `direction` before emission
    pub rotation: Quat,
    /// Emission axis, kept unit length
    pub direction: Vec3,
    /// Base scale copied onto each particle
    pub scale: Vec3,
    /// Maximum travel distance; bounds particle life
    pub length: f32,
    /// Emission disk radius
    pub radius: f32,
    /// Particles per second
    pub rate: f32,
    /// Units per second
    pub speed: f32,
    /// Maximum particles kept in storage
    pub pool_limit: usize,
    pub color_ramp: Ramp<Color>,
    pub size_ramp: Ramp<f32>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            source: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            direction: Vec3::X,
            scale: Vec3::ONE,
            length: 5.0,
            radius: 2.5,
            rate: 5.0,
            speed: 5.0,
            pool_limit: DEFAULT_POOL_LIMIT,
            color_ramp: Ramp::fire_colors(),
            size_ramp: Ramp::fire_sizes(),
        }
    }
}

impl EmitterConfig {
    /// Check every field, normalizing `direction` in place
    pub fn validate(&mut self) -> Result<()> {
        self.direction = normalize_direction(self.direction)?;
        check_finite_vec("source", self.source)?;
        check_finite_vec("scale", self.scale)?;
        if !self.rotation.is_finite() || self.rotation.length_squared() == 0.0 {
            return Err(EmberError::config("rotation must be a finite, non-zero quaternion"));
        }
        self.rotation = self.rotation.normalize();
        check_positive("length", self.length)?;
        check_positive("speed", self.speed)?;
        check_non_negative("radius", self.radius)?;
        check_non_negative("rate", self.rate)?;
        if self.pool_limit == 0 {
            return Err(EmberError::config("pool_limit must be at least 1"));
        }
        Ok(())
    }

    /// Advisory cap on visible particles: disk area times particles alive at once
    pub fn capacity(&self) -> usize {
        let max_time = self.length / self.speed;
        let cap = std::f32::consts::PI * self.radius * self.radius * self.rate * max_time;
        if cap.is_finite() && cap > 0.0 {
            cap.floor() as usize
        } else {
            0
        }
    }

    /// Emission axis after the emitter rotation
    pub fn world_direction(&self) -> Vec3 {
        (self.rotation * self.direction).normalize_or(self.direction)
    }

    /// Where a particle travelling the full length from `source` ends up
    pub fn endpoint(&self) -> Vec3 {
        self.source + self.world_direction() * self.length
    }

    /// Parse and validate an `[emitter]` TOML table. Missing keys keep defaults.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = table.get("source") {
            config.source = toml_vec3(v, "source")?;
        }
        if let Some(v) = table.get("rotation") {
            config.rotation = toml_quat(v, "rotation")?;
        }
        if let Some(v) = table.get("direction") {
            config.direction = toml_vec3(v, "direction")?;
        }
        if let Some(v) = table.get("scale") {
            config.scale = toml_vec3(v, "scale")?;
        }
        if let Some(v) = table.get("length") {
            config.length = toml_f32(v, "length")?;
        }
        if let Some(v) = table.get("radius") {
            config.radius = toml_f32(v, "radius")?;
        }
        if let Some(v) = table.get("rate") {
            config.rate = toml_f32(v, "rate")?;
        }
        if let Some(v) = table.get("speed") {
            config.speed = toml_f32(v, "speed")?;
        }
        if let Some(v) = table.get("pool_limit") {
            config.pool_limit = v
                .as_integer()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| {
                    EmberError::config(format!(
                        "pool_limit must be a non-negative integer, got {v}"
                    ))
                })?;
        }
        if let Some(v) = table.get("color_stops") {
            config.color_ramp = parse_stops(v, "color_stops", "color", toml_hex_color)?;
        }
        if let Some(v) = table.get("size_stops") {
            config.size_ramp = parse_stops(v, "size_stops", "size", toml_opt_f32)?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Normalize a direction, rejecting zero-length and non-finite input
pub fn normalize_direction(dir: Vec3) -> Result<Vec3> {
    let invalid = || EmberError::InvalidDirection {
        x: dir.x,
        y: dir.y,
        z: dir.z,
    };
    if !dir.is_finite() || dir.length_squared() == 0.0 {
        return Err(invalid());
    }
    dir.try_normalize().ok_or_else(invalid)
}

pub(crate) fn check_finite_vec(field: &str, v: Vec3) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(EmberError::config(format!("{field} must be finite, got {v}")))
    }
}

pub(crate) fn check_positive(field: &str, v: f32) -> Result<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(EmberError::config(format!("{field} must be positive, got {v}")))
    }
}

pub(crate) fn check_non_negative(field: &str, v: f32) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(EmberError::config(format!("{field} must be non-negative, got {v}")))
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_opt_f32(v: &toml::Value) -> Option<f32> {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
}

fn toml_f32(v: &toml::Value, field: &str) -> Result<f32> {
    toml_opt_f32(v).ok_or_else(|| EmberError::config(format!("{field} must be a number, got {v}")))
}

/// Exactly `N` numeric entries
fn toml_floats<const N: usize>(v: &toml::Value, field: &str) -> Result<[f32; N]> {
    let bad = || EmberError::config(format!("{field} must be an array of {N} numbers, got {v}"));
    let arr = v.as_array().filter(|a| a.len() == N).ok_or_else(bad)?;
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(arr) {
        *slot = toml_opt_f32(item).ok_or_else(bad)?;
    }
    Ok(out)
}

fn toml_vec3(v: &toml::Value, field: &str) -> Result<Vec3> {
    toml_floats::<3>(v, field).map(Vec3::from_array)
}

fn toml_quat(v: &toml::Value, field: &str) -> Result<Quat> {
    toml_floats::<4>(v, field).map(Quat::from_array)
}

/// `0xRRGGBB` integer; anything outside 24 bits is rejected rather than wrapped
fn toml_hex_color(v: &toml::Value) -> Option<Color> {
    v.as_integer()
        .filter(|hex| (0..=0xFF_FFFF).contains(hex))
        .map(|hex| Color::from_hex(hex as u32))
}

/// Parse `[{ t = .., <key> = .. }, ..]` into a validated ramp
fn parse_stops<T: crate::curves::Lerp>(
    v: &toml::Value,
    field: &str,
    key: &str,
    read: impl Fn(&toml::Value) -> Option<T>,
) -> Result<Ramp<T>> {
    let arr = v
        .as_array()
        .ok_or_else(|| EmberError::config(format!("{field} must be an array of tables")))?;
    let mut stops = Vec::with_capacity(arr.len());
    for (i, entry) in arr.iter().enumerate() {
        let t = entry.get("t").and_then(toml_opt_f32);
        let value = entry.get(key).and_then(&read);
        match (t, value) {
            (Some(t), Some(value)) => stops.push((t, value)),
            _ => {
                return Err(EmberError::config(format!(
                    "{field}[{i}] needs numeric `t` and `{key}`"
                )))
            }
        }
    }
    Ramp::new(stops)
}
