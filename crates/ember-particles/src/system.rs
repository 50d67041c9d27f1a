//! Emission, advancement and instance packing for one emitter

use ember_core::{Color, EmberError, ParticleRng, RandomSource, Result};
use glam::{Quat, Vec3};

use crate::curves::Ramp;
use crate::emitter::{
    check_finite_vec, check_non_negative, check_positive, normalize_direction, EmitterConfig,
};
use crate::particle::{InstanceData, Particle, ParticlePool};
use crate::sampling::{random_orientation, random_point_in_disk};

/// Draw data for the host renderer, refreshed by every `update`
#[derive(Debug, Clone, Copy)]
pub struct ParticleDrawData<'a> {
    /// One entry per visible particle, longest remaining life first
    pub instances: &'a [InstanceData],
    /// Particles alive in storage, including those hidden by the capacity cap
    pub live_count: usize,
}

/// Running totals since construction or the last `clear`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct EmissionStats {
    pub emitted: u64,
    pub culled: u64,
    /// Emissions refused because the pool was full
    pub dropped: u64,
}

/// A single emitter and the particles it owns.
///
/// Particle life is a distance budget: each frame a particle moves
/// `speed * dt` along its direction and spends that distance. The system is a
/// plain function of `dt`; any host loop may drive it.
pub struct ParticleSystem<R = ParticleRng> {
    config: EmitterConfig,
    rng: R,
    pool: ParticlePool,
    /// Advisory cap on visible particles, derived from the config
    capacity: usize,
    /// Fractional particle accumulator for sub-frame emission
    accumulator: f64,
    visible: usize,
    /// Pre-allocated instance buffer for packing visible particles
    instances: Vec<InstanceData>,
    stats: EmissionStats,
}

impl ParticleSystem<ParticleRng> {
    /// Convenience constructor with a seeded xorshift source
    pub fn with_seed(config: EmitterConfig, seed: u32) -> Result<Self> {
        Self::new(config, ParticleRng::new(seed))
    }
}

impl<R: RandomSource> ParticleSystem<R> {
    pub fn new(mut config: EmitterConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let capacity = config.capacity();
        log::debug!(
            "Created emitter: rate {} /s, speed {}, length {}, radius {}, capacity {}",
            config.rate,
            config.speed,
            config.length,
            config.radius,
            capacity
        );
        Ok(Self {
            pool: ParticlePool::new(config.pool_limit),
            instances: Vec::with_capacity(capacity.min(config.pool_limit)),
            config,
            rng,
            capacity,
            accumulator: 0.0,
            visible: 0,
            stats: EmissionStats::default(),
        })
    }

    /// Advance the simulation by `dt` seconds and refresh the draw data.
    ///
    /// Negative or non-finite `dt` is rejected and leaves the state untouched.
    pub fn update(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(EmberError::InvalidTimeStep(dt));
        }
        self.generate_particles(dt);
        self.update_particles(dt as f32);
        self.pack_instances();
        log::trace!(
            "dt {:.4}: {} live, {} visible",
            dt,
            self.pool.len(),
            self.visible
        );
        Ok(())
    }

    /// Emit `floor(accumulated rate * time)` particles, carrying the fraction
    fn generate_particles(&mut self, dt: f64) {
        self.accumulator += self.config.rate as f64 * dt;
        let whole = self.accumulator.floor();
        self.accumulator -= whole;
        let count = whole as u64;
        if count == 0 {
            return;
        }

        let spawnable = count.min(self.pool.room() as u64);
        let direction = self.config.world_direction();
        for _ in 0..spawnable {
            let particle = self.new_particle(direction);
            self.pool.spawn(particle);
        }
        self.stats.emitted += spawnable;

        let dropped = count - spawnable;
        if dropped > 0 {
            self.stats.dropped += dropped;
            log::warn!(
                "Particle pool full ({}), dropped {dropped} emission(s)",
                self.pool.limit()
            );
        }
    }

    fn new_particle(&mut self, direction: Vec3) -> Particle {
        let rng = &mut self.rng;
        let config = &self.config;

        // At least 75% of the max length, so no particle is born nearly dead
        let life = (rng.next_f32() * 0.25 + 0.75) * config.length;
        let position = random_point_in_disk(rng, config.source, direction, config.radius);
        let orientation = random_orientation(rng);

        Particle {
            position,
            direction,
            orientation,
            base_scale: config.scale,
            render_scale: config.scale,
            color: Color::WHITE,
            remaining_life: life,
            life_span: config.length,
            speed: config.speed,
        }
    }

    /// Move, cull, sort, cap, and recolor
    fn update_particles(&mut self, dt: f32) {
        for p in self.pool.as_mut_slice() {
            p.advance(dt);
        }

        self.stats.culled += self.pool.cull() as u64;
        self.pool.sort_by_remaining_life();
        self.visible = self.pool.len().min(self.capacity);

        let colors = &self.config.color_ramp;
        let sizes = &self.config.size_ramp;
        for p in self.pool.as_mut_slice() {
            let t = p.normalized_life();
            p.color = colors.sample(t);
            p.render_scale = p.base_scale * sizes.sample(t);
        }
    }

    fn pack_instances(&mut self) {
        self.instances.clear();
        self.instances.extend(
            self.pool.as_slice()[..self.visible]
                .iter()
                .map(InstanceData::from_particle),
        );
    }

    /// Draw data produced by the last `update`
    pub fn render_buffer(&self) -> ParticleDrawData<'_> {
        ParticleDrawData {
            instances: &self.instances,
            live_count: self.pool.len(),
        }
    }

    /// The packed instance buffer as raw bytes for GPU upload
    pub fn render_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    // ── Live configuration ──

    /// Replace the emission axis. Existing particles keep their direction.
    pub fn set_direction(&mut self, direction: Vec3) -> Result<()> {
        self.config.direction = normalize_direction(direction)?;
        log::debug!("Emitter direction set to {}", self.config.direction);
        Ok(())
    }

    pub fn set_scale(&mut self, scale: Vec3) -> Result<()> {
        check_finite_vec("scale", scale)?;
        self.config.scale = scale;
        Ok(())
    }

    pub fn set_length(&mut self, length: f32) -> Result<()> {
        check_positive("length", length)?;
        self.config.length = length;
        self.refresh_capacity();
        Ok(())
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        check_non_negative("radius", radius)?;
        self.config.radius = radius;
        self.refresh_capacity();
        Ok(())
    }

    pub fn set_rate(&mut self, rate: f32) -> Result<()> {
        check_non_negative("rate", rate)?;
        self.config.rate = rate;
        self.refresh_capacity();
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        check_positive("speed", speed)?;
        self.config.speed = speed;
        self.refresh_capacity();
        Ok(())
    }

    /// Move the disk center (the host's emitter transform)
    pub fn set_source(&mut self, source: Vec3) -> Result<()> {
        check_finite_vec("source", source)?;
        self.config.source = source;
        Ok(())
    }

    /// Rotate the emitter; the emission axis is rotated before each batch
    pub fn set_rotation(&mut self, rotation: Quat) -> Result<()> {
        if !rotation.is_finite() || rotation.length_squared() == 0.0 {
            return Err(EmberError::config(
                "rotation must be a finite, non-zero quaternion",
            ));
        }
        self.config.rotation = rotation.normalize();
        Ok(())
    }

    /// Change the hard storage cap. Shrinking drops the shortest-lived particles.
    pub fn set_pool_limit(&mut self, limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(EmberError::config("pool_limit must be at least 1"));
        }
        self.config.pool_limit = limit;
        self.pool.set_limit(limit);
        self.visible = self.visible.min(self.pool.len());
        self.instances.truncate(self.visible);
        Ok(())
    }

    /// Ramps apply to every particle from the next update on
    pub fn set_color_ramp(&mut self, ramp: Ramp<Color>) {
        self.config.color_ramp = ramp;
    }

    pub fn set_size_ramp(&mut self, ramp: Ramp<f32>) {
        self.config.size_ramp = ramp;
    }

    fn refresh_capacity(&mut self) {
        self.capacity = self.config.capacity();
        log::debug!("Emitter capacity now {}", self.capacity);
    }

    /// Drop every particle and reset emission state
    pub fn clear(&mut self) {
        self.pool.clear();
        self.instances.clear();
        self.accumulator = 0.0;
        self.visible = 0;
        self.stats = EmissionStats::default();
    }

    // ── Inspection ──

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn live_count(&self) -> usize {
        self.pool.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// All stored particles, longest remaining life first after an update
    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    pub fn stats(&self) -> EmissionStats {
        self.stats
    }
}
