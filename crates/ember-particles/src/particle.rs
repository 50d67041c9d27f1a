//! Particle types: CPU simulation state and GPU instance data

use bytemuck::{Pod, Zeroable};
use ember_core::Color;
use glam::{Mat4, Quat, Vec3};

/// CPU-side particle state (not sent to GPU)
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec3,
    /// Unit travel direction, fixed at emission
    pub direction: Vec3,
    /// Cosmetic spin, fixed at emission
    pub orientation: Quat,
    pub base_scale: Vec3,
    /// `base_scale` times the size ramp, refreshed every frame
    pub render_scale: Vec3,
    pub color: Color,
    /// Distance the particle may still travel
    pub remaining_life: f32,
    /// Emitter length at emission; the basis for normalized life
    pub life_span: f32,
    pub speed: f32,
}

impl Particle {
    /// Normalized life in [0, 1]; 0 is freshly emitted at full length
    pub fn normalized_life(&self) -> f32 {
        if self.life_span <= 0.0 {
            return 1.0;
        }
        ((self.life_span - self.remaining_life) / self.life_span).clamp(0.0, 1.0)
    }

    /// Move along `direction` for `dt` seconds and spend the distance from life
    pub fn advance(&mut self, dt: f32) {
        let displacement = self.direction * (self.speed * dt);
        self.position += displacement;
        self.remaining_life -= displacement.length();
    }

    pub fn is_alive(&self) -> bool {
        self.remaining_life > 0.0
    }

    /// Model matrix: translate * rotate * scale
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.render_scale, self.orientation, self.position)
    }
}

/// Order-preserving particle storage with a hard size limit.
///
/// Culling is a pure filter and sorting is stable, so the relative order of
/// survivors never changes except by remaining life.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    limit: usize,
}

impl ParticlePool {
    pub fn new(limit: usize) -> Self {
        Self {
            particles: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the limit; excess particles at the tail are dropped
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.particles.truncate(limit);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Free slots before the limit is hit
    pub fn room(&self) -> usize {
        self.limit.saturating_sub(self.particles.len())
    }

    /// Store a particle. Returns false (and drops it) if the pool is full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        if self.particles.len() >= self.limit {
            return false;
        }
        self.particles.push(particle);
        true
    }

    /// Remove dead particles, returning how many were removed
    pub fn cull(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        before - self.particles.len()
    }

    /// Stable sort, longest remaining life first
    pub fn sort_by_remaining_life(&mut self) {
        self.particles
            .sort_by(|a, b| b.remaining_life.total_cmp(&a.remaining_life));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

/// Per-instance data handed to the host renderer.
/// 76 bytes: column-major 4x4 model matrix followed by RGB color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, serde::Serialize)]
pub struct InstanceData {
    pub transform: [[f32; 4]; 4],
    pub color: [f32; 3],
}

impl InstanceData {
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            transform: p.transform().to_cols_array_2d(),
            color: p.color.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle() -> Particle {
        Particle {
            position: Vec3::ZERO,
            direction: Vec3::X,
            orientation: Quat::IDENTITY,
            base_scale: Vec3::ONE,
            render_scale: Vec3::splat(2.0),
            color: Color::from_hex(0xFF0000),
            remaining_life: 10.0,
            life_span: 10.0,
            speed: 4.0,
        }
    }

    #[test]
    fn advance_spends_distance() {
        let mut p = particle();
        p.advance(0.5);
        assert!((p.position.x - 2.0).abs() < 1e-6);
        assert!((p.remaining_life - 8.0).abs() < 1e-6);
        assert!((p.normalized_life() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn normalized_life_is_clamped() {
        let mut p = particle();
        p.remaining_life = -3.0;
        assert_eq!(p.normalized_life(), 1.0);
        p.remaining_life = 12.0;
        assert_eq!(p.normalized_life(), 0.0);
    }

    #[test]
    fn zero_dt_leaves_particle_in_place() {
        let mut p = particle();
        p.advance(0.0);
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.remaining_life, 10.0);
    }

    #[test]
    fn instance_packs_translation_scale_and_color() {
        let mut p = particle();
        p.position = Vec3::new(1.0, 2.0, 3.0);
        let inst = InstanceData::from_particle(&p);
        assert_eq!(inst.transform[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(inst.transform[0][0], 2.0);
        assert_eq!(inst.transform[1][1], 2.0);
        assert_eq!(inst.color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn pool_spawn_respects_limit() {
        let mut pool = ParticlePool::new(2);
        assert!(pool.spawn(particle()));
        assert!(pool.spawn(particle()));
        assert!(!pool.spawn(particle()));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.room(), 0);
    }

    #[test]
    fn pool_cull_preserves_order() {
        let mut pool = ParticlePool::new(8);
        for (i, life) in [3.0, -1.0, 5.0, 0.0, 1.0].into_iter().enumerate() {
            let mut p = particle();
            p.remaining_life = life;
            p.position.x = i as f32;
            pool.spawn(p);
        }
        assert_eq!(pool.cull(), 2);
        let xs: Vec<f32> = pool.as_slice().iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn pool_sorts_longest_life_first() {
        let mut pool = ParticlePool::new(8);
        for life in [2.0, 9.0, 4.0, 9.0] {
            let mut p = particle();
            p.remaining_life = life;
            pool.spawn(p);
        }
        pool.sort_by_remaining_life();
        let lives: Vec<f32> = pool.as_slice().iter().map(|p| p.remaining_life).collect();
        assert_eq!(lives, vec![9.0, 9.0, 4.0, 2.0]);
    }

    #[test]
    fn shrinking_limit_truncates_tail() {
        let mut pool = ParticlePool::new(4);
        for _ in 0..4 {
            pool.spawn(particle());
        }
        pool.set_limit(1);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn instance_layout() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 76);
        assert_eq!(std::mem::align_of::<InstanceData>(), 4);
        let data = [InstanceData::zeroed(); 2];
        assert_eq!(bytemuck::cast_slice::<_, u8>(&data).len(), 152);
    }
}
