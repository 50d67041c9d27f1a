//! Ember Particles - instanced particle emitter
//!
//! Provides single-emitter particle simulation with:
//! - Time-accumulated emission from a disk orthogonal to the emitter axis
//! - Distance-based life: particles die after travelling their budget
//! - Color and size over life from piecewise-linear ramps
//! - Instance packing (model matrix + color) for instanced draw calls

pub mod curves;
pub mod emitter;
pub mod particle;
pub mod sampling;
pub mod system;

pub use curves::{Lerp, Ramp, RampStop};
pub use emitter::EmitterConfig;
pub use particle::{InstanceData, Particle, ParticlePool};
pub use system::{EmissionStats, ParticleDrawData, ParticleSystem};
