//! Ember Noise - 2D gradient noise and its consumers
//!
//! - `NoiseField`: permutation-hashed gradient noise over the plane
//! - `NoiseTexture`: per-texel synthesis of an animated noise texture
//! - `PlacementJitter`: noise-driven offsets for cloned objects

pub mod field;
pub mod placement;
pub mod texture;

pub use field::NoiseField;
pub use placement::PlacementJitter;
pub use texture::NoiseTexture;
