//! Ember Core - Foundational types for the Ember effects engines
//!
//! This crate provides the types that the particle and noise crates share:
//! - `EmberError` and the `Result` alias
//! - `Color` - linear RGB color with hex construction
//! - `RandomSource` - the injected randomness used by emission and noise tables

mod color;
mod error;
pub mod random;

pub use color::Color;
pub use error::{EmberError, Result};
pub use random::{ParticleRng, RandAdapter, RandomSource};
