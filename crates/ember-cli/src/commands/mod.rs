//! CLI command implementations

pub mod noise;
pub mod scatter;
pub mod simulate;
