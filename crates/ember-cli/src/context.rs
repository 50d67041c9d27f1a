//! Host-side state that owns the engines for one run

use anyhow::{Context, Result};
use ember_core::{ParticleRng, RandAdapter, RandomSource};
use ember_particles::{EmitterConfig, ParticleSystem};
use rand::{rngs::StdRng, SeedableRng};
use std::path::Path;

/// Random source picked at startup: seeded for reproducible runs, OS entropy otherwise
pub type HostRng = Box<dyn RandomSource>;

pub fn random_source(seed: Option<u32>) -> HostRng {
    match seed {
        Some(seed) => {
            log::info!("Using seed {seed}");
            Box::new(ParticleRng::new(seed))
        }
        None => Box::new(RandAdapter(StdRng::from_os_rng())),
    }
}

/// Everything one simulation run owns; replaces ambient scene globals
pub struct EffectsContext {
    pub particles: ParticleSystem<HostRng>,
    /// Simulated seconds so far
    pub time: f64,
    pub frame: u64,
}

impl EffectsContext {
    pub fn new(config: EmitterConfig, seed: Option<u32>) -> Result<Self> {
        let particles =
            ParticleSystem::new(config, random_source(seed)).context("Invalid emitter config")?;
        Ok(Self {
            particles,
            time: 0.0,
            frame: 0,
        })
    }

    /// Advance one frame
    pub fn step(&mut self, dt: f64) -> Result<()> {
        self.particles
            .update(dt)
            .with_context(|| format!("Frame {} failed", self.frame))?;
        self.time += dt;
        self.frame += 1;
        Ok(())
    }
}

/// Load an `[emitter]` table from a TOML file. A file without the table gets defaults.
pub fn load_emitter_config(path: &Path) -> Result<EmitterConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc: toml::Table =
        toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    let config = match doc.get("emitter").and_then(|v| v.as_table()) {
        Some(table) => EmitterConfig::from_toml(table),
        None => {
            log::warn!("No [emitter] table in {}, using defaults", path.display());
            EmitterConfig::from_toml(&toml::Table::new())
        }
    };
    config.with_context(|| format!("Invalid emitter in {}", path.display()))
}
