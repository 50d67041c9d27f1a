//! Headless particle simulation command

use anyhow::{Context, Result};
use ember_particles::{EmissionStats, EmitterConfig, InstanceData};
use glam::Vec3;
use serde::Serialize;
use std::path::Path;

use crate::context::{load_emitter_config, EffectsContext};

pub struct SimulateArgs {
    pub config: Option<String>,
    pub frames: u32,
    pub dt: f64,
    pub jitter: f64,
    pub direction: Option<[f32; 3]>,
    pub seed: Option<u32>,
    pub output: Option<String>,
}

/// Final state written with `--output`
#[derive(Serialize)]
pub struct Snapshot {
    pub time: f64,
    pub frames: u64,
    pub capacity: usize,
    pub live_count: usize,
    pub visible_count: usize,
    pub stats: EmissionStats,
    pub instances: Vec<InstanceData>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let snapshot = simulate(&args)?;

    println!(
        "Simulated {:.2}s over {} frames: {} live, {} visible (capacity {})",
        snapshot.time,
        snapshot.frames,
        snapshot.live_count,
        snapshot.visible_count,
        snapshot.capacity
    );
    println!(
        "Emitted {}, culled {}, dropped {}",
        snapshot.stats.emitted, snapshot.stats.culled, snapshot.stats.dropped
    );

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(output, json).with_context(|| format!("Failed to write {output}"))?;
        println!("Render buffer written to {output}");
    }
    Ok(())
}

pub fn simulate(args: &SimulateArgs) -> Result<Snapshot> {
    if !(0.0..1.0).contains(&args.jitter) {
        anyhow::bail!("--jitter must be in [0, 1), got {}", args.jitter);
    }

    let config = match &args.config {
        Some(path) => load_emitter_config(Path::new(path))?,
        None => EmitterConfig::default(),
    };
    let mut ctx = EffectsContext::new(config, args.seed)?;
    if let Some(d) = args.direction {
        ctx.particles
            .set_direction(Vec3::from_array(d))
            .context("Invalid --direction")?;
    }

    let mut next_report = 1.0;
    for frame in 0..args.frames {
        ctx.step(frame_time(args.dt, args.jitter, frame))?;
        if ctx.time >= next_report {
            log::info!(
                "t={:.1}s live {} visible {} emitted {}",
                ctx.time,
                ctx.particles.live_count(),
                ctx.particles.visible_count(),
                ctx.particles.stats().emitted
            );
            next_report += 1.0;
        }
    }

    let system = &ctx.particles;
    Ok(Snapshot {
        time: ctx.time,
        frames: ctx.frame,
        capacity: system.capacity(),
        live_count: system.live_count(),
        visible_count: system.visible_count(),
        stats: system.stats(),
        instances: system.render_buffer().instances.to_vec(),
    })
}

/// Deterministic uneven pacing: `dt * (1 + jitter * sin(frame))`
fn frame_time(dt: f64, jitter: f64, frame: u32) -> f64 {
    dt * (1.0 + jitter * (frame as f64).sin())
}
