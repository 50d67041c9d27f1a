//! Ember CLI - headless host for the particle and noise engines

mod commands;
mod context;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{noise, scatter, simulate};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Drive the Ember particle and noise engines from the command line", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the particle emitter for a number of frames
    Simulate {
        /// TOML file with an [emitter] table
        #[arg(long)]
        config: Option<String>,

        /// Number of frames to simulate
        #[arg(long, default_value = "180")]
        frames: u32,

        /// Frame time in seconds
        #[arg(long, default_value = "0.016666667")]
        dt: f64,

        /// Relative frame-time wobble in [0, 1), to mimic uneven frame pacing
        #[arg(long, default_value = "0.0")]
        jitter: f64,

        /// Override the emission axis (comma-separated x,y,z)
        #[arg(long, value_parser = parse_vec3)]
        direction: Option<[f32; 3]>,

        /// Random seed; omit for an entropy-seeded run
        #[arg(long)]
        seed: Option<u32>,

        /// Write the final render buffer as JSON
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write a gradient-noise texture to PNG
    Noise {
        /// Output image path
        #[arg(short, long, default_value = "noise.png")]
        output: String,

        /// Image width in pixels
        #[arg(long, default_value = "256")]
        width: u32,

        /// Image height in pixels
        #[arg(long, default_value = "256")]
        height: u32,

        /// Noise units per pixel
        #[arg(long, default_value = "0.05")]
        scale: f64,

        /// Animation time in seconds
        #[arg(long, default_value = "0.0")]
        time: f64,

        /// Random seed for the permutation table
        #[arg(long)]
        seed: Option<u32>,
    },

    /// Print noise-jittered positions for a row of clones as JSON
    Scatter {
        /// Number of clones
        #[arg(long, default_value = "16")]
        count: usize,

        /// Spacing between clones along +X
        #[arg(long, default_value = "2.0")]
        spacing: f32,

        /// Maximum jitter per axis
        #[arg(long, default_value = "0.5")]
        amplitude: f32,

        /// Random seed for the permutation table
        #[arg(long)]
        seed: Option<u32>,
    },
}

fn parse_vec3(s: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected 3 comma-separated values, got {}", parts.len()));
    }
    let x: f32 = parts[0].trim().parse().map_err(|e| format!("invalid x: {}", e))?;
    let y: f32 = parts[1].trim().parse().map_err(|e| format!("invalid y: {}", e))?;
    let z: f32 = parts[2].trim().parse().map_err(|e| format!("invalid z: {}", e))?;
    Ok([x, y, z])
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            frames,
            dt,
            jitter,
            direction,
            seed,
            output,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            dt,
            jitter,
            direction,
            seed,
            output,
        }),
        Commands::Noise {
            output,
            width,
            height,
            scale,
            time,
            seed,
        } => noise::run(noise::NoiseArgs {
            output,
            width,
            height,
            scale,
            time,
            seed,
        }),
        Commands::Scatter {
            count,
            spacing,
            amplitude,
            seed,
        } => scatter::run(scatter::ScatterArgs {
            count,
            spacing,
            amplitude,
            seed,
        }),
    }
}
