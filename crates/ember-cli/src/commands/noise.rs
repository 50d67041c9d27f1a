//! Noise texture command

use anyhow::{Context, Result};
use ember_noise::{NoiseField, NoiseTexture};
use std::path::Path;

use crate::context::random_source;

pub struct NoiseArgs {
    pub output: String,
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub time: f64,
    pub seed: Option<u32>,
}

pub fn run(args: NoiseArgs) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("Texture size must be non-zero, got {}x{}", args.width, args.height);
    }

    let field = NoiseField::new(&mut random_source(args.seed));
    let texture = NoiseTexture {
        scale: args.scale,
        ..NoiseTexture::new(args.width, args.height)
    };
    texture
        .save_png(&field, args.time, Path::new(&args.output))
        .context("Failed to write noise texture")?;

    println!("Noise texture written to {}", args.output);
    Ok(())
}
