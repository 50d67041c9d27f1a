//! Noise-jittered clone placement command

use anyhow::Result;
use ember_noise::{NoiseField, PlacementJitter};

use crate::context::random_source;

pub struct ScatterArgs {
    pub count: usize,
    pub spacing: f32,
    pub amplitude: f32,
    pub seed: Option<u32>,
}

pub fn run(args: ScatterArgs) -> Result<()> {
    let positions = scatter(&args);
    println!("{}", serde_json::to_string_pretty(&positions)?);
    Ok(())
}

pub fn scatter(args: &ScatterArgs) -> Vec<[f32; 3]> {
    let field = NoiseField::new(&mut random_source(args.seed));
    let jitter = PlacementJitter {
        spacing: args.spacing,
        amplitude: args.amplitude,
        ..Default::default()
    };
    jitter.positions(&field, args.count)
}
