//! Animated noise texture synthesis

use std::path::Path;

use ember_core::{EmberError, Result};
use image::{Rgba, RgbaImage};

use crate::field::NoiseField;

/// Per-texel noise texture, scrolled along +X over time
#[derive(Debug, Clone, Copy)]
pub struct NoiseTexture {
    pub width: u32,
    pub height: u32,
    /// Noise units per texel
    pub scale: f64,
    /// Noise units scrolled per second
    pub speed: f64,
}

impl NoiseTexture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 0.05,
            speed: 1.0,
        }
    }

    /// Noise coordinate of texel `(px, py)` at `time`
    pub fn coordinate(&self, px: u32, py: u32, time: f64) -> (f64, f64) {
        (
            px as f64 * self.scale + time * self.speed,
            py as f64 * self.scale,
        )
    }

    /// Synthesize one frame of the texture
    pub fn render(&self, field: &NoiseField, time: f64) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |px, py| {
            let (x, y) = self.coordinate(px, py, time);
            shade(field.sample(x, y))
        })
    }

    /// Synthesize a frame and write it as PNG
    pub fn save_png(&self, field: &NoiseField, time: f64, path: &Path) -> Result<()> {
        let img = self.render(field, time);
        img.save(path)
            .map_err(|e| EmberError::Image(format!("{}: {}", path.display(), e)))?;
        log::info!(
            "Wrote {}x{} noise texture to {}",
            self.width,
            self.height,
            path.display()
        );
        Ok(())
    }
}

/// Map a noise value in [-1, 1] to an opaque fire-tinted texel
fn shade(n: f64) -> Rgba<u8> {
    let v = ((n + 1.0) * 0.5).clamp(0.0, 1.0);
    let r = v;
    let g = v * v;
    let b = v * v * v * v;
    Rgba([to_byte(r), to_byte(g), to_byte(b), 255])
}

fn to_byte(v: f64) -> u8 {
    (v * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::ParticleRng;

    fn field() -> NoiseField {
        NoiseField::new(&mut ParticleRng::new(31))
    }

    #[test]
    fn render_has_requested_dimensions() {
        let tex = NoiseTexture::new(16, 8);
        let img = tex.render(&field(), 0.0);
        assert_eq!(img.dimensions(), (16, 8));
        assert!(img.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn zero_noise_maps_to_mid_grey_red() {
        assert_eq!(shade(0.0).0[0], 128);
        assert_eq!(shade(-1.0).0, [0, 0, 0, 255]);
        assert_eq!(shade(1.0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn time_scrolls_the_texture() {
        let mut tex = NoiseTexture::new(32, 32);
        tex.scale = 0.13;
        tex.speed = 0.5;
        let f = field();
        let a = tex.render(&f, 0.0);
        let b = tex.render(&f, 1.7);
        assert_ne!(a, b);
        // Same frame twice is identical
        assert_eq!(a, tex.render(&f, 0.0));
    }

    #[test]
    fn save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.png");
        NoiseTexture::new(4, 4).save_png(&field(), 0.0, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_png_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("noise.png");
        let err = NoiseTexture::new(4, 4)
            .save_png(&field(), 0.0, &path)
            .unwrap_err();
        assert!(matches!(err, EmberError::Image(_)));
    }
}
