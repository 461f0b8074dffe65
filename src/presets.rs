//! Synthetic scalar fields
//!
//! Sample `(x, y)` is evaluated at normalized `(x / nx, y / ny)`.

use isoline_core::ScalarField;

use crate::config::{FieldConfig, FieldPreset};

/// Build the configured field at `nx` x `ny`
pub fn build_field(config: &FieldConfig, nx: u32, ny: u32) -> ScalarField {
    match config.preset {
        FieldPreset::Peak => peak(nx, ny, config.amplitude),
        FieldPreset::Ripple => ripple(nx, ny, config.frequency, config.amplitude),
        FieldPreset::Saddle => saddle(nx, ny, config.amplitude),
        FieldPreset::Constant => ScalarField::constant(nx, ny, config.value),
    }
}

fn normalized(x: u32, y: u32, nx: u32, ny: u32) -> (f32, f32) {
    (x as f32 / nx as f32, y as f32 / ny as f32)
}

/// Gaussian bump centered in the field
pub fn peak(nx: u32, ny: u32, amplitude: f32) -> ScalarField {
    ScalarField::from_fn(nx, ny, |x, y| {
        let (u, v) = normalized(x, y, nx, ny);
        let r2 = (u - 0.5).powi(2) + (v - 0.5).powi(2);
        amplitude * (-r2 / 0.05).exp()
    })
}

/// Concentric rings, `amplitude * cos(frequency * r)`
pub fn ripple(nx: u32, ny: u32, frequency: f32, amplitude: f32) -> ScalarField {
    ScalarField::from_fn(nx, ny, |x, y| {
        let (u, v) = normalized(x, y, nx, ny);
        let r = ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt();
        amplitude * (frequency * r).cos()
    })
}

/// Hyperbolic saddle through the center
pub fn saddle(nx: u32, ny: u32, amplitude: f32) -> ScalarField {
    ScalarField::from_fn(nx, ny, |x, y| {
        let (u, v) = normalized(x, y, nx, ny);
        amplitude * (u - 0.5) * (v - 0.5)
    })
}
