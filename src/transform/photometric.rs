//! Parameter records for the photometric transformation family. None of
//! these change canvas dimensions, so none of them appear in a
//! `TrackingRecord`'s geometry list.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrightnessParams {
    /// Engine-facing multiplicative factor, already bridged from a
    /// UI-facing percentage in `[-50, +50]` by `registry::bridge`.
    pub factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContrastParams {
    pub factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlurParams {
    pub radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Standard deviation of additive Gaussian noise, in `0..=255` pixel
    /// units.
    pub amount: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HueParams {
    /// Degrees of hue rotation.
    pub shift_degrees: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaturationParams {
    pub factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GammaParams {
    pub gamma: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaheParams {
    pub clip_limit: f64,
    pub tile_grid_size: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CutoutParams {
    pub num_holes: u32,
    /// Fraction of the shorter canvas edge used as each hole's side length.
    pub hole_size_pct: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorJitterParams {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub hue: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrayscaleParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EqualizeParams;
