//! Parameter records for the geometric transformation family. Each struct
//! here is the engine-facing representation: values already bridged from
//! UI-facing scales by `registry::bridge`.

use serde::{Deserialize, Serialize};

/// How `resize` fits a source image into its target `(width, height)`.
///
/// `fit_within` is the one mode whose final canvas differs from the
/// nominal target — see `engine::resize` for the rendering and
/// `annotate` for the matching transport rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    StretchTo,
    FillCenterCrop,
    FitWithin,
    FitReflectEdges,
    FitBlackEdges,
    FitWhiteEdges,
}

/// Padding/fill color used by letterboxing and rotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FillColor {
    Black,
    White,
    /// Edge-reflected padding (only meaningful for `fit_reflect_edges`).
    ReflectEdges,
}

impl FillColor {
    pub fn rgb(self) -> image::Rgb<u8> {
        match self {
            FillColor::Black => image::Rgb([0, 0, 0]),
            FillColor::White => image::Rgb([255, 255, 255]),
            // A concrete color is never sampled for ReflectEdges; callers
            // branch on the variant before reaching for `rgb()`.
            FillColor::ReflectEdges => image::Rgb([0, 0, 0]),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
    pub mode: ResizeMode,
    pub fill_color: FillColor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotateParams {
    /// Degrees, positive counter-clockwise.
    pub angle: f64,
    /// When true the canvas grows to fit the rotated bounds (matrix-precise
    /// mode); when false the canvas is unchanged and corners are clipped.
    pub expand: bool,
    pub fill_color: FillColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlipParams {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Where the crop rectangle's origin is anchored before it is rescaled
/// back to the input dimensions (crop is a zoom-in, not a canvas shrink).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropMode {
    Center,
    Random,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropParams {
    /// Linear scale in `0.0..=1.0`; area of the crop rectangle is
    /// `percent^2` of the source area. `registry::bridge` normalizes both
    /// the `0.0..=1.0` and `1.0..=100.0` input conventions into this form.
    pub percent: f64,
    pub mode: CropMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomZoomParams {
    /// `>1.0` crops to the center region then rescales up; `<1.0` shrinks
    /// then pads with the canvas fill color.
    pub zoom_factor: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineTransformParams {
    pub scale: f64,
    /// Degrees, positive counter-clockwise.
    pub angle: f64,
    pub shift_x_pct: f64,
    pub shift_y_pct: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveWarpParams {
    /// Fraction of `min(width, height)` by which each source corner may be
    /// displaced inward when choosing destination corners.
    pub distortion_strength: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShearParams {
    /// Degrees; horizontal shear `x' = x + tan(angle) * y`.
    pub shear_angle: f64,
}
