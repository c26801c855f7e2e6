//! Plan Generator: turns a user's transformation selection plus a
//! `variants_per_original` count into a deterministic, ordered
//! `AugmentationPlan`.

use crate::registry::Registry;
use crate::transform::geometric::*;
use crate::transform::photometric::*;
use crate::transform::{Transformation, TransformationConfig, TypeTag};
use crate::Result;

/// One user-declared tool selection, in UI-facing parameter scales
/// (percentages, degrees) — the form the release request bundle carries
/// them in. Enumerated in the order the user declared
/// them; that order is preserved into every variant's `TransformationConfig`
/// except for `resize`, which `finalize_order` always moves last.
#[derive(Clone, Debug, PartialEq)]
pub enum UserToolSpec {
    Resize { width: u32, height: u32, mode: ResizeMode, fill_color: FillColor },
    Rotate { angle: f64, expand: bool, fill_color: FillColor },
    Flip { horizontal: bool, vertical: bool },
    Crop { percent: f64, mode: CropMode },
    RandomZoom { zoom_factor: f64 },
    AffineTransform { scale: f64, angle: f64, shift_x_pct: f64, shift_y_pct: f64 },
    PerspectiveWarp { distortion_strength: f64 },
    Shear { shear_angle: f64 },
    Brightness { value: f64 },
    Contrast { value: f64 },
    Blur { radius: f64 },
    Noise { amount: f64 },
    Hue { shift_degrees: f64 },
    Saturation { factor: f64 },
    Gamma { gamma: f64 },
    Clahe { clip_limit: f64, tile_grid_size: u32 },
    Cutout { num_holes: u32, hole_size_pct: f64 },
    ColorJitter { brightness: f64, contrast: f64, saturation: f64, hue: f64 },
    Grayscale,
    Equalize,
}

impl UserToolSpec {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            UserToolSpec::Resize { .. } => TypeTag::Resize,
            UserToolSpec::Rotate { .. } => TypeTag::Rotate,
            UserToolSpec::Flip { .. } => TypeTag::Flip,
            UserToolSpec::Crop { .. } => TypeTag::Crop,
            UserToolSpec::RandomZoom { .. } => TypeTag::RandomZoom,
            UserToolSpec::AffineTransform { .. } => TypeTag::AffineTransform,
            UserToolSpec::PerspectiveWarp { .. } => TypeTag::PerspectiveWarp,
            UserToolSpec::Shear { .. } => TypeTag::Shear,
            UserToolSpec::Brightness { .. } => TypeTag::Brightness,
            UserToolSpec::Contrast { .. } => TypeTag::Contrast,
            UserToolSpec::Blur { .. } => TypeTag::Blur,
            UserToolSpec::Noise { .. } => TypeTag::Noise,
            UserToolSpec::Hue { .. } => TypeTag::Hue,
            UserToolSpec::Saturation { .. } => TypeTag::Saturation,
            UserToolSpec::Gamma { .. } => TypeTag::Gamma,
            UserToolSpec::Clahe { .. } => TypeTag::Clahe,
            UserToolSpec::Cutout { .. } => TypeTag::Cutout,
            UserToolSpec::ColorJitter { .. } => TypeTag::ColorJitter,
            UserToolSpec::Grayscale => TypeTag::Grayscale,
            UserToolSpec::Equalize => TypeTag::Equalize,
        }
    }
}

/// For one original image: an ordered sequence of `TransformationConfig`s,
/// one per variant to emit. `plans[0]` is always the baseline.
#[derive(Clone, Debug, Default)]
pub struct AugmentationPlan {
    pub configs: Vec<TransformationConfig>,
    /// Diagnostic only: the maximum number of
    /// *distinct* non-baseline combinations the dual-value mirrors make
    /// available. When `variants_per_original` exceeds it the sign-flip
    /// cycle in `configs[1..]` repeats rather than truncating the plan —
    /// the plan length is always `1 + variants_per_original`.
    pub combination_count: u64,
}

impl AugmentationPlan {
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// Stable (non-cryptographic) FNV-1a hash, used instead of
/// `std::collections::hash_map::DefaultHasher` because the latter's
/// output is only documented to be stable within a single compiler
/// version — the per-(image, variant) seed has to reproduce identically
/// across releases and machines.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Deterministic seed for any stochastic tool (`random_zoom`,
/// `crop.mode=random`, `noise`, `perspective_warp`) applied to variant
/// `variant_index` of image `image_id`, favoring reproducibility over
/// true randomness.
pub fn variant_seed(image_id: &str, variant_index: u32) -> u64 {
    let mut buf = Vec::with_capacity(image_id.len() + 4);
    buf.extend_from_slice(image_id.as_bytes());
    buf.extend_from_slice(&variant_index.to_le_bytes());
    fnv1a(&buf)
}

pub struct Generator;

impl Generator {
    /// Builds the `AugmentationPlan` for one image. `variants_per_original`
    /// is honored exactly: the returned plan always has
    /// `1 + variants_per_original` entries.
    pub fn generate(
        selections: &[UserToolSpec],
        variants_per_original: u32,
        image_id: &str,
    ) -> Result<AugmentationPlan> {
        Self::validate_all(selections)?;

        let resize = selections.iter().find(|s| matches!(s, UserToolSpec::Resize { .. }));
        let non_resize: Vec<&UserToolSpec> =
            selections.iter().filter(|s| !matches!(s, UserToolSpec::Resize { .. })).collect();

        let dual_count = non_resize.iter().filter(|s| s.type_tag().is_dual_value()).count();
        let combination_count = 1u64 << dual_count.min(62);

        let mut configs = Vec::with_capacity(1 + variants_per_original as usize);

        // Plan[0]: baseline — resize-only if selected, else identity.
        let mut baseline = TransformationConfig::new();
        if let Some(r) = resize {
            baseline.push(Self::build(r, false, image_id, 0)?);
        }
        configs.push(baseline.finalize_order());

        for variant_index in 1..=variants_per_original {
            let mut cfg = TransformationConfig::new();
            for sel in &non_resize {
                // Dual-value tools alternate auto/user starting with auto
                // at variant 1; all other tools use their single
                // configured value every variant, with any stochastic
                // behavior seeded per-variant instead.
                let use_auto = sel.type_tag().is_dual_value() && variant_index % 2 == 1;
                cfg.push(Self::build(sel, use_auto, image_id, variant_index)?);
            }
            if let Some(r) = resize {
                cfg.push(Self::build(r, false, image_id, variant_index)?);
            }
            configs.push(cfg.finalize_order());
        }

        Ok(AugmentationPlan { configs, combination_count })
    }

    /// Bounds-checks every selection against the registry. Meant to run
    /// once over a whole release request before any image is touched, so
    /// a bad parameter aborts the build instead of being rediscovered
    /// (and silently swallowed) per image.
    pub fn validate_all(selections: &[UserToolSpec]) -> Result<()> {
        for sel in selections {
            Self::validate(sel)?;
        }
        Ok(())
    }

    fn validate(sel: &UserToolSpec) -> Result<()> {
        let tag = sel.type_tag();
        match sel {
            UserToolSpec::Rotate { angle, .. } => {
                Registry::bridge(tag, "angle", *angle)?;
            }
            UserToolSpec::Crop { percent, .. } => {
                Registry::bridge(tag, "percent", *percent)?;
            }
            UserToolSpec::RandomZoom { zoom_factor } => {
                Registry::bridge(tag, "zoom_factor", *zoom_factor)?;
            }
            UserToolSpec::AffineTransform { scale, angle, shift_x_pct, shift_y_pct } => {
                Registry::bridge(tag, "scale", *scale)?;
                Registry::bridge(tag, "angle", *angle)?;
                Registry::bridge(tag, "shift_x_pct", *shift_x_pct)?;
                Registry::bridge(tag, "shift_y_pct", *shift_y_pct)?;
            }
            UserToolSpec::PerspectiveWarp { distortion_strength } => {
                Registry::bridge(tag, "distortion_strength", *distortion_strength)?;
            }
            UserToolSpec::Shear { shear_angle } => {
                Registry::bridge(tag, "shear_angle", *shear_angle)?;
            }
            UserToolSpec::Brightness { value } => {
                Registry::bridge(tag, "value", *value)?;
            }
            UserToolSpec::Contrast { value } => {
                Registry::bridge(tag, "value", *value)?;
            }
            UserToolSpec::Hue { shift_degrees } => {
                Registry::bridge(tag, "shift_degrees", *shift_degrees)?;
            }
            UserToolSpec::Cutout { hole_size_pct, .. } => {
                Registry::bridge(tag, "hole_size_pct", *hole_size_pct)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Builds the engine-facing `Transformation` for one selection at one
    /// variant. `use_auto` selects the mirrored value for dual-value
    /// tools; it is ignored for every other tool. `image_id`/`variant_index`
    /// are threaded through for parity with the render-time stochastic
    /// tools, which reseed independently from the same pair via
    /// `engine::geometry_ops::seeded_rng`.
    fn build(
        sel: &UserToolSpec,
        use_auto: bool,
        _image_id: &str,
        _variant_index: u32,
    ) -> Result<Transformation> {
        let tag = sel.type_tag();
        let mirror = |v: f64| if use_auto { -v } else { v };

        Ok(match sel {
            UserToolSpec::Resize { width, height, mode, fill_color } => {
                Transformation::Resize(ResizeParams {
                    width: *width,
                    height: *height,
                    mode: *mode,
                    fill_color: *fill_color,
                })
            }
            UserToolSpec::Rotate { angle, expand, fill_color } => {
                let bridged = Registry::bridge(tag, "angle", *angle)?;
                Transformation::Rotate(RotateParams {
                    angle: mirror(bridged),
                    expand: *expand,
                    fill_color: *fill_color,
                })
            }
            UserToolSpec::Flip { horizontal, vertical } => {
                Transformation::Flip(FlipParams { horizontal: *horizontal, vertical: *vertical })
            }
            UserToolSpec::Crop { percent, mode } => {
                let bridged = Registry::bridge(tag, "percent", *percent)?;
                Transformation::Crop(CropParams { percent: bridged, mode: *mode })
            }
            UserToolSpec::RandomZoom { zoom_factor } => {
                let bridged = Registry::bridge(tag, "zoom_factor", *zoom_factor)?;
                Transformation::RandomZoom(RandomZoomParams { zoom_factor: bridged })
            }
            UserToolSpec::AffineTransform { scale, angle, shift_x_pct, shift_y_pct } => {
                Transformation::AffineTransform(AffineTransformParams {
                    scale: Registry::bridge(tag, "scale", *scale)?,
                    angle: Registry::bridge(tag, "angle", *angle)?,
                    shift_x_pct: Registry::bridge(tag, "shift_x_pct", *shift_x_pct)?,
                    shift_y_pct: Registry::bridge(tag, "shift_y_pct", *shift_y_pct)?,
                })
            }
            UserToolSpec::PerspectiveWarp { distortion_strength } => {
                Transformation::PerspectiveWarp(PerspectiveWarpParams {
                    distortion_strength: Registry::bridge(tag, "distortion_strength", *distortion_strength)?,
                })
            }
            UserToolSpec::Shear { shear_angle } => {
                let bridged = Registry::bridge(tag, "shear_angle", *shear_angle)?;
                Transformation::Shear(ShearParams { shear_angle: mirror(bridged) })
            }
            UserToolSpec::Brightness { value } => {
                let bridged = Registry::bridge(tag, "value", *value)?;
                Transformation::Brightness(BrightnessParams { factor: mirror(bridged) })
            }
            UserToolSpec::Contrast { value } => {
                let bridged = Registry::bridge(tag, "value", *value)?;
                Transformation::Contrast(ContrastParams { factor: mirror(bridged) })
            }
            UserToolSpec::Blur { radius } => Transformation::Blur(BlurParams { radius: *radius }),
            UserToolSpec::Noise { amount } => Transformation::Noise(NoiseParams { amount: *amount }),
            UserToolSpec::Hue { shift_degrees } => {
                let bridged = Registry::bridge(tag, "shift_degrees", *shift_degrees)?;
                Transformation::Hue(HueParams { shift_degrees: mirror(bridged) })
            }
            UserToolSpec::Saturation { factor } => {
                Transformation::Saturation(SaturationParams { factor: *factor })
            }
            UserToolSpec::Gamma { gamma } => Transformation::Gamma(GammaParams { gamma: *gamma }),
            UserToolSpec::Clahe { clip_limit, tile_grid_size } => {
                Transformation::Clahe(ClaheParams { clip_limit: *clip_limit, tile_grid_size: *tile_grid_size })
            }
            UserToolSpec::Cutout { num_holes, hole_size_pct } => {
                let bridged = Registry::bridge(tag, "hole_size_pct", *hole_size_pct)?;
                Transformation::Cutout(CutoutParams { num_holes: *num_holes, hole_size_pct: bridged })
            }
            UserToolSpec::ColorJitter { brightness, contrast, saturation, hue } => {
                Transformation::ColorJitter(ColorJitterParams {
                    brightness: *brightness,
                    contrast: *contrast,
                    saturation: *saturation,
                    hue: *hue,
                })
            }
            UserToolSpec::Grayscale => Transformation::Grayscale(GrayscaleParams),
            UserToolSpec::Equalize => Transformation::Equalize(EqualizeParams),
        })
    }
}
