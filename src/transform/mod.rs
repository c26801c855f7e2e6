//! Transformation modeling: each tool is a variant of a sum type carrying
//! its own parameter record instead of a runtime string-to-function map,
//! so `engine::render` and `annotate` each get to pattern-match once
//! instead of drifting out of sync with each other.

pub mod geometric;
pub mod photometric;

use geometric::*;
use photometric::*;
use serde::{Deserialize, Serialize};

/// Registry key for a transformation tool; matches the keys
/// `registry::Registry::describe()` exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Resize,
    Rotate,
    Flip,
    Crop,
    RandomZoom,
    AffineTransform,
    PerspectiveWarp,
    Shear,
    Brightness,
    Contrast,
    Blur,
    Noise,
    Hue,
    Saturation,
    Gamma,
    Clahe,
    Cutout,
    ColorJitter,
    Grayscale,
    Equalize,
}

impl TypeTag {
    pub const ALL: [TypeTag; 20] = [
        TypeTag::Resize,
        TypeTag::Rotate,
        TypeTag::Flip,
        TypeTag::Crop,
        TypeTag::RandomZoom,
        TypeTag::AffineTransform,
        TypeTag::PerspectiveWarp,
        TypeTag::Shear,
        TypeTag::Brightness,
        TypeTag::Contrast,
        TypeTag::Blur,
        TypeTag::Noise,
        TypeTag::Hue,
        TypeTag::Saturation,
        TypeTag::Gamma,
        TypeTag::Clahe,
        TypeTag::Cutout,
        TypeTag::ColorJitter,
        TypeTag::Grayscale,
        TypeTag::Equalize,
    ];

    pub fn category(self) -> Category {
        use TypeTag::*;
        match self {
            Resize | Rotate | Flip | Crop | RandomZoom | AffineTransform | PerspectiveWarp
            | Shear => Category::Geometric,
            Brightness | Contrast | Blur | Noise | Hue | Saturation | Gamma | Clahe | Cutout
            | ColorJitter | Grayscale | Equalize => Category::Photometric,
        }
    }

    pub fn is_geometric(self) -> bool {
        self.category() == Category::Geometric
    }

    /// Whether this tool's parameter is mirrored (`v` and `-v`, or a
    /// domain-appropriate mirror) across consecutive variants by the Plan
    /// Generator. Deliberately restricted to sign-symmetric parameters —
    /// gamma and similar non-sign-symmetric tools don't have a meaningful
    /// mirror and are excluded.
    pub fn is_dual_value(self) -> bool {
        matches!(
            self,
            TypeTag::Rotate | TypeTag::Brightness | TypeTag::Contrast | TypeTag::Shear
                | TypeTag::Hue
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Geometric,
    Photometric,
}

/// One configured transformation tool with its concrete parameter record.
#[derive(Clone, Debug, PartialEq)]
pub enum Transformation {
    Resize(ResizeParams),
    Rotate(RotateParams),
    Flip(FlipParams),
    Crop(CropParams),
    RandomZoom(RandomZoomParams),
    AffineTransform(AffineTransformParams),
    PerspectiveWarp(PerspectiveWarpParams),
    Shear(ShearParams),
    Brightness(BrightnessParams),
    Contrast(ContrastParams),
    Blur(BlurParams),
    Noise(NoiseParams),
    Hue(HueParams),
    Saturation(SaturationParams),
    Gamma(GammaParams),
    Clahe(ClaheParams),
    Cutout(CutoutParams),
    ColorJitter(ColorJitterParams),
    Grayscale(GrayscaleParams),
    Equalize(EqualizeParams),
}

impl Transformation {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Transformation::Resize(_) => TypeTag::Resize,
            Transformation::Rotate(_) => TypeTag::Rotate,
            Transformation::Flip(_) => TypeTag::Flip,
            Transformation::Crop(_) => TypeTag::Crop,
            Transformation::RandomZoom(_) => TypeTag::RandomZoom,
            Transformation::AffineTransform(_) => TypeTag::AffineTransform,
            Transformation::PerspectiveWarp(_) => TypeTag::PerspectiveWarp,
            Transformation::Shear(_) => TypeTag::Shear,
            Transformation::Brightness(_) => TypeTag::Brightness,
            Transformation::Contrast(_) => TypeTag::Contrast,
            Transformation::Blur(_) => TypeTag::Blur,
            Transformation::Noise(_) => TypeTag::Noise,
            Transformation::Hue(_) => TypeTag::Hue,
            Transformation::Saturation(_) => TypeTag::Saturation,
            Transformation::Gamma(_) => TypeTag::Gamma,
            Transformation::Clahe(_) => TypeTag::Clahe,
            Transformation::Cutout(_) => TypeTag::Cutout,
            Transformation::ColorJitter(_) => TypeTag::ColorJitter,
            Transformation::Grayscale(_) => TypeTag::Grayscale,
            Transformation::Equalize(_) => TypeTag::Equalize,
        }
    }

    pub fn is_geometric(&self) -> bool {
        self.type_tag().is_geometric()
    }
}

/// An ordered mapping from `type_tag` to parameter record; insertion order
/// defines application order. Resize, if present, is
/// always moved to the end by `finalize_order` — see `plan::Generator`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformationConfig {
    ops: Vec<Transformation>,
}

impl TransformationConfig {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn push(&mut self, op: Transformation) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transformation> {
        self.ops.iter()
    }

    pub fn geometric_ops(&self) -> impl Iterator<Item = &Transformation> {
        self.ops.iter().filter(|op| op.is_geometric())
    }

    pub fn get(&self, tag: TypeTag) -> Option<&Transformation> {
        self.ops.iter().find(|op| op.type_tag() == tag)
    }

    pub fn resize(&self) -> Option<&ResizeParams> {
        match self.get(TypeTag::Resize) {
            Some(Transformation::Resize(p)) => Some(p),
            _ => None,
        }
    }

    /// Moves `resize` (if present) to the end while preserving the
    /// relative order of every other op: resize, if present, is always
    /// applied last, so annotation transport can treat all earlier ops as
    /// acting on the original canvas and resize as the final
    /// normalization to the output canvas.
    pub fn finalize_order(mut self) -> Self {
        if let Some(pos) = self.ops.iter().position(|op| op.type_tag() == TypeTag::Resize) {
            let resize = self.ops.remove(pos);
            self.ops.push(resize);
        }
        self
    }

    /// A deterministic descriptor for the variant's enabled non-baseline
    /// tools, used by the orchestrator to build output filenames, e.g.
    /// `brightness+30_flip_horizontal`.
    pub fn suffix(&self) -> String {
        let mut parts = Vec::new();
        for op in &self.ops {
            match op {
                Transformation::Resize(_) => {}
                Transformation::Rotate(p) => parts.push(format!(
                    "rotate{}{}",
                    if p.angle >= 0.0 { "" } else { "-" },
                    p.angle.abs() as i64
                )),
                Transformation::Flip(p) => {
                    if p.horizontal {
                        parts.push("flip_horizontal".to_string());
                    }
                    if p.vertical {
                        parts.push("flip_vertical".to_string());
                    }
                }
                Transformation::Crop(p) => parts.push(format!("crop{}", (p.percent * 100.0) as i64)),
                Transformation::RandomZoom(p) => {
                    parts.push(format!("zoom{}", (p.zoom_factor * 100.0) as i64))
                }
                Transformation::AffineTransform(_) => parts.push("affine".to_string()),
                Transformation::PerspectiveWarp(_) => parts.push("perspective".to_string()),
                Transformation::Shear(p) => parts.push(format!(
                    "shear{}{}",
                    if p.shear_angle >= 0.0 { "" } else { "-" },
                    p.shear_angle.abs() as i64
                )),
                Transformation::Brightness(p) => parts.push(format!(
                    "brightness{}{}",
                    if p.factor >= 0.0 { "+" } else { "-" },
                    (p.factor.abs() * 100.0) as i64
                )),
                Transformation::Contrast(p) => parts.push(format!(
                    "contrast{}{}",
                    if p.factor >= 0.0 { "+" } else { "-" },
                    (p.factor.abs() * 100.0) as i64
                )),
                Transformation::Blur(_) => parts.push("blur".to_string()),
                Transformation::Noise(_) => parts.push("noise".to_string()),
                Transformation::Hue(_) => parts.push("hue".to_string()),
                Transformation::Saturation(_) => parts.push("saturation".to_string()),
                Transformation::Gamma(_) => parts.push("gamma".to_string()),
                Transformation::Clahe(_) => parts.push("clahe".to_string()),
                Transformation::Cutout(_) => parts.push("cutout".to_string()),
                Transformation::ColorJitter(_) => parts.push("color_jitter".to_string()),
                Transformation::Grayscale(_) => parts.push("grayscale".to_string()),
                Transformation::Equalize(_) => parts.push("equalize".to_string()),
            }
        }
        if parts.is_empty() {
            "original".to_string()
        } else {
            parts.join("_")
        }
    }
}
