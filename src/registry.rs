//! Transformation Registry: single source of truth for each tool's
//! parameter names, numeric bounds, default, step and category.
//! `bridge` is the *only* place UI-facing parameter scales
//! (e.g. brightness as a percentage in `[-50, +50]`) are converted to
//! engine-facing multiplicative or angular factors; `engine::render` and
//! `annotate` both operate on the engine-facing values `plan::Generator`
//! produces by routing every selection through it.

use crate::error::{ReleaseError, Result};
use crate::transform::{Category, TypeTag};
use std::collections::HashMap;

/// The primitive kind of a tool parameter, for schema consumers (e.g. a
/// UI) that don't know the tool ahead of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    Float,
    Int,
    Bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    pub kind: ParameterKind,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub unit: &'static str,
    pub choices: Option<&'static [&'static str]>,
}

#[derive(Clone, Debug)]
pub struct ToolSchema {
    pub category: Category,
    pub parameters: HashMap<&'static str, ParameterSpec>,
}

fn spec(kind: ParameterKind, min: f64, max: f64, default: f64, step: f64, unit: &'static str) -> ParameterSpec {
    ParameterSpec { kind, min, max, default, step, unit, choices: None }
}

/// Stateless registry of every tool's schema. Holds no data of its own;
/// `describe()` builds the schema table on demand the way a lookup table
/// would, without needing a `OnceLock` for a crate this small.
pub struct Registry;

impl Registry {
    /// `describe() -> mapping { type_tag -> { category, parameters } }`.
    pub fn describe() -> HashMap<TypeTag, ToolSchema> {
        let mut out = HashMap::new();

        let mut resize = HashMap::new();
        resize.insert("width", spec(ParameterKind::Int, 1.0, 8192.0, 640.0, 1.0, "px"));
        resize.insert("height", spec(ParameterKind::Int, 1.0, 8192.0, 640.0, 1.0, "px"));
        out.insert(TypeTag::Resize, ToolSchema { category: Category::Geometric, parameters: resize });

        let mut rotate = HashMap::new();
        rotate.insert("angle", spec(ParameterKind::Float, -45.0, 45.0, 15.0, 1.0, "deg"));
        out.insert(TypeTag::Rotate, ToolSchema { category: Category::Geometric, parameters: rotate });

        out.insert(TypeTag::Flip, ToolSchema { category: Category::Geometric, parameters: HashMap::new() });

        // Bounds span both accepted input conventions — a 0.0..=1.0
        // fraction or a 1.0..100.0 percentage — because the bound check
        // runs before `bridge`'s dual-scale conversion, so it must not
        // reject a valid fraction like 0.9 by only allowing the
        // percentage form's usual 50-100 range.
        let mut crop = HashMap::new();
        crop.insert("percent", spec(ParameterKind::Float, 0.0, 100.0, 90.0, 1.0, "%"));
        out.insert(TypeTag::Crop, ToolSchema { category: Category::Geometric, parameters: crop });

        let mut random_zoom = HashMap::new();
        random_zoom.insert("zoom_factor", spec(ParameterKind::Float, 0.5, 2.0, 1.2, 0.05, "x"));
        out.insert(TypeTag::RandomZoom, ToolSchema { category: Category::Geometric, parameters: random_zoom });

        let mut affine = HashMap::new();
        affine.insert("scale", spec(ParameterKind::Float, 0.5, 1.5, 1.0, 0.05, "x"));
        affine.insert("angle", spec(ParameterKind::Float, -45.0, 45.0, 0.0, 1.0, "deg"));
        affine.insert("shift_x_pct", spec(ParameterKind::Float, -20.0, 20.0, 0.0, 1.0, "%"));
        affine.insert("shift_y_pct", spec(ParameterKind::Float, -20.0, 20.0, 0.0, 1.0, "%"));
        out.insert(TypeTag::AffineTransform, ToolSchema { category: Category::Geometric, parameters: affine });

        let mut perspective = HashMap::new();
        perspective.insert("distortion_strength", spec(ParameterKind::Float, 0.0, 30.0, 10.0, 1.0, "%"));
        out.insert(TypeTag::PerspectiveWarp, ToolSchema { category: Category::Geometric, parameters: perspective });

        let mut shear = HashMap::new();
        shear.insert("shear_angle", spec(ParameterKind::Float, -30.0, 30.0, 10.0, 1.0, "deg"));
        out.insert(TypeTag::Shear, ToolSchema { category: Category::Geometric, parameters: shear });

        let mut brightness = HashMap::new();
        brightness.insert("value", spec(ParameterKind::Float, -50.0, 50.0, 20.0, 1.0, "%"));
        out.insert(TypeTag::Brightness, ToolSchema { category: Category::Photometric, parameters: brightness });

        let mut contrast = HashMap::new();
        contrast.insert("value", spec(ParameterKind::Float, -50.0, 50.0, 20.0, 1.0, "%"));
        out.insert(TypeTag::Contrast, ToolSchema { category: Category::Photometric, parameters: contrast });

        let mut blur = HashMap::new();
        blur.insert("radius", spec(ParameterKind::Float, 0.0, 10.0, 1.5, 0.1, "px"));
        out.insert(TypeTag::Blur, ToolSchema { category: Category::Photometric, parameters: blur });

        let mut noise = HashMap::new();
        noise.insert("amount", spec(ParameterKind::Float, 0.0, 50.0, 10.0, 1.0, "stddev"));
        out.insert(TypeTag::Noise, ToolSchema { category: Category::Photometric, parameters: noise });

        let mut hue = HashMap::new();
        hue.insert("shift_degrees", spec(ParameterKind::Float, -30.0, 30.0, 10.0, 1.0, "deg"));
        out.insert(TypeTag::Hue, ToolSchema { category: Category::Photometric, parameters: hue });

        let mut saturation = HashMap::new();
        saturation.insert("factor", spec(ParameterKind::Float, 0.0, 2.0, 1.2, 0.05, "x"));
        out.insert(TypeTag::Saturation, ToolSchema { category: Category::Photometric, parameters: saturation });

        let mut gamma = HashMap::new();
        gamma.insert("gamma", spec(ParameterKind::Float, 0.5, 2.0, 1.0, 0.05, "x"));
        out.insert(TypeTag::Gamma, ToolSchema { category: Category::Photometric, parameters: gamma });

        let mut clahe = HashMap::new();
        clahe.insert("clip_limit", spec(ParameterKind::Float, 1.0, 4.0, 2.0, 0.1, "x"));
        clahe.insert("tile_grid_size", spec(ParameterKind::Int, 2.0, 16.0, 8.0, 1.0, "tiles"));
        out.insert(TypeTag::Clahe, ToolSchema { category: Category::Photometric, parameters: clahe });

        let mut cutout = HashMap::new();
        cutout.insert("num_holes", spec(ParameterKind::Int, 1.0, 10.0, 1.0, 1.0, "count"));
        cutout.insert("hole_size_pct", spec(ParameterKind::Float, 1.0, 50.0, 10.0, 1.0, "%"));
        out.insert(TypeTag::Cutout, ToolSchema { category: Category::Photometric, parameters: cutout });

        let mut jitter = HashMap::new();
        jitter.insert("brightness", spec(ParameterKind::Float, 0.0, 50.0, 10.0, 1.0, "%"));
        jitter.insert("contrast", spec(ParameterKind::Float, 0.0, 50.0, 10.0, 1.0, "%"));
        jitter.insert("saturation", spec(ParameterKind::Float, 0.0, 50.0, 10.0, 1.0, "%"));
        jitter.insert("hue", spec(ParameterKind::Float, 0.0, 30.0, 5.0, 1.0, "deg"));
        out.insert(TypeTag::ColorJitter, ToolSchema { category: Category::Photometric, parameters: jitter });

        out.insert(TypeTag::Grayscale, ToolSchema { category: Category::Photometric, parameters: HashMap::new() });
        out.insert(TypeTag::Equalize, ToolSchema { category: Category::Photometric, parameters: HashMap::new() });

        out
    }

    pub fn is_geometric(tag: TypeTag) -> bool {
        tag.is_geometric()
    }

    /// Validates `user_value` against the tool's registered bounds and
    /// converts it into the engine-facing value `engine::render` and
    /// `annotate` operate on. The only place this conversion lives.
    pub fn bridge(tag: TypeTag, parameter_name: &str, user_value: f64) -> Result<f64> {
        let schema = Self::describe();
        let tool = schema.get(&tag).ok_or_else(|| {
            ReleaseError::ConfigInvalid(format!("unknown transformation tool {tag:?}"))
        })?;
        let param = tool.parameters.get(parameter_name).ok_or_else(|| {
            ReleaseError::ConfigInvalid(format!(
                "unknown parameter '{parameter_name}' for tool {tag:?}"
            ))
        })?;
        if user_value < param.min || user_value > param.max {
            return Err(ReleaseError::ConfigInvalid(format!(
                "{tag:?}.{parameter_name} = {user_value} out of bounds [{}, {}]",
                param.min, param.max
            )));
        }

        let engine_value = match (tag, parameter_name) {
            // Percentage deltas become multiplicative factors: value=20 -> factor=0.20.
            (TypeTag::Brightness, "value") | (TypeTag::Contrast, "value") => user_value / 100.0,
            // Crop accepts both a 0.0..=1.0 scale and a 1.0..100.0 percentage;
            // normalize both to a 0.0..=1.0 scale.
            (TypeTag::Crop, "percent") => {
                if user_value > 1.0 {
                    user_value / 100.0
                } else {
                    user_value
                }
            }
            (TypeTag::AffineTransform, "shift_x_pct") | (TypeTag::AffineTransform, "shift_y_pct") => {
                user_value / 100.0
            }
            (TypeTag::PerspectiveWarp, "distortion_strength") => user_value / 100.0,
            // Registered as a 1.0..50.0 percentage of the shorter canvas
            // edge; `apply_cutout` consumes a 0.0..1.0 fraction directly.
            (TypeTag::Cutout, "hole_size_pct") => user_value / 100.0,
            _ => user_value,
        };
        Ok(engine_value)
    }
}
