//! Pixel Engine: renders one variant's `TransformationConfig` against
//! a source image, producing the output pixels and the `TrackingRecord`
//! `annotate` needs to replay the exact same geometry.
//!
//! Consecutive geometric ops are composed into a single `Matrix3` and
//! rendered with one backward-mapping warp; a photometric op in between
//! forces that pending warp to flush first, since it needs concrete
//! pixels to operate on. `resize`, always last (`TransformationConfig::
//! finalize_order`), is rendered by `resize::apply` for its mode-specific
//! letterbox/crop/filter behavior rather than folded into the matrix.

pub mod geometry_ops;
pub mod matrix;
pub mod photometric_ops;
pub mod resize;

use image::{Rgb, RgbImage};

use crate::error::Result;
use crate::transform::geometric::ResizeParams;
use crate::transform::{Transformation, TransformationConfig, TypeTag};
use crate::types::CanvasDims;
use matrix::Matrix3;
use resize::ResizeOutcome;

/// Everything `annotate` needs to reproduce `render`'s exact geometry for
/// one variant.
#[derive(Clone, Debug)]
pub struct TrackingRecord {
    pub original_dims: CanvasDims,
    pub final_dims: CanvasDims,
    /// Composed forward matrix covering every non-resize geometric op,
    /// mapping original-canvas coordinates to pre-resize-canvas coordinates.
    /// Identity if no geometric op (other than resize) was selected.
    pub pre_resize_matrix: Matrix3,
    /// Canvas dims immediately before `resize` runs (== `original_dims`
    /// unless a canvas-growing op — `rotate` with `expand=true` — ran).
    pub pre_resize_dims: CanvasDims,
    pub resize: Option<ResizeOutcome>,
    /// Every op's type tag, in the order it was actually applied (resize
    /// last if present), for manifest/debug logging.
    pub ops_applied: Vec<TypeTag>,
}

pub struct RenderOutput {
    pub image: RgbImage,
    pub tracking: TrackingRecord,
}

/// Renders one variant. `image_id`/`variant_index` seed every stochastic
/// tool so reruns of the same plan are byte-identical.
pub fn render(src: &RgbImage, config: &TransformationConfig, image_id: &str, variant_index: u32) -> Result<RenderOutput> {
    let (w0, h0) = src.dimensions();
    let original_dims = CanvasDims::new(w0, h0);
    let mut canvas_dims = original_dims;

    let mut pending = Matrix3::identity();
    let mut pending_fill = Rgb([0, 0, 0]);
    let mut has_pending = false;
    let mut composed = Matrix3::identity();

    let mut current = src.clone();
    let mut ops_applied = Vec::new();
    let mut resize_params: Option<ResizeParams> = None;

    for op in config.iter() {
        match op {
            Transformation::Resize(p) => {
                resize_params = Some(p.clone());
            }
            _ if op.is_geometric() => {
                let effect = geometry_ops::build(op, canvas_dims, image_id, variant_index)?;
                pending = pending.then(&effect.matrix);
                composed = composed.then(&effect.matrix);
                if let Some(fill) = effect.fill {
                    pending_fill = fill;
                }
                canvas_dims = effect.dims;
                has_pending = true;
                ops_applied.push(op.type_tag());
            }
            _ => {
                if has_pending {
                    current = geometry_ops::warp(&current, &pending, canvas_dims, pending_fill)?;
                    pending = Matrix3::identity();
                    has_pending = false;
                }
                photometric_ops::apply(&mut current, op, image_id, variant_index)?;
                ops_applied.push(op.type_tag());
            }
        }
    }
    if has_pending {
        current = geometry_ops::warp(&current, &pending, canvas_dims, pending_fill)?;
    }

    let pre_resize_dims = canvas_dims;
    let mut resize_outcome = None;
    if let Some(params) = resize_params {
        let (out, outcome) = resize::apply(&current, &params);
        current = out;
        canvas_dims = outcome.final_dims;
        resize_outcome = Some(outcome);
        ops_applied.push(TypeTag::Resize);
    }

    Ok(RenderOutput {
        image: current,
        tracking: TrackingRecord {
            original_dims,
            final_dims: canvas_dims,
            pre_resize_matrix: composed,
            pre_resize_dims,
            resize: resize_outcome,
            ops_applied,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::geometric::{FlipParams, ResizeMode};
    use crate::transform::TransformationConfig;

    #[test]
    fn identity_config_passes_through() {
        let img = RgbImage::from_pixel(8, 6, Rgb([10, 20, 30]));
        let cfg = TransformationConfig::new();
        let out = render(&img, &cfg, "img-1", 0).unwrap();
        assert_eq!(out.tracking.final_dims, CanvasDims::new(8, 6));
        assert_eq!(out.image.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn flip_then_resize_orders_resize_last() {
        let img = RgbImage::from_pixel(8, 6, Rgb([10, 20, 30]));
        let mut cfg = TransformationConfig::new();
        cfg.push(Transformation::Flip(FlipParams { horizontal: true, vertical: false }));
        cfg.push(Transformation::Resize(ResizeParams {
            width: 4,
            height: 4,
            mode: ResizeMode::StretchTo,
            fill_color: crate::transform::geometric::FillColor::Black,
        }));
        let cfg = cfg.finalize_order();
        let out = render(&img, &cfg, "img-1", 1).unwrap();
        assert_eq!(out.tracking.final_dims, CanvasDims::new(4, 4));
        assert!(out.tracking.resize.is_some());
    }
}
