//! Path B — sequential transport fallback: replays each non-resize
//! geometric op's matrix against the annotation's points one op at a time,
//! instead of composing them first. Grounded in the
//! same per-op semantics as the matrix-precise path, reusing
//! `engine::geometry_ops::build`; kept distinct because it is allowed to
//! drift by rounding from the composed path when many ops are chained —
//! callers that only have a `TransformationConfig` and not a
//! `TrackingRecord`'s composed matrix use this instead.

use crate::engine::geometry_ops;
use crate::engine::resize::ResizeOutcome;
use crate::transform::{TransformationConfig, TypeTag};
use crate::types::{Annotation, CanvasDims};
use crate::error::Result;

use super::{apply_resize_offset, finish, to_points};

pub fn transform_sequential(
    ann: &Annotation,
    config: &TransformationConfig,
    original_dims: CanvasDims,
    image_id: &str,
    variant_index: u32,
    resize: Option<&ResizeOutcome>,
) -> Result<Option<Annotation>> {
    let mut points = to_points(ann);
    let mut canvas = original_dims;

    for op in config.iter() {
        if op.type_tag() == TypeTag::Resize || !op.is_geometric() {
            continue;
        }
        let effect = geometry_ops::build(op, canvas, image_id, variant_index)?;
        for p in points.iter_mut() {
            *p = effect.matrix.apply_point(p.0, p.1)?;
        }
        canvas = effect.dims;
    }

    let final_dims = if let Some(outcome) = resize {
        for p in points.iter_mut() {
            *p = apply_resize_offset(*p, outcome);
        }
        outcome.final_dims
    } else {
        canvas
    };

    finish(ann, points, final_dims)
}
