//! Annotation Transformer: replays `engine::render`'s geometry
//! against each annotation's coordinates, then clips to the final canvas.
//! Two transport paths:
//!
//! - [`transform_matrix_precise`] (path A, preferred): uses the single
//!   composed `Matrix3` a `TrackingRecord` carries from `engine::render`.
//! - [`sequential::transform_sequential`] (path B, fallback): replays each
//!   geometric op's matrix one at a time for callers that only have a
//!   `TransformationConfig`, not a `TrackingRecord`.
//!
//! Both funnel into [`finish`], which clips to `[0,W] x [0,H]` and drops
//! annotations that clip to nothing.

pub mod clip;
pub mod sequential;

use crate::engine::resize::ResizeOutcome;
use crate::engine::TrackingRecord;
use crate::error::{ReleaseError, Result};
use crate::numeric::finite2;
use crate::types::{Annotation, BoundingBox, CanvasDims, Polygon};
use clip::{clip_polygon_to_rect, polygon_area, MIN_RING_AREA};

fn to_points(ann: &Annotation) -> Vec<(f64, f64)> {
    match ann {
        Annotation::Bbox(b) => vec![
            (b.x_min, b.y_min),
            (b.x_max, b.y_min),
            (b.x_max, b.y_max),
            (b.x_min, b.y_max),
        ],
        Annotation::Polygon(p) => p.points.clone(),
    }
}

fn apply_resize_offset(p: (f64, f64), outcome: &ResizeOutcome) -> (f64, f64) {
    (p.0 * outcome.scale_x + outcome.offset_x, p.1 * outcome.scale_y + outcome.offset_y)
}

/// Path A — matrix-precise transport: replays the
/// exact composed matrix `engine::render` rendered with, applies the
/// resize transport rule, and clips to the final canvas.
pub fn transform_matrix_precise(ann: &Annotation, tracking: &TrackingRecord) -> Result<Option<Annotation>> {
    let mut points = Vec::with_capacity(4);
    for (x, y) in to_points(ann) {
        let (px, py) = tracking.pre_resize_matrix.apply_point(x, y)?;
        let (fx, fy) = match &tracking.resize {
            Some(outcome) => apply_resize_offset((px, py), outcome),
            None => (px, py),
        };
        if !finite2(fx, fy) {
            return Err(ReleaseError::GeometryNumerical {
                op: "annotation_transport".to_string(),
                detail: "non-finite transported point".to_string(),
            });
        }
        points.push((fx, fy));
    }
    finish(ann, points, tracking.final_dims)
}

fn bounds(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    (x_min, y_min, x_max, y_max)
}

/// Clips the transported points to the final canvas and rebuilds the
/// annotation. A bounding box is re-derived as the axis-aligned envelope
/// of its (possibly rotated) transported corners after clipping — YOLO's
/// detection format has no rotated-box representation. Returns `Ok(None)`
/// (not an error — logged at debug level by the caller) when the ring
/// clips to fewer than 3 vertices or below `clip::MIN_RING_AREA`.
fn finish(ann: &Annotation, points: Vec<(f64, f64)>, final_dims: CanvasDims) -> Result<Option<Annotation>> {
    let (w, h) = final_dims.as_f64();
    match ann {
        Annotation::Bbox(b) => {
            let (x_min, y_min, x_max, y_max) = bounds(&points);
            let rect = [(x_min, y_min), (x_max, y_min), (x_max, y_max), (x_min, y_max)];
            let clipped = clip_polygon_to_rect(&rect, w, h);
            if clipped.is_empty() || polygon_area(&clipped) < MIN_RING_AREA {
                return Ok(None);
            }
            let (cx_min, cy_min, cx_max, cy_max) = bounds(&clipped);
            Ok(Some(Annotation::Bbox(BoundingBox {
                x_min: cx_min,
                y_min: cy_min,
                x_max: cx_max,
                y_max: cy_max,
                class_name: b.class_name.clone(),
                class_id: b.class_id,
                confidence: b.confidence,
            })))
        }
        Annotation::Polygon(p) => {
            let clipped = clip_polygon_to_rect(&points, w, h);
            if clipped.len() < 3 || polygon_area(&clipped) < MIN_RING_AREA {
                return Ok(None);
            }
            Ok(Some(Annotation::Polygon(Polygon {
                points: clipped,
                class_name: p.class_name.clone(),
                class_id: p.class_id,
                confidence: p.confidence,
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::matrix::Matrix3;
    use crate::types::BoundingBox;

    #[test]
    fn identity_matrix_round_trips_bbox() {
        let ann = Annotation::Bbox(BoundingBox {
            x_min: 10.0,
            y_min: 10.0,
            x_max: 50.0,
            y_max: 40.0,
            class_name: "cat".to_string(),
            class_id: 0,
            confidence: 1.0,
        });
        let tracking = TrackingRecord {
            original_dims: CanvasDims::new(640, 480),
            final_dims: CanvasDims::new(640, 480),
            pre_resize_matrix: Matrix3::identity(),
            pre_resize_dims: CanvasDims::new(640, 480),
            resize: None,
            ops_applied: vec![],
        };
        let out = transform_matrix_precise(&ann, &tracking).unwrap().unwrap();
        match out {
            Annotation::Bbox(b) => {
                assert_eq!((b.x_min, b.y_min, b.x_max, b.y_max), (10.0, 10.0, 50.0, 40.0));
            }
            _ => panic!("expected bbox"),
        }
    }

    #[test]
    fn box_fully_outside_canvas_is_dropped() {
        let ann = Annotation::Bbox(BoundingBox {
            x_min: 700.0,
            y_min: 700.0,
            x_max: 750.0,
            y_max: 750.0,
            class_name: "cat".to_string(),
            class_id: 0,
            confidence: 1.0,
        });
        let tracking = TrackingRecord {
            original_dims: CanvasDims::new(640, 480),
            final_dims: CanvasDims::new(640, 480),
            pre_resize_matrix: Matrix3::identity(),
            pre_resize_dims: CanvasDims::new(640, 480),
            resize: None,
            ops_applied: vec![],
        };
        assert!(transform_matrix_precise(&ann, &tracking).unwrap().is_none());
    }
}
