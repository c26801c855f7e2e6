//! YOLO Encoder: turns a transported `Annotation` plus its final
//! canvas dims into one YOLO-format label line.
//! Detection lines are `class_id x_center y_center width height`;
//! segmentation lines are `class_id x1 y1 x2 y2 ...` — both normalized
//! against the final canvas and formatted to six decimal places.

pub mod classmap;
pub mod yaml;

use crate::config::ExportFormat;
use crate::error::{ReleaseError, Result};
use crate::types::{Annotation, CanvasDims};
use classmap::ClassMap;

/// Tolerance for the post-clip bounds check: clipping against `[0,W]x[0,H]`
/// should make every normalized value land in `[0,1]` exactly, but
/// floating-point rounding can push a clipped vertex a hair outside — this
/// absorbs that without masking a real upstream inconsistency.
const BOUNDS_EPS: f64 = 1e-6;

fn fmt6(v: f64) -> String {
    format!("{v:.6}")
}

fn normalize_clamped(v: f64, extent: f64) -> Result<f64> {
    let n = v / extent;
    if !(-BOUNDS_EPS..=1.0 + BOUNDS_EPS).contains(&n) {
        return Err(ReleaseError::EncodeBounds(format!(
            "normalized value {n} escaped [0,1] (raw={v}, extent={extent})"
        )));
    }
    Ok(n.clamp(0.0, 1.0))
}

fn envelope(points: &[(f64, f64)]) -> (f64, f64, f64, f64) {
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

/// Encodes one transported annotation as a YOLO label line, resolving its
/// class name through the frozen `ClassMap`. `export_format` selects the
/// label dialect independent of the annotation's own shape: a polygon is
/// collapsed to its axis-aligned envelope for `YoloDetection`, and a box
/// is re-expressed as its four corners for `YoloSegmentation`. Returns
/// `Ok(None)` (not an error) when the shape degenerates after transport.
pub fn encode_line(ann: &Annotation, final_dims: CanvasDims, classes: &ClassMap, export_format: ExportFormat) -> Result<Option<String>> {
    match export_format {
        ExportFormat::YoloDetection => encode_bbox_line(ann, final_dims, classes),
        ExportFormat::YoloSegmentation => encode_polygon_line(ann, final_dims, classes),
    }
}

fn encode_bbox_line(ann: &Annotation, final_dims: CanvasDims, classes: &ClassMap) -> Result<Option<String>> {
    let (w, h) = final_dims.as_f64();
    let (class_name, x_min, y_min, x_max, y_max) = match ann {
        Annotation::Bbox(b) => {
            if !b.is_valid() {
                return Ok(None);
            }
            (&b.class_name, b.x_min, b.y_min, b.x_max, b.y_max)
        }
        Annotation::Polygon(p) => {
            if p.points.len() < 3 {
                return Ok(None);
            }
            let (x_min, y_min, x_max, y_max) = envelope(&p.points);
            (&p.class_name, x_min, y_min, x_max, y_max)
        }
    };
    let class_id = classes.resolve(class_name);
    let cx = normalize_clamped((x_min + x_max) / 2.0, w)?;
    let cy = normalize_clamped((y_min + y_max) / 2.0, h)?;
    let bw = normalize_clamped(x_max - x_min, w)?;
    let bh = normalize_clamped(y_max - y_min, h)?;
    Ok(Some(format!("{class_id} {} {} {} {}", fmt6(cx), fmt6(cy), fmt6(bw), fmt6(bh))))
}

fn encode_polygon_line(ann: &Annotation, final_dims: CanvasDims, classes: &ClassMap) -> Result<Option<String>> {
    let (w, h) = final_dims.as_f64();
    let (class_name, points): (&str, Vec<(f64, f64)>) = match ann {
        Annotation::Bbox(b) => {
            if !b.is_valid() {
                return Ok(None);
            }
            (
                &b.class_name,
                vec![(b.x_min, b.y_min), (b.x_max, b.y_min), (b.x_max, b.y_max), (b.x_min, b.y_max)],
            )
        }
        Annotation::Polygon(p) => {
            if p.points.len() < 3 {
                return Ok(None);
            }
            (&p.class_name, p.points.clone())
        }
    };
    let class_id = classes.resolve(class_name);
    let mut coords = Vec::with_capacity(points.len() * 2);
    for (x, y) in points {
        coords.push(fmt6(normalize_clamped(x, w)?));
        coords.push(fmt6(normalize_clamped(y, h)?));
    }
    Ok(Some(format!("{class_id} {}", coords.join(" "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    #[test]
    fn encodes_detection_line_matching_scenario_s1() {
        // 640x480 canvas, bbox (100,80,300,240), identity transform.
        let classes = ClassMap::build(vec!["cat".to_string()]);
        let ann = Annotation::Bbox(BoundingBox {
            x_min: 100.0,
            y_min: 80.0,
            x_max: 300.0,
            y_max: 240.0,
            class_name: "cat".to_string(),
            class_id: 0,
            confidence: 1.0,
        });
        let line = encode_line(&ann, CanvasDims::new(640, 480), &classes, ExportFormat::YoloDetection).unwrap().unwrap();
        assert_eq!(line, "0 0.312500 0.333333 0.312500 0.333333");
    }

    #[test]
    fn out_of_bounds_value_is_rejected() {
        let classes = ClassMap::build(vec!["cat".to_string()]);
        let ann = Annotation::Bbox(BoundingBox {
            x_min: -500.0,
            y_min: 80.0,
            x_max: 300.0,
            y_max: 240.0,
            class_name: "cat".to_string(),
            class_id: 0,
            confidence: 1.0,
        });
        assert!(encode_line(&ann, CanvasDims::new(640, 480), &classes, ExportFormat::YoloDetection).is_err());
    }
}
