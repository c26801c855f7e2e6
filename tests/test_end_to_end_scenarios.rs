//! Six end-to-end release scenarios: a synthetic 640x480 `cat.jpg` with one bbox
//! `(100, 80, 300, 240)`, class `cat`, run end to end through
//! `orchestrator::build_release` against a real (tempdir) filesystem sink.

use image::{GenericImageView, Rgb, RgbImage};
use release_forge::orchestrator::manifest::Manifest;
use release_forge::prelude::*;
use release_forge::transform::geometric::{FillColor, ResizeMode};
use std::path::Path;

fn init_logging() {
    let _ = tracing_subscriber::fmt::try_init();
}

fn write_source_image(dir: &Path, name: &str, w: u32, h: u32) -> String {
    let img = RgbImage::from_pixel(w, h, Rgb([120, 140, 160]));
    let path = dir.join(name);
    img.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

fn cat_image(dir: &Path, split: Split) -> SourceImage {
    let path = write_source_image(dir, "cat.jpg", 640, 480);
    SourceImage {
        id: "cat".to_string(),
        file_path: path,
        width: 640,
        height: 480,
        split,
        dataset_id: "ds".to_string(),
    }
}

fn cat_bbox() -> BoundingBox {
    BoundingBox {
        x_min: 100.0,
        y_min: 80.0,
        x_max: 300.0,
        y_max: 240.0,
        class_name: "cat".to_string(),
        class_id: 0,
        confidence: 1.0,
    }
}

fn read_label(release_root: &Path, file_name: &str) -> String {
    std::fs::read_to_string(release_root.join("labels/train").join(file_name)).unwrap()
}

fn build(release_root: &Path, image: SourceImage, bbox: BoundingBox, selections: Vec<UserToolSpec>, variants: u32) -> Manifest {
    let src = InMemorySource::new().with_image(image, vec![Annotation::Bbox(bbox)]);
    let sink = FsSink::new(release_root);
    let request = ReleaseRequest {
        release_name: "scenario-release".to_string(),
        dataset_id: "ds".to_string(),
        release_root: release_root.to_string_lossy().into_owned(),
        selections,
        variants_per_original: variants,
        task_type: TaskType::ObjectDetection,
        export_format: ExportFormat::YoloDetection,
        options: ReleaseOptions { max_concurrency: 1, ..ReleaseOptions::default() },
    };
    build_release(&request, &src, &sink).unwrap()
}

#[test]
fn s1_stretch_to_320x320() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let image = cat_image(dir.path(), Split::Train);
    build(
        dir.path(),
        image,
        cat_bbox(),
        vec![UserToolSpec::Resize {
            width: 320,
            height: 320,
            mode: ResizeMode::StretchTo,
            fill_color: FillColor::Black,
        }],
        0,
    );
    let label = read_label(dir.path(), "cat_original.txt");
    assert_eq!(label.trim(), "0 0.312500 0.333333 0.312500 0.333333");
}

#[test]
fn s2_fit_within_320x320() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let image = cat_image(dir.path(), Split::Train);
    build(
        dir.path(),
        image,
        cat_bbox(),
        vec![UserToolSpec::Resize {
            width: 320,
            height: 320,
            mode: ResizeMode::FitWithin,
            fill_color: FillColor::Black,
        }],
        0,
    );
    let label = read_label(dir.path(), "cat_original.txt");
    assert_eq!(label.trim(), "0 0.312500 0.333333 0.312500 0.333333");

    // final canvas is (320, 240), not the nominal (320, 320).
    let img = image::open(dir.path().join("images/train/cat_original.jpg")).unwrap();
    assert_eq!(img.dimensions(), (320, 240));
}

#[test]
fn s3_fit_black_edges_320x320() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let image = cat_image(dir.path(), Split::Train);
    build(
        dir.path(),
        image,
        cat_bbox(),
        vec![UserToolSpec::Resize {
            width: 320,
            height: 320,
            mode: ResizeMode::FitBlackEdges,
            fill_color: FillColor::Black,
        }],
        0,
    );
    let label = read_label(dir.path(), "cat_original.txt");
    // s=0.5, pad_y=round((320-240)/2)=40: bbox (50,80,150,160) on a
    // 320x320 canvas -> cx=100/320, cy=120/320, w=100/320, h=80/320.
    assert_eq!(label.trim(), "0 0.312500 0.375000 0.312500 0.250000");
}

#[test]
fn s4_flip_horizontal_only() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let image = cat_image(dir.path(), Split::Train);
    build(
        dir.path(),
        image,
        cat_bbox(),
        vec![UserToolSpec::Flip { horizontal: true, vertical: false }],
        0,
    );
    let label = read_label(dir.path(), "cat_flip_horizontal.txt");
    assert_eq!(label.trim(), "0 0.687500 0.333333 0.312500 0.333333");
}

#[test]
fn s5_rotate_dual_value_plan_length_and_filenames() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let image = cat_image(dir.path(), Split::Train);
    build(
        dir.path(),
        image,
        cat_bbox(),
        vec![UserToolSpec::Rotate { angle: 30.0, expand: false, fill_color: FillColor::White }],
        2,
    );

    // baseline: identity, label matches the raw bbox normalized by (640,480).
    let baseline = read_label(dir.path(), "cat_original.txt");
    assert_eq!(baseline.trim(), "0 0.312500 0.333333 0.312500 0.333333");

    // variant 1 (auto = -30deg) and variant 2 (user = +30deg) each wrote
    // their own distinctly suffixed pixel + label pair.
    assert!(dir.path().join("images/train/cat_rotate-30.jpg").exists());
    assert!(dir.path().join("labels/train/cat_rotate-30.txt").exists());
    assert!(dir.path().join("images/train/cat_rotate30.jpg").exists());
    assert!(dir.path().join("labels/train/cat_rotate30.txt").exists());
}

#[test]
fn s6_polygon_clipped_by_stretch_to() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = write_source_image(dir.path(), "cat.jpg", 640, 480);
    let image = SourceImage {
        id: "cat".to_string(),
        file_path: path,
        width: 640,
        height: 480,
        split: Split::Train,
        dataset_id: "ds".to_string(),
    };
    let polygon = Polygon {
        points: vec![(600.0, 400.0), (700.0, 400.0), (700.0, 500.0), (600.0, 500.0)],
        class_name: "cat".to_string(),
        class_id: 0,
        confidence: 1.0,
    };
    let src = InMemorySource::new().with_image(image, vec![Annotation::Polygon(polygon)]);
    let sink = FsSink::new(dir.path());
    let request = ReleaseRequest {
        release_name: "scenario-release".to_string(),
        dataset_id: "ds".to_string(),
        release_root: dir.path().to_string_lossy().into_owned(),
        selections: vec![UserToolSpec::Resize {
            width: 320,
            height: 320,
            mode: ResizeMode::StretchTo,
            fill_color: FillColor::Black,
        }],
        variants_per_original: 0,
        task_type: TaskType::Segmentation,
        export_format: ExportFormat::YoloSegmentation,
        options: ReleaseOptions { max_concurrency: 1, ..ReleaseOptions::default() },
    };
    build_release(&request, &src, &sink).unwrap();

    let label = read_label(dir.path(), "cat_original.txt");
    let line = label.trim();
    let mut fields = line.split_whitespace();
    assert_eq!(fields.next().unwrap(), "0");
    let coords: Vec<f64> = fields.map(|v| v.parse().unwrap()).collect();
    // 4 vertices survive the clip (x clamped at the 320 edge); every x
    // normalizes to either 300/320 or 320/320, every y to 266.67/320 or
    // 333.33/320.
    assert_eq!(coords.len(), 8);
    for chunk in coords.chunks(2) {
        let x = chunk[0] * 320.0;
        assert!((x - 300.0).abs() < 1e-2 || (x - 320.0).abs() < 1e-2, "x={x}");
    }
}
