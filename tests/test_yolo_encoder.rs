//! YOLO Encoder: detection/segmentation line
//! formatting, class-id resolution, and the bounds check on escaped values.

use release_forge::config::ExportFormat;
use release_forge::encode::classmap::ClassMap;
use release_forge::encode::encode_line;
use release_forge::encode::yaml::DataYaml;
use release_forge::types::{Annotation, BoundingBox, CanvasDims, Polygon};

fn classes() -> ClassMap {
    ClassMap::build(vec!["dog".to_string(), "cat".to_string(), "bird".to_string()])
}

#[test]
fn detection_line_has_six_decimal_fields() {
    let ann = Annotation::Bbox(BoundingBox {
        x_min: 100.0,
        y_min: 80.0,
        x_max: 300.0,
        y_max: 240.0,
        class_name: "cat".to_string(),
        class_id: 0,
        confidence: 1.0,
    });
    let line = encode_line(&ann, CanvasDims::new(640, 480), &classes(), ExportFormat::YoloDetection).unwrap().unwrap();
    let fields: Vec<&str> = line.split(' ').collect();
    assert_eq!(fields.len(), 5);
    assert_eq!(fields[0], "1"); // "cat" is class id 1 alphabetically (bird, cat, dog).
    for field in &fields[1..] {
        assert_eq!(field.split('.').nth(1).map(str::len), Some(6));
    }
}

#[test]
fn segmentation_line_concatenates_every_vertex() {
    let poly = Annotation::Polygon(Polygon {
        points: vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
        class_name: "dog".to_string(),
        class_id: 0,
        confidence: 1.0,
    });
    let line = encode_line(&poly, CanvasDims::new(200, 200), &classes(), ExportFormat::YoloSegmentation).unwrap().unwrap();
    let fields: Vec<&str> = line.split(' ').collect();
    // class_id + 4 vertices * 2 coords.
    assert_eq!(fields.len(), 9);
    assert_eq!(fields[0], "2"); // "dog" is class id 2.
}

#[test]
fn degenerate_bbox_is_dropped_without_erroring() {
    let ann = Annotation::Bbox(BoundingBox {
        x_min: 100.0,
        y_min: 80.0,
        x_max: 100.0, // zero width
        y_max: 240.0,
        class_name: "cat".to_string(),
        class_id: 0,
        confidence: 1.0,
    });
    assert!(encode_line(&ann, CanvasDims::new(640, 480), &classes(), ExportFormat::YoloDetection).unwrap().is_none());
}

#[test]
fn polygon_with_fewer_than_three_points_is_dropped() {
    let poly = Annotation::Polygon(Polygon {
        points: vec![(0.0, 0.0), (10.0, 10.0)],
        class_name: "cat".to_string(),
        class_id: 0,
        confidence: 1.0,
    });
    assert!(encode_line(&poly, CanvasDims::new(200, 200), &classes(), ExportFormat::YoloSegmentation).unwrap().is_none());
}

#[test]
fn value_escaping_unit_range_is_an_encode_bounds_error() {
    let ann = Annotation::Bbox(BoundingBox {
        x_min: -500.0,
        y_min: 80.0,
        x_max: 300.0,
        y_max: 240.0,
        class_name: "cat".to_string(),
        class_id: 0,
        confidence: 1.0,
    });
    let err = encode_line(&ann, CanvasDims::new(640, 480), &classes(), ExportFormat::YoloDetection).unwrap_err();
    assert!(matches!(err, release_forge::error::ReleaseError::EncodeBounds(_)));
}

#[test]
fn unknown_class_name_falls_back_to_class_zero() {
    let ann = Annotation::Bbox(BoundingBox {
        x_min: 0.0,
        y_min: 0.0,
        x_max: 10.0,
        y_max: 10.0,
        class_name: "giraffe".to_string(),
        class_id: 0,
        confidence: 1.0,
    });
    let line = encode_line(&ann, CanvasDims::new(100, 100), &classes(), ExportFormat::YoloDetection).unwrap().unwrap();
    assert!(line.starts_with("0 "));
}

#[test]
fn data_yaml_lists_classes_in_frozen_alphabetical_order() {
    let yaml = DataYaml::new(".", &classes(), 1, 1, 1).to_yaml_string().unwrap();
    assert!(yaml.contains("nc: 3"));
    let bird_pos = yaml.find("bird").unwrap();
    let cat_pos = yaml.find("cat").unwrap();
    let dog_pos = yaml.find("dog").unwrap();
    assert!(bird_pos < cat_pos && cat_pos < dog_pos);
}
