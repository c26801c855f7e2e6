//! Transformation Registry: schema shape, bounds
//! enforcement, and the UI-facing-to-engine-facing conversions that
//! `bridge` is the sole place for.

use release_forge::registry::Registry;
use release_forge::transform::{Category, TypeTag};

#[test]
fn describe_covers_every_type_tag() {
    let schema = Registry::describe();
    for tag in TypeTag::ALL {
        assert!(schema.contains_key(&tag), "{tag:?} missing from registry");
    }
}

#[test]
fn is_geometric_matches_the_type_tag_category() {
    assert!(Registry::is_geometric(TypeTag::Rotate));
    assert!(!Registry::is_geometric(TypeTag::Brightness));
    let schema = Registry::describe();
    assert_eq!(schema[&TypeTag::Rotate].category, Category::Geometric);
    assert_eq!(schema[&TypeTag::Grayscale].category, Category::Photometric);
}

#[test]
fn bridge_rejects_a_value_outside_registered_bounds() {
    // rotate's registered bound is [-45, 45].
    assert!(Registry::bridge(TypeTag::Rotate, "angle", 46.0).is_err());
    assert!(Registry::bridge(TypeTag::Rotate, "angle", -46.0).is_err());
    assert!(Registry::bridge(TypeTag::Rotate, "angle", 30.0).is_ok());
}

#[test]
fn bridge_rejects_an_unknown_parameter_name() {
    assert!(Registry::bridge(TypeTag::Rotate, "not_a_real_param", 0.0).is_err());
}

#[test]
fn bridge_converts_brightness_percentage_to_a_multiplicative_factor() {
    let factor = Registry::bridge(TypeTag::Brightness, "value", 20.0).unwrap();
    assert!((factor - 0.20).abs() < 1e-12);
}

#[test]
fn bridge_normalizes_both_crop_percent_conventions_to_a_unit_scale() {
    let from_fraction = Registry::bridge(TypeTag::Crop, "percent", 0.9).unwrap();
    let from_percentage = Registry::bridge(TypeTag::Crop, "percent", 90.0).unwrap();
    assert!((from_fraction - 0.9).abs() < 1e-12);
    assert!((from_percentage - 0.9).abs() < 1e-12);
}

#[test]
fn bridge_converts_affine_shift_percentages_to_a_unit_scale() {
    let shifted = Registry::bridge(TypeTag::AffineTransform, "shift_x_pct", 10.0).unwrap();
    assert!((shifted - 0.10).abs() < 1e-12);
}

#[test]
fn bridge_is_the_only_place_a_geometric_scale_conversion_lives() {
    // sanity: an unscaled parameter (rotate's angle) passes through
    // unchanged, confirming bridge only rescales the parameters that are
    // actually declared as percentage/fraction dual conventions.
    let angle = Registry::bridge(TypeTag::Rotate, "angle", 12.5).unwrap();
    assert_eq!(angle, 12.5);
}
