//! Plan Generator: plan length, baseline behavior,
//! resize-last ordering, dual-value mirroring, and determinism.

use release_forge::plan::{variant_seed, Generator, UserToolSpec};
use release_forge::transform::geometric::{FillColor, ResizeMode};
use release_forge::transform::{Transformation, TypeTag};

#[test]
fn plan_length_is_always_one_plus_variants_per_original() {
    let selections = vec![UserToolSpec::Brightness { value: 20.0 }];
    for variants in [0, 1, 2, 5] {
        let plan = Generator::generate(&selections, variants, "img").unwrap();
        assert_eq!(plan.len(), 1 + variants as usize);
    }
}

#[test]
fn baseline_is_identity_when_no_resize_selected() {
    let selections = vec![UserToolSpec::Brightness { value: 20.0 }];
    let plan = Generator::generate(&selections, 2, "img").unwrap();
    assert!(plan.configs[0].is_empty());
}

#[test]
fn baseline_is_resize_only_when_resize_selected() {
    let selections = vec![
        UserToolSpec::Brightness { value: 20.0 },
        UserToolSpec::Resize { width: 320, height: 320, mode: ResizeMode::StretchTo, fill_color: FillColor::Black },
    ];
    let plan = Generator::generate(&selections, 1, "img").unwrap();
    assert_eq!(plan.configs[0].len(), 1);
    assert!(plan.configs[0].get(TypeTag::Resize).is_some());
    assert!(plan.configs[0].get(TypeTag::Brightness).is_none());
}

#[test]
fn resize_is_always_the_last_op_regardless_of_declared_order() {
    let selections = vec![
        UserToolSpec::Resize { width: 320, height: 320, mode: ResizeMode::StretchTo, fill_color: FillColor::Black },
        UserToolSpec::Flip { horizontal: true, vertical: false },
        UserToolSpec::Brightness { value: 10.0 },
    ];
    let plan = Generator::generate(&selections, 1, "img").unwrap();
    let ops: Vec<TypeTag> = plan.configs[1].iter().map(|op| op.type_tag()).collect();
    assert_eq!(ops.last(), Some(&TypeTag::Resize));
    // non-resize order preserved as declared (flip before brightness).
    assert_eq!(ops[0], TypeTag::Flip);
    assert_eq!(ops[1], TypeTag::Brightness);
}

#[test]
fn dual_value_tool_alternates_auto_then_user_starting_at_variant_one() {
    let selections = vec![UserToolSpec::Rotate { angle: 30.0, expand: false, fill_color: FillColor::Black }];
    let plan = Generator::generate(&selections, 4, "img").unwrap();

    let angle_of = |i: usize| match plan.configs[i].get(TypeTag::Rotate) {
        Some(Transformation::Rotate(p)) => p.angle,
        _ => panic!("expected rotate op in variant {i}"),
    };
    assert_eq!(angle_of(1), -30.0); // variant 1: auto
    assert_eq!(angle_of(2), 30.0); // variant 2: user
    assert_eq!(angle_of(3), -30.0); // variant 3: auto again
    assert_eq!(angle_of(4), 30.0); // variant 4: user again
}

#[test]
fn non_dual_value_tool_uses_its_configured_value_every_variant() {
    let selections = vec![UserToolSpec::Blur { radius: 2.0 }];
    let plan = Generator::generate(&selections, 3, "img").unwrap();
    for i in 1..=3 {
        match plan.configs[i].get(TypeTag::Blur) {
            Some(Transformation::Blur(p)) => assert_eq!(p.radius, 2.0),
            _ => panic!("expected blur op in variant {i}"),
        }
    }
}

#[test]
fn generation_is_deterministic_for_identical_inputs() {
    let selections = vec![
        UserToolSpec::Rotate { angle: 15.0, expand: false, fill_color: FillColor::White },
        UserToolSpec::RandomZoom { zoom_factor: 1.3 },
    ];
    let a = Generator::generate(&selections, 3, "img-42").unwrap();
    let b = Generator::generate(&selections, 3, "img-42").unwrap();
    for i in 0..a.len() {
        assert_eq!(a.configs[i], b.configs[i]);
    }
}

#[test]
fn variant_seed_is_stable_and_distinguishes_variants_and_images() {
    assert_eq!(variant_seed("img-1", 0), variant_seed("img-1", 0));
    assert_ne!(variant_seed("img-1", 0), variant_seed("img-1", 1));
    assert_ne!(variant_seed("img-1", 0), variant_seed("img-2", 0));
}

#[test]
fn out_of_bounds_parameter_is_rejected_before_any_plan_is_built() {
    let selections = vec![UserToolSpec::Rotate { angle: 999.0, expand: false, fill_color: FillColor::Black }];
    assert!(Generator::generate(&selections, 1, "img").is_err());
}
