//! Per-tool matrix builders for the geometric family, plus the single
//! backward-mapping warp that renders any run of consecutive geometric ops
//! in one resampling pass. The same idea that folds `affine_transform`'s
//! three sub-ops into one matrix extends to the whole geometric chain:
//! composing matrices first and warping once avoids the compounding blur
//! of several separate raster passes.
//!
//! Every builder returns a *forward* matrix — pre-op canvas coordinates to
//! post-op canvas coordinates — because that is exactly what `annotate`'s
//! transport replays. The pixel warp inverts it to sample backward.

use image::{Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{ReleaseError, Result};
use crate::plan::variant_seed;
use crate::transform::geometric::{CropMode, FillColor};
use crate::transform::Transformation;
use crate::types::CanvasDims;

use super::matrix::Matrix3;

fn seeded_rng(image_id: &str, variant_index: u32, salt: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(variant_seed(image_id, variant_index) ^ salt)
}

/// What a geometric op did at render time: the forward matrix it
/// contributed, the canvas dims after it, and a fill color to use if the
/// warp that eventually consumes it samples outside the source image.
pub struct OpEffect {
    pub matrix: Matrix3,
    pub dims: CanvasDims,
    pub fill: Option<Rgb<u8>>,
}

/// Builds the forward matrix (and any canvas/fill effect) for one
/// non-resize geometric op, relative to `canvas` — its dimensions *before*
/// this op runs.
pub fn build(op: &Transformation, canvas: CanvasDims, image_id: &str, variant_index: u32) -> Result<OpEffect> {
    let (w, h) = canvas.as_f64();
    let (cx, cy) = (w / 2.0, h / 2.0);

    match op {
        Transformation::Rotate(p) => {
            let rotate = Matrix3::around_center(Matrix3::rotate_degrees(p.angle), cx, cy);
            if p.expand {
                let rad = p.angle.to_radians();
                let (s, c) = rad.sin_cos();
                let new_w = crate::numeric::round_half_even(w * c.abs() + h * s.abs()).max(1.0);
                let new_h = crate::numeric::round_half_even(w * s.abs() + h * c.abs()).max(1.0);
                let recenter = Matrix3::translate((new_w - w) / 2.0, (new_h - h) / 2.0);
                Ok(OpEffect {
                    matrix: rotate.then(&recenter),
                    dims: CanvasDims::new(new_w as u32, new_h as u32),
                    fill: Some(p.fill_color.rgb()),
                })
            } else {
                Ok(OpEffect { matrix: rotate, dims: canvas, fill: Some(p.fill_color.rgb()) })
            }
        }
        Transformation::Flip(p) => {
            let sx = if p.horizontal { -1.0 } else { 1.0 };
            let sy = if p.vertical { -1.0 } else { 1.0 };
            let m = Matrix3::around_center(Matrix3::scale(sx, sy), cx, cy);
            Ok(OpEffect { matrix: m, dims: canvas, fill: None })
        }
        Transformation::Crop(p) => {
            let cw = crate::numeric::round_half_even(w * p.percent).max(1.0);
            let ch = crate::numeric::round_half_even(h * p.percent).max(1.0);
            let (x0, y0) = match p.mode {
                CropMode::Center => ((w - cw) / 2.0, (h - ch) / 2.0),
                CropMode::TopLeft => (0.0, 0.0),
                CropMode::TopRight => (w - cw, 0.0),
                CropMode::BottomLeft => (0.0, h - ch),
                CropMode::BottomRight => (w - cw, h - ch),
                CropMode::Random => {
                    let mut rng = seeded_rng(image_id, variant_index, 0x6372_6f70); // "crop"
                    let max_x = (w - cw).max(0.0);
                    let max_y = (h - ch).max(0.0);
                    (rng.gen_range(0.0..=max_x.max(0.0) + 1e-9).min(max_x), rng.gen_range(0.0..=max_y.max(0.0) + 1e-9).min(max_y))
                }
            };
            let m = Matrix3::translate(-x0, -y0).then(&Matrix3::scale(w / cw, h / ch));
            Ok(OpEffect { matrix: m, dims: canvas, fill: None })
        }
        Transformation::RandomZoom(p) => {
            // "random_zoom" samples the actual factor uniformly between 1.0
            // and the user's configured `zoom_factor`, seeded per variant
            // so reruns are byte-identical, rather than always applying
            // the configured value verbatim — matching the tool's name.
            let mut rng = seeded_rng(image_id, variant_index, 0x7a6f_6f6d); // "zoom"
            let (lo, hi) = if p.zoom_factor >= 1.0 { (1.0, p.zoom_factor) } else { (p.zoom_factor, 1.0) };
            let actual = if (hi - lo).abs() < 1e-12 { lo } else { rng.gen_range(lo..=hi) };
            let m = Matrix3::around_center(Matrix3::scale(actual, actual), cx, cy);
            Ok(OpEffect { matrix: m, dims: canvas, fill: Some(FillColor::Black.rgb()) })
        }
        Transformation::AffineTransform(p) => {
            let sr = Matrix3::scale(p.scale, p.scale).then(&Matrix3::rotate_degrees(p.angle));
            let centered = Matrix3::around_center(sr, cx, cy);
            let shifted = centered.then(&Matrix3::translate(p.shift_x_pct * w, p.shift_y_pct * h));
            Ok(OpEffect { matrix: shifted, dims: canvas, fill: Some(FillColor::Black.rgb()) })
        }
        Transformation::PerspectiveWarp(p) => {
            let mut rng = seeded_rng(image_id, variant_index, 0x7065_7273); // "pers"
            let max_shift = p.distortion_strength * w.min(h);
            let src = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
            let mut dst = [(0.0, 0.0); 4];
            for i in 0..4 {
                let dx: f64 = rng.gen_range(-max_shift..=max_shift);
                let dy: f64 = rng.gen_range(-max_shift..=max_shift);
                dst[i] = (src[i].0 + dx, src[i].1 + dy);
            }
            let m = Matrix3::from_point_correspondences(src, dst)?;
            Ok(OpEffect { matrix: m, dims: canvas, fill: Some(FillColor::Black.rgb()) })
        }
        Transformation::Shear(p) => {
            let m = Matrix3::around_center(Matrix3::shear_x_degrees(p.shear_angle), cx, cy);
            Ok(OpEffect { matrix: m, dims: canvas, fill: Some(FillColor::Black.rgb()) })
        }
        other => Err(ReleaseError::ConfigInvalid(format!(
            "{:?} is not a geometric op and cannot be matrix-built",
            other.type_tag()
        ))),
    }
}

/// Renders one composed forward matrix in a single backward-mapping pass:
/// for every destination pixel, the inverse matrix locates the source
/// sample; bilinear interpolation is used when the sample falls inside the
/// source bounds, otherwise `fill` is used. This is what lets a run of
/// several geometric ops (e.g. `shear` then `rotate`) cost one resampling
/// pass instead of one per op.
pub fn warp(src: &RgbImage, forward: &Matrix3, dest_dims: CanvasDims, fill: Rgb<u8>) -> Result<RgbImage> {
    let inverse = forward.invert()?;
    let (sw, sh) = src.dimensions();
    let (sw_f, sh_f) = (sw as f64, sh as f64);
    let mut out = RgbImage::from_pixel(dest_dims.width, dest_dims.height, fill);

    for dy in 0..dest_dims.height {
        for dx in 0..dest_dims.width {
            let (sx, sy) = inverse.apply_point(dx as f64 + 0.5, dy as f64 + 0.5)?;
            if sx < 0.0 || sy < 0.0 || sx > sw_f || sy > sh_f {
                continue; // leave the fill-colored pixel in place
            }
            out.put_pixel(dx, dy, bilinear_sample(src, sx - 0.5, sy - 0.5));
        }
    }
    Ok(out)
}

fn bilinear_sample(img: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (w, h) = img.dimensions();
    let x0 = x.floor().max(0.0) as i64;
    let y0 = y.floor().max(0.0) as i64;
    let x1 = (x0 + 1).min(w as i64 - 1);
    let y1 = (y0 + 1).min(h as i64 - 1);
    let x0 = x0.clamp(0, w as i64 - 1);
    let y0 = y0.clamp(0, h as i64 - 1);
    let fx = (x - x0 as f64).clamp(0.0, 1.0);
    let fy = (y - y0 as f64).clamp(0.0, 1.0);

    let p00 = img.get_pixel(x0 as u32, y0 as u32).0;
    let p10 = img.get_pixel(x1 as u32, y0 as u32).0;
    let p01 = img.get_pixel(x0 as u32, y1 as u32).0;
    let p11 = img.get_pixel(x1 as u32, y1 as u32).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::geometric::FlipParams;

    #[test]
    fn flip_horizontal_mirrors_pixels() {
        let mut img = RgbImage::new(4, 2);
        for y in 0..2 {
            for x in 0..4 {
                img.put_pixel(x, y, Rgb([x as u8 * 10, 0, 0]));
            }
        }
        let op = Transformation::Flip(FlipParams { horizontal: true, vertical: false });
        let effect = build(&op, CanvasDims::new(4, 2), "img", 1).unwrap();
        let out = warp(&img, &effect.matrix, effect.dims, Rgb([0, 0, 0])).unwrap();
        assert_eq!(out.get_pixel(0, 0).0[0], 30);
        assert_eq!(out.get_pixel(3, 0).0[0], 0);
    }
}
