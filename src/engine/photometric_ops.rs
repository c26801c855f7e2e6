//! Per-tool pixel ops for the photometric family. None of these touch
//! canvas dimensions, so `engine::render` applies them
//! directly to the working buffer without ever flushing a pending matrix
//! warp for their sake — only a geometric op forces a flush.

use image::{imageops, Rgb, RgbImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::plan::variant_seed;
use crate::transform::Transformation;

fn seeded_rng(image_id: &str, variant_index: u32, salt: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(variant_seed(image_id, variant_index) ^ salt)
}

fn clamp_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn rgb_to_hsv(p: Rgb<u8>) -> (f64, f64, f64) {
    let (r, g, b) = (p.0[0] as f64 / 255.0, p.0[1] as f64 / 255.0, p.0[2] as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let h = if delta < 1e-9 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max < 1e-9 { 0.0 } else { delta / max };
    (h, s, max)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb<u8> {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;
    let (r1, g1, b1) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    Rgb([clamp_u8((r1 + m) * 255.0), clamp_u8((g1 + m) * 255.0), clamp_u8((b1 + m) * 255.0)])
}

fn for_each_pixel(img: &mut RgbImage, mut f: impl FnMut(Rgb<u8>) -> Rgb<u8>) {
    for p in img.pixels_mut() {
        *p = f(*p);
    }
}

fn histogram_equalize_channel(counts: &[u32; 256], total: u32) -> [u8; 256] {
    let mut cdf = [0u32; 256];
    let mut running = 0u32;
    for i in 0..256 {
        running += counts[i];
        cdf[i] = running;
    }
    let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
    let mut lut = [0u8; 256];
    if total <= cdf_min {
        for i in 0..256 {
            lut[i] = i as u8;
        }
        return lut;
    }
    for i in 0..256 {
        let numer = (cdf[i].saturating_sub(cdf_min)) as f64 * 255.0;
        let denom = (total - cdf_min) as f64;
        lut[i] = (numer / denom).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Applies one photometric op to `img` in place.
pub fn apply(img: &mut RgbImage, op: &Transformation, image_id: &str, variant_index: u32) -> Result<()> {
    match op {
        Transformation::Brightness(p) => {
            let factor = 1.0 + p.factor;
            for_each_pixel(img, |px| {
                Rgb([
                    clamp_u8(px.0[0] as f64 * factor),
                    clamp_u8(px.0[1] as f64 * factor),
                    clamp_u8(px.0[2] as f64 * factor),
                ])
            });
        }
        Transformation::Contrast(p) => {
            let factor = 1.0 + p.factor;
            for_each_pixel(img, |px| {
                Rgb([
                    clamp_u8((px.0[0] as f64 - 128.0) * factor + 128.0),
                    clamp_u8((px.0[1] as f64 - 128.0) * factor + 128.0),
                    clamp_u8((px.0[2] as f64 - 128.0) * factor + 128.0),
                ])
            });
        }
        Transformation::Blur(p) => {
            if p.radius > 0.0 {
                *img = imageops::blur(img, p.radius as f32);
            }
        }
        Transformation::Noise(p) => {
            // Additive Gaussian noise seeded per (image, variant) so reruns
            // are byte-identical.
            let mut rng = seeded_rng(image_id, variant_index, 0x6e6f_6973); // "nois"
            for_each_pixel(img, |px| {
                let mut channel = |v: u8| {
                    let n: f64 = rng.gen_range(-1.0..=1.0) * p.amount;
                    clamp_u8(v as f64 + n)
                };
                Rgb([channel(px.0[0]), channel(px.0[1]), channel(px.0[2])])
            });
        }
        Transformation::Hue(p) => {
            for_each_pixel(img, |px| {
                let (h, s, v) = rgb_to_hsv(px);
                hsv_to_rgb(h + p.shift_degrees, s, v)
            });
        }
        Transformation::Saturation(p) => {
            for_each_pixel(img, |px| {
                let (h, s, v) = rgb_to_hsv(px);
                hsv_to_rgb(h, (s * p.factor).clamp(0.0, 1.0), v)
            });
        }
        Transformation::Gamma(p) => {
            let inv_gamma = 1.0 / p.gamma.max(1e-6);
            let lut: Vec<u8> = (0..256)
                .map(|v| clamp_u8(255.0 * (v as f64 / 255.0).powf(inv_gamma)))
                .collect();
            for_each_pixel(img, |px| Rgb([lut[px.0[0] as usize], lut[px.0[1] as usize], lut[px.0[2] as usize]]));
        }
        Transformation::Clahe(p) => apply_clahe(img, p.clip_limit, p.tile_grid_size),
        Transformation::Cutout(p) => apply_cutout(img, p.num_holes, p.hole_size_pct, image_id, variant_index),
        Transformation::ColorJitter(p) => {
            let mut rng = seeded_rng(image_id, variant_index, 0x6a69_7474); // "jitt"
            let b: f64 = rng.gen_range(-p.brightness..=p.brightness) / 100.0;
            let c: f64 = rng.gen_range(-p.contrast..=p.contrast) / 100.0;
            let s: f64 = 1.0 + rng.gen_range(-p.saturation..=p.saturation) / 100.0;
            let h: f64 = rng.gen_range(-p.hue..=p.hue);
            for_each_pixel(img, |px| {
                let bright = Rgb([
                    clamp_u8(px.0[0] as f64 * (1.0 + b)),
                    clamp_u8(px.0[1] as f64 * (1.0 + b)),
                    clamp_u8(px.0[2] as f64 * (1.0 + b)),
                ]);
                let cont = Rgb([
                    clamp_u8((bright.0[0] as f64 - 128.0) * (1.0 + c) + 128.0),
                    clamp_u8((bright.0[1] as f64 - 128.0) * (1.0 + c) + 128.0),
                    clamp_u8((bright.0[2] as f64 - 128.0) * (1.0 + c) + 128.0),
                ]);
                let (hh, ss, vv) = rgb_to_hsv(cont);
                hsv_to_rgb(hh + h, (ss * s).clamp(0.0, 1.0), vv)
            });
        }
        Transformation::Grayscale(_) => {
            for_each_pixel(img, |px| {
                let y = 0.299 * px.0[0] as f64 + 0.587 * px.0[1] as f64 + 0.114 * px.0[2] as f64;
                let y = clamp_u8(y);
                Rgb([y, y, y])
            });
        }
        Transformation::Equalize(_) => apply_equalize(img),
        other => {
            return Err(crate::error::ReleaseError::ConfigInvalid(format!(
                "{:?} is not a photometric op",
                other.type_tag()
            )))
        }
    }
    Ok(())
}

/// Approximate CLAHE: per-tile histogram equalization of the HSV value
/// channel with clip-limit redistribution, tile boundaries left unblended.
/// A full bilinear-interpolated CLAHE is more work than this crate's
/// `tile_grid_size` knob is worth; documented as an approximation.
fn apply_clahe(img: &mut RgbImage, clip_limit: f64, tile_grid_size: u32) {
    let (w, h) = img.dimensions();
    let tiles = tile_grid_size.max(1);
    let tile_w = (w / tiles).max(1);
    let tile_h = (h / tiles).max(1);

    for ty in (0..h).step_by(tile_h as usize) {
        for tx in (0..w).step_by(tile_w as usize) {
            let x_end = (tx + tile_w).min(w);
            let y_end = (ty + tile_h).min(h);
            let mut counts = [0u32; 256];
            let mut total = 0u32;
            for y in ty..y_end {
                for x in tx..x_end {
                    let (_, _, v) = rgb_to_hsv(*img.get_pixel(x, y));
                    counts[clamp_u8(v * 255.0) as usize] += 1;
                    total += 1;
                }
            }
            if total == 0 {
                continue;
            }
            let avg = total as f64 / 256.0;
            let limit = (clip_limit.max(1.0) * avg).round() as u32;
            let mut excess = 0u32;
            for c in counts.iter_mut() {
                if *c > limit {
                    excess += *c - limit;
                    *c = limit;
                }
            }
            let redistribute = excess / 256;
            for c in counts.iter_mut() {
                *c += redistribute;
            }
            let lut = histogram_equalize_channel(&counts, total);

            for y in ty..y_end {
                for x in tx..x_end {
                    let px = *img.get_pixel(x, y);
                    let (hh, ss, vv) = rgb_to_hsv(px);
                    let new_v = lut[clamp_u8(vv * 255.0) as usize] as f64 / 255.0;
                    img.put_pixel(x, y, hsv_to_rgb(hh, ss, new_v));
                }
            }
        }
    }
}

fn apply_equalize(img: &mut RgbImage) {
    let (w, h) = img.dimensions();
    let total = (w * h).max(1);
    let mut counts = [0u32; 256];
    for px in img.pixels() {
        let (_, _, v) = rgb_to_hsv(*px);
        counts[clamp_u8(v * 255.0) as usize] += 1;
    }
    let lut = histogram_equalize_channel(&counts, total);
    for_each_pixel(img, |px| {
        let (h, s, v) = rgb_to_hsv(px);
        hsv_to_rgb(h, s, lut[clamp_u8(v * 255.0) as usize] as f64 / 255.0)
    });
}

fn apply_cutout(img: &mut RgbImage, num_holes: u32, hole_size_pct: f64, image_id: &str, variant_index: u32) {
    let (w, h) = img.dimensions();
    let side = (w.min(h) as f64 * hole_size_pct).round().max(1.0) as u32;
    let mut rng = seeded_rng(image_id, variant_index, 0x6375_746f); // "cuto"
    for _ in 0..num_holes {
        let x0 = rng.gen_range(0..=w.saturating_sub(1).max(0));
        let y0 = rng.gen_range(0..=h.saturating_sub(1).max(0));
        let x_end = (x0 + side).min(w);
        let y_end = (y0 + side).min(h);
        for y in y0..y_end {
            for x in x0..x_end {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }
}
