//! `resize_mode` dispatch. `fit_within`'s final canvas
//! is the rendered `(round(w*s), round(h*s))`, not the nominal `(W,H)` —
//! the single most load-bearing decision in the core.

use image::{imageops, RgbImage};

use crate::numeric::round_half_even;
use crate::transform::geometric::{FillColor, ResizeMode, ResizeParams};
use crate::types::CanvasDims;

/// What actually happened when `engine::render` rendered a `resize` op —
/// enough detail for `annotate` to reproduce the exact same scale/offset
/// when it transports annotation coordinates through the same op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeOutcome {
    pub final_dims: CanvasDims,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Offset applied to transported coordinates *after* scaling: a
    /// positive value is a pad (letterbox), a negative value is a crop
    /// (fill_center_crop). Zero for `stretch_to` and `fit_within`.
    pub offset_x: f64,
    pub offset_y: f64,
    pub filter: &'static str,
}

fn pick_filter(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (imageops::FilterType, &'static str) {
    if (dst_w as u64) * (dst_h as u64) < (src_w as u64) * (src_h as u64) {
        (imageops::FilterType::Lanczos3, "lanczos3")
    } else {
        (imageops::FilterType::CatmullRom, "catmull_rom")
    }
}

fn reflect_index(i: i64, n: i64) -> i64 {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut m = i % period;
    if m < 0 {
        m += period;
    }
    if m >= n {
        m = period - m;
    }
    m
}

fn paste_reflected(canvas: &mut RgbImage, fitted: &RgbImage, pad_x: i64, pad_y: i64) {
    let (cw, ch) = canvas.dimensions();
    let (fw, fh) = fitted.dimensions();
    for y in 0..ch as i64 {
        let sy = reflect_index(y - pad_y, fh as i64);
        for x in 0..cw as i64 {
            let sx = reflect_index(x - pad_x, fw as i64);
            let px = *fitted.get_pixel(sx as u32, sy as u32);
            canvas.put_pixel(x as u32, y as u32, px);
        }
    }
}

pub fn apply(src: &RgbImage, params: &ResizeParams) -> (RgbImage, ResizeOutcome) {
    let (w0, h0) = src.dimensions();
    let (w0f, h0f) = (w0 as f64, h0 as f64);
    let (tw, th) = (params.width, params.height);

    match params.mode {
        ResizeMode::StretchTo => {
            let (filter, name) = pick_filter(w0, h0, tw, th);
            let out = imageops::resize(src, tw, th, filter);
            (
                out,
                ResizeOutcome {
                    final_dims: CanvasDims::new(tw, th),
                    scale_x: tw as f64 / w0f,
                    scale_y: th as f64 / h0f,
                    offset_x: 0.0,
                    offset_y: 0.0,
                    filter: name,
                },
            )
        }
        ResizeMode::FillCenterCrop => {
            let s = (tw as f64 / w0f).max(th as f64 / h0f);
            let scaled_w = (w0f * s).round().max(1.0) as u32;
            let scaled_h = (h0f * s).round().max(1.0) as u32;
            let (filter, name) = pick_filter(w0, h0, scaled_w, scaled_h);
            let scaled = imageops::resize(src, scaled_w, scaled_h, filter);
            let off_x = round_half_even((scaled_w as f64 - tw as f64) / 2.0).max(0.0);
            let off_y = round_half_even((scaled_h as f64 - th as f64) / 2.0).max(0.0);
            let crop_w = tw.min(scaled_w.saturating_sub(off_x as u32));
            let crop_h = th.min(scaled_h.saturating_sub(off_y as u32));
            let cropped = imageops::crop_imm(&scaled, off_x as u32, off_y as u32, crop_w, crop_h).to_image();
            (
                cropped,
                ResizeOutcome {
                    final_dims: CanvasDims::new(tw, th),
                    scale_x: s,
                    scale_y: s,
                    offset_x: -off_x,
                    offset_y: -off_y,
                    filter: name,
                },
            )
        }
        ResizeMode::FitWithin => {
            let s = (tw as f64 / w0f).min(th as f64 / h0f);
            let new_w = (round_half_even(w0f * s) as i64).max(1) as u32;
            let new_h = (round_half_even(h0f * s) as i64).max(1) as u32;
            let (filter, name) = pick_filter(w0, h0, new_w, new_h);
            let out = imageops::resize(src, new_w, new_h, filter);
            (
                out,
                ResizeOutcome {
                    final_dims: CanvasDims::new(new_w, new_h),
                    scale_x: s,
                    scale_y: s,
                    offset_x: 0.0,
                    offset_y: 0.0,
                    filter: name,
                },
            )
        }
        ResizeMode::FitReflectEdges | ResizeMode::FitBlackEdges | ResizeMode::FitWhiteEdges => {
            let s = (tw as f64 / w0f).min(th as f64 / h0f);
            let new_w = (round_half_even(w0f * s) as i64).max(1) as u32;
            let new_h = (round_half_even(h0f * s) as i64).max(1) as u32;
            let (filter, name) = pick_filter(w0, h0, new_w, new_h);
            let fitted = imageops::resize(src, new_w, new_h, filter);

            let pad_x = round_half_even((tw as f64 - new_w as f64) / 2.0);
            let pad_y = round_half_even((th as f64 - new_h as f64) / 2.0);

            let mut canvas = match params.mode {
                ResizeMode::FitWhiteEdges => RgbImage::from_pixel(tw, th, FillColor::White.rgb()),
                _ => RgbImage::from_pixel(tw, th, FillColor::Black.rgb()),
            };
            if matches!(params.mode, ResizeMode::FitReflectEdges) {
                paste_reflected(&mut canvas, &fitted, pad_x as i64, pad_y as i64);
            } else {
                imageops::overlay(&mut canvas, &fitted, pad_x as i64, pad_y as i64);
            }

            (
                canvas,
                ResizeOutcome {
                    final_dims: CanvasDims::new(tw, th),
                    scale_x: s,
                    scale_y: s,
                    offset_x: pad_x,
                    offset_y: pad_y,
                    filter: name,
                },
            )
        }
    }
}
