//! Convert interleaved RGB/RGBA samples to 8-bit luminance
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8

use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline(always)]
fn luma(px: &[u8]) -> u8 {
    let lum = (COEF_R * px[0] as u32 + COEF_G * px[1] as u32 + COEF_B * px[2] as u32) >> 8;
    lum.min(255) as u8
}

/// Convert pixels with `channels` interleaved samples into `output`
///
/// Returns the number of pixels written (width * height)
pub fn to_grayscale_into(
    src: &[u8],
    channels: usize,
    width: usize,
    height: usize,
    output: &mut [u8],
) -> usize {
    assert!(channels >= 3, "need at least three colour channels");
    let pixel_count = width * height;
    assert!(output.len() >= pixel_count, "Output buffer too small");
    assert!(src.len() >= pixel_count * channels, "Input buffer too small");

    for (out, px) in output[..pixel_count]
        .iter_mut()
        .zip(src.chunks_exact(channels))
    {
        *out = luma(px);
    }
    pixel_count
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    to_grayscale_into(rgb, 3, width, height, &mut gray);
    gray
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    to_grayscale_into(rgba, 4, width, height, &mut gray);
    gray
}

// ============== Parallel Processing with Rayon ==============

fn to_grayscale_parallel(src: &[u8], channels: usize, width: usize, height: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    // Process rows in parallel
    gray.par_chunks_mut(width)
        .zip(src.par_chunks(width * channels))
        .for_each(|(row, src_row)| {
            for (out, px) in row.iter_mut().zip(src_row.chunks_exact(channels)) {
                *out = luma(px);
            }
        });

    gray
}

/// Convert RGB to grayscale using parallel processing
/// Processes rows in parallel for multi-core speedup
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgb, 3, width, height)
}

/// Convert RGBA to grayscale using parallel processing
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgba, 4, width, height)
}
