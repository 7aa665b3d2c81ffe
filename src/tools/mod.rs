//! I/O glue shared by the CLI, benches and integration tests.

use crate::config::max_dim_from_env;
use crate::error::Result;
use crate::models::{GrayscaleImage, Region};
use crate::utils::grayscale::rgb_to_grayscale;
use image::GenericImageView;
use serde::Serialize;
use std::path::Path;

/// Load an image file as 8-bit luminance.
///
/// Honours `MSER_MAX_DIM` by downscaling so the larger side fits.
pub fn load_grayscale<P: AsRef<Path>>(path: P) -> Result<GrayscaleImage> {
    load_grayscale_capped(path, max_dim_from_env())
}

/// Load an image file as 8-bit luminance, shrinking it (aspect preserved)
/// when its larger side exceeds `max_dim`.
pub fn load_grayscale_capped<P: AsRef<Path>>(
    path: P,
    max_dim: Option<u32>,
) -> Result<GrayscaleImage> {
    let img = image::open(path)?;
    let img = match max_dim {
        Some(max_dim) => {
            let (w, h) = img.dimensions();
            if w.max(h) > max_dim {
                img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            } else {
                img
            }
        }
        None => img,
    };
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let gray = rgb_to_grayscale(rgb.as_raw(), width, height);
    GrayscaleImage::from_raw(height, width, gray)
}

/// Write a grayscale image as PNG
pub fn save_grayscale<P: AsRef<Path>>(image: &GrayscaleImage, path: P) -> Result<()> {
    image
        .to_gray_image()
        .save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
    /// Number of distinct grey levels present.
    pub distinct_levels: usize,
}

/// Compute min/max/avg and level count for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    let mut histogram = [0usize; 256];
    let mut sum: u64 = 0;
    for &v in gray {
        histogram[v as usize] += 1;
        sum += v as u64;
    }
    let min = histogram.iter().position(|&c| c > 0).unwrap_or(0) as u8;
    let max = histogram.iter().rposition(|&c| c > 0).unwrap_or(0) as u8;
    let avg = if gray.is_empty() {
        0
    } else {
        (sum / gray.len() as u64) as u8
    };
    GrayStats {
        min,
        max,
        avg,
        distinct_levels: histogram.iter().filter(|&&c| c > 0).count(),
    }
}

/// Compact per-region description for printing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionSummary {
    /// Level the region was opened at
    pub level: u16,
    /// Pixel count
    pub area: usize,
    /// Height of the pixel extent
    pub rows: usize,
    /// Width of the pixel extent
    pub cols: usize,
    /// Centre of mass as (row, col)
    pub centroid: Option<(f64, f64)>,
}

/// Summarise every non-sentinel region
pub fn region_summary(regions: &[Region]) -> Vec<RegionSummary> {
    use crate::utils::regions::{RegionMoments, region_extent};

    regions
        .iter()
        .filter(|r| !r.is_sentinel())
        .map(|r| {
            let (rows, cols) = region_extent(&r.pixels);
            RegionSummary {
                level: r.level,
                area: r.area,
                rows: rows + 1,
                cols: cols + 1,
                centroid: RegionMoments::compute(r).centroid(),
            }
        })
        .collect()
}
