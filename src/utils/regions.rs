//! Post-processing of detected regions: size/shape filtering, label images
//! and raw image moments.

use crate::models::{GrayscaleImage, Pixel, Region};
use serde::{Deserialize, Serialize};

/// Row and column span (max - min) covered by `pixels`; (0, 0) when empty
pub fn region_extent(pixels: &[Pixel]) -> (usize, usize) {
    let Some(first) = pixels.first() else {
        return (0, 0);
    };
    let (mut min_r, mut max_r) = (first.row, first.row);
    let (mut min_c, mut max_c) = (first.col, first.col);
    for p in &pixels[1..] {
        min_r = min_r.min(p.row);
        max_r = max_r.max(p.row);
        min_c = min_c.min(p.col);
        max_c = max_c.max(p.col);
    }
    (max_r - min_r, max_c - min_c)
}

/// Keeps regions of plausible size and shape relative to the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionFilter {
    /// Regions smaller than `image_size / min_area_divisor` are dropped
    pub min_area_divisor: usize,
    /// Regions larger than `image_size / max_area_divisor` are dropped
    pub max_area_divisor: usize,
    /// Longest over shortest side of the pixel extent, sides counted inclusively.
    ///
    /// Older filters compared `|rows - cols|` against `max(rows, cols)`, a
    /// test no region can fail, so their results match an unbounded ratio
    /// here (`f32::INFINITY`), not the default of 2.0.
    pub max_aspect_ratio: f32,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self {
            min_area_divisor: 50,
            max_area_divisor: 10,
            max_aspect_ratio: 2.0,
        }
    }
}

impl RegionFilter {
    /// True when `region` passes for an image of `image_size` pixels
    pub fn accepts(&self, image_size: usize, region: &Region) -> bool {
        if region.is_sentinel() {
            return false;
        }
        let min_area = image_size / self.min_area_divisor.max(1);
        let max_area = image_size / self.max_area_divisor.max(1);
        if region.area < min_area || region.area > max_area {
            return false;
        }

        let (rows, cols) = region_extent(&region.pixels);
        let (long, short) = if rows >= cols {
            (rows + 1, cols + 1)
        } else {
            (cols + 1, rows + 1)
        };
        long as f32 <= short as f32 * self.max_aspect_ratio
    }

    /// Drop rejected regions in place, keeping the order of the rest
    pub fn apply(&self, image_size: usize, regions: &mut Vec<Region>) {
        regions.retain(|r| self.accepts(image_size, r));
    }
}

/// Paint each non-sentinel region with its 1-based index (saturating at 255)
/// on a zero background.
pub fn regions_to_label_image(rows: usize, columns: usize, regions: &[Region]) -> GrayscaleImage {
    let mut labels = GrayscaleImage::new(rows, columns);
    let painted = regions.iter().filter(|r| !r.is_sentinel());
    for (i, region) in painted.enumerate() {
        let value = u8::try_from(i + 1).unwrap_or(u8::MAX);
        for p in &region.pixels {
            if labels.contains(*p) {
                labels.set(p.row, p.col, value);
            }
        }
    }
    labels
}

/// Raw image moments of a region's pixel set, computed on demand.
///
/// x is the column index, y the row index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionMoments {
    /// Pixel count
    pub m00: f64,
    /// Sum of x
    pub m10: f64,
    /// Sum of y
    pub m01: f64,
    /// Sum of x*y
    pub m11: f64,
    /// Sum of x^2
    pub m20: f64,
    /// Sum of y^2
    pub m02: f64,
}

impl RegionMoments {
    /// Accumulate moments over `region.pixels`
    pub fn compute(region: &Region) -> Self {
        let mut m = Self::default();
        for p in &region.pixels {
            let x = p.col as f64;
            let y = p.row as f64;
            m.m00 += 1.0;
            m.m10 += x;
            m.m01 += y;
            m.m11 += x * y;
            m.m20 += x * x;
            m.m02 += y * y;
        }
        m
    }

    /// Centre of mass as (row, col), `None` for an empty region
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m01 / self.m00, self.m10 / self.m00))
    }

    /// Second-order central moments (mu20, mu11, mu02)
    pub fn central(&self) -> Option<(f64, f64, f64)> {
        let (cy, cx) = self.centroid()?;
        let mu20 = self.m20 / self.m00 - cx * cx;
        let mu11 = self.m11 / self.m00 - cx * cy;
        let mu02 = self.m02 / self.m00 - cy * cy;
        Some((mu20, mu11, mu02))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_from(level: u8, pixels: &[(usize, usize)]) -> Region {
        let mut r = Region::open(Pixel::from(pixels[0]), level);
        for &p in pixels {
            r.accumulate(Pixel::from(p));
        }
        r
    }

    fn square(top: usize, left: usize, side: usize) -> Vec<(usize, usize)> {
        let mut v = Vec::new();
        for r in top..top + side {
            for c in left..left + side {
                v.push((r, c));
            }
        }
        v
    }

    #[test]
    fn test_region_extent() {
        let pixels: Vec<Pixel> = [(2, 3), (5, 4), (3, 9)].into_iter().map(Pixel::from).collect();
        assert_eq!(region_extent(&pixels), (3, 6));
        assert_eq!(region_extent(&[]), (0, 0));
    }

    #[test]
    fn test_filter_by_area() {
        // 100x100 image: keep areas in [200, 1000]
        let filter = RegionFilter::default();
        let small = region_from(10, &square(0, 0, 10)); // 100
        let good = region_from(10, &square(0, 0, 20)); // 400
        let large = region_from(10, &square(0, 0, 40)); // 1600
        assert!(!filter.accepts(10_000, &small));
        assert!(filter.accepts(10_000, &good));
        assert!(!filter.accepts(10_000, &large));
    }

    #[test]
    fn test_filter_by_aspect() {
        let filter = RegionFilter::default();
        let line: Vec<(usize, usize)> = (0..300).map(|c| (0, c)).collect();
        let elongated = region_from(10, &line);
        assert!(!filter.accepts(10_000, &elongated));
        let unbounded = RegionFilter {
            max_aspect_ratio: f32::INFINITY,
            ..filter
        };
        assert!(unbounded.accepts(10_000, &elongated));

        let mut regions = vec![Region::sentinel(), elongated, region_from(10, &square(5, 5, 20))];
        filter.apply(10_000, &mut regions);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].area, 400);
    }

    #[test]
    fn test_label_image_skips_sentinel() {
        let regions = vec![
            Region::sentinel(),
            region_from(1, &[(0, 0), (0, 1)]),
            region_from(2, &[(1, 1)]),
        ];
        let labels = regions_to_label_image(2, 2, &regions);
        assert_eq!(labels.as_bytes(), &[1, 1, 0, 2]);
    }

    #[test]
    fn test_moments_of_square() {
        let r = region_from(0, &square(2, 4, 3));
        let m = RegionMoments::compute(&r);
        assert_eq!(m.m00, 9.0);
        assert_eq!(m.centroid(), Some((3.0, 5.0)));
        let (mu20, mu11, mu02) = m.central().unwrap();
        assert!((mu20 - 2.0 / 3.0).abs() < 1e-9);
        assert!(mu11.abs() < 1e-9);
        assert!((mu02 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_moments_of_empty_region() {
        let m = RegionMoments::compute(&Region::sentinel());
        assert_eq!(m.centroid(), None);
    }
}
