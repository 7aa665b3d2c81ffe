//! rust_mser - grey-level component trees for 8-bit images
//!
//! Builds the extremal-region stack (the MSER stage) of a grayscale image by
//! immersion: the image is flooded in strict grey-level order from its
//! origin, growing and merging connected components as the level rises.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Detector parameters and environment overrides
pub mod config;
/// Component tree construction (flood, boundary heap, region stack)
pub mod detector;
/// Error type
pub mod error;
/// Stderr logger for binaries
pub mod logger;
/// Core data structures (GrayscaleImage, Pixel, Region)
pub mod models;
/// Image loading and summaries used by the CLI and tests
pub mod tools;
/// Grayscale conversion and region post-processing
pub mod utils;

pub use config::DetectorParams;
pub use detector::{MergeRecord, RegionHistory};
pub use error::{MserError, Result};
pub use models::{GrayscaleImage, Pixel, Region, SENTINEL_LEVEL};

use detector::build_component_tree;
use log::debug;
use rayon::prelude::*;

/// Build the component stack of `image`
///
/// # Returns
/// The surviving region stack, sentinel first. Every pixel of the image
/// appears in exactly one returned region.
///
/// # Errors
/// `MserError::EmptyImage` when the image has no rows or no columns.
///
/// # Example
/// ```
/// use rust_mser::{GrayscaleImage, detect_regions};
///
/// let img = GrayscaleImage::from_rows(&[vec![0u8, 117], vec![56, 255]]).unwrap();
/// let regions = detect_regions(&img).unwrap();
/// assert!(regions[0].is_sentinel());
/// assert_eq!(regions[1].area, 4);
/// ```
pub fn detect_regions(image: &GrayscaleImage) -> Result<Vec<Region>> {
    RegionDetector::new().detect(image)
}

/// Build the component stack and keep the merge history
pub fn detect_regions_with_history(image: &GrayscaleImage) -> Result<RegionHistory> {
    RegionDetector::with_params(DetectorParams {
        record_history: true,
        ..DetectorParams::default()
    })
    .detect_with_history(image)
}

/// Build the component stack of a raw row-major luminance buffer
///
/// # Arguments
/// * `data` - Grayscale bytes (1 byte per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
pub fn detect_regions_from_luma(data: &[u8], width: usize, height: usize) -> Result<Vec<Region>> {
    let image = GrayscaleImage::from_raw(height, width, data.to_vec())?;
    detect_regions(&image)
}

/// Build the component stacks of many images in parallel
///
/// Each image gets its own flood state; results keep the input order.
pub fn detect_regions_batch(images: &[GrayscaleImage]) -> Vec<Result<Vec<Region>>> {
    RegionDetector::new().detect_batch(images)
}

/// Detector with configuration options
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionDetector {
    params: DetectorParams,
}

impl RegionDetector {
    /// Create a detector with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector with explicit parameters
    pub fn with_params(params: DetectorParams) -> Self {
        Self { params }
    }

    /// Parameters in use
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Build the component stack of `image`
    pub fn detect(&self, image: &GrayscaleImage) -> Result<Vec<Region>> {
        self.detect_with_history(image).map(|h| h.regions)
    }

    /// Build the component stack, returning merge records when
    /// `record_history` is set
    pub fn detect_with_history(&self, image: &GrayscaleImage) -> Result<RegionHistory> {
        let history = build_component_tree(image, &self.params)?;
        debug!(
            "detected {} regions in {}x{} image",
            history.regions.len().saturating_sub(1),
            image.rows(),
            image.columns()
        );
        Ok(history)
    }

    /// Build the component stacks of many images in parallel
    pub fn detect_batch(&self, images: &[GrayscaleImage]) -> Vec<Result<Vec<Region>>> {
        images.par_iter().map(|img| self.detect(img)).collect()
    }
}
