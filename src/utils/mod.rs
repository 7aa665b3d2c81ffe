//! Helpers around the component tree
//!
//! - Grayscale conversion (RGB/RGBA to luminance) for feeding the detector
//! - Region post-processing (filtering, label images, moments)

pub mod grayscale;
pub mod regions;
