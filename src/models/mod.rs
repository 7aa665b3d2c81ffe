/// Row-major 8-bit grayscale grid
pub mod grid;
/// Integer pixel coordinates
pub mod pixel;
/// Components accumulated by the flood
pub mod region;

pub use grid::GrayscaleImage;
pub use pixel::Pixel;
pub use region::{Region, SENTINEL_LEVEL};
