use super::Pixel;
use serde::{Deserialize, Serialize};

/// Level of the sentinel region at the bottom of the stack.
///
/// One above the largest 8-bit grey level, so no real pixel can ever reach
/// it and `collapse_to` always terminates against it.
pub const SENTINEL_LEVEL: u16 = 256;

/// Connected component accumulated during the flood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Grey level the component was opened at
    pub level: u16,
    /// Number of pixels folded in, including merged children
    pub area: usize,
    /// Member pixels in discovery order
    pub pixels: Vec<Pixel>,
    /// Pixel that opened the component; `None` for the sentinel
    pub seed: Option<Pixel>,
}

impl Region {
    /// Open an empty component at `level`, started from `seed`
    pub fn open(seed: Pixel, level: u8) -> Self {
        Self {
            level: u16::from(level),
            area: 0,
            pixels: Vec::new(),
            seed: Some(seed),
        }
    }

    /// The bottom-of-stack marker. Never holds pixels.
    pub fn sentinel() -> Self {
        Self {
            level: SENTINEL_LEVEL,
            area: 0,
            pixels: Vec::new(),
            seed: None,
        }
    }

    /// True for the bottom-of-stack marker
    pub fn is_sentinel(&self) -> bool {
        self.level == SENTINEL_LEVEL
    }

    /// Append one pixel
    pub fn accumulate(&mut self, p: Pixel) {
        self.pixels.push(p);
        self.area += 1;
    }

    /// Absorb `other`; its pixels follow ours in their original order
    pub fn merge(&mut self, other: Region) {
        self.area += other.area;
        self.pixels.extend(other.pixels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_counts_area() {
        let mut r = Region::open(Pixel::new(0, 0), 10);
        assert_eq!(r.area, 0);
        assert!(r.pixels.is_empty());
        r.accumulate(Pixel::new(0, 0));
        r.accumulate(Pixel::new(0, 1));
        assert_eq!(r.area, 2);
        assert_eq!(r.pixels.len(), 2);
    }

    #[test]
    fn test_merge_appends_in_order() {
        let mut dst = Region::open(Pixel::new(0, 0), 20);
        dst.accumulate(Pixel::new(0, 0));
        let mut src = Region::open(Pixel::new(1, 1), 10);
        src.accumulate(Pixel::new(1, 1));
        src.accumulate(Pixel::new(1, 0));

        dst.merge(src);
        assert_eq!(dst.area, 3);
        assert_eq!(
            dst.pixels,
            vec![Pixel::new(0, 0), Pixel::new(1, 1), Pixel::new(1, 0)]
        );
        assert_eq!(dst.level, 20);
    }

    #[test]
    fn test_sentinel_is_above_every_grey_level() {
        let s = Region::sentinel();
        assert!(s.is_sentinel());
        assert!(s.level > u16::from(u8::MAX));
        assert!(s.seed.is_none());
    }
}
