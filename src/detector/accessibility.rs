//! Per-pixel "already discovered" flags, packed one bit per pixel.

use crate::models::Pixel;

/// Discovery flags for a `rows` x `columns` grid.
///
/// Flags only ever go from unset to set; there is no way to clear one.
#[derive(Debug, Clone)]
pub struct AccessibilityMap {
    rows: usize,
    columns: usize,
    data: Vec<u8>,
}

impl AccessibilityMap {
    /// Create a map with every pixel undiscovered
    pub fn new(rows: usize, columns: usize) -> Self {
        let bytes_needed = (rows * columns).div_ceil(8);
        Self {
            rows,
            columns,
            data: vec![0; bytes_needed],
        }
    }

    #[inline]
    fn locate(&self, p: Pixel) -> (usize, u8) {
        debug_assert!(
            p.row < self.rows && p.col < self.columns,
            "pixel {p:?} outside {}x{} accessibility map",
            self.rows,
            self.columns
        );
        let index = p.index(self.columns);
        (index / 8, 1 << (index % 8))
    }

    /// True once `p` has been discovered
    #[inline]
    pub fn is_accessible(&self, p: Pixel) -> bool {
        let (byte, mask) = self.locate(p);
        self.data[byte] & mask != 0
    }

    /// Mark `p` discovered
    #[inline]
    pub fn mark_accessible(&mut self, p: Pixel) {
        let (byte, mask) = self.locate(p);
        self.data[byte] |= mask;
    }

    /// Mark `p` and report whether it was undiscovered before the call
    #[inline]
    pub fn try_mark(&mut self, p: Pixel) -> bool {
        let (byte, mask) = self.locate(p);
        let fresh = self.data[byte] & mask == 0;
        self.data[byte] |= mask;
        fresh
    }

    /// Number of discovered pixels
    pub fn count(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_query() {
        let mut map = AccessibilityMap::new(3, 5);
        let p = Pixel::new(2, 4);
        assert!(!map.is_accessible(p));
        map.mark_accessible(p);
        assert!(map.is_accessible(p));
        assert!(!map.is_accessible(Pixel::new(2, 3)));
        assert_eq!(map.count(), 1);
    }

    #[test]
    fn test_try_mark_is_monotonic() {
        let mut map = AccessibilityMap::new(2, 2);
        assert!(map.try_mark(Pixel::new(1, 0)));
        assert!(!map.try_mark(Pixel::new(1, 0)));
        assert!(map.is_accessible(Pixel::new(1, 0)));
    }

    #[test]
    fn test_non_byte_aligned_size() {
        // 3x3 = 9 flags, spills into a second byte
        let mut map = AccessibilityMap::new(3, 3);
        for row in 0..3 {
            for col in 0..3 {
                map.mark_accessible(Pixel::new(row, col));
            }
        }
        assert_eq!(map.count(), 9);
    }
}
