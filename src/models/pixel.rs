/// Integer grid coordinate of a single sample.
///
/// Ordered row-major, which is the order the flood scans neighbours in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Pixel {
    /// Row index (y)
    pub row: usize,
    /// Column index (x)
    pub col: usize,
}

impl Pixel {
    /// Create a new pixel coordinate
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major linear index into a buffer `columns` samples wide
    #[inline]
    pub fn index(&self, columns: usize) -> usize {
        self.row * columns + self.col
    }

    /// Translate by a signed offset, returning `None` when the result leaves
    /// a `rows` x `columns` grid.
    #[inline]
    pub fn offset(&self, d_row: isize, d_col: isize, rows: usize, columns: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        if row < rows && col < columns {
            Some(Self { row, col })
        } else {
            None
        }
    }
}

impl From<(usize, usize)> for Pixel {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_in_bounds() {
        let p = Pixel::new(1, 1);
        assert_eq!(p.offset(-1, -1, 3, 3), Some(Pixel::new(0, 0)));
        assert_eq!(p.offset(1, 1, 3, 3), Some(Pixel::new(2, 2)));
    }

    #[test]
    fn test_offset_out_of_bounds() {
        let origin = Pixel::new(0, 0);
        assert_eq!(origin.offset(-1, 0, 2, 2), None);
        assert_eq!(origin.offset(0, -1, 2, 2), None);
        assert_eq!(Pixel::new(1, 1).offset(1, 0, 2, 2), None);
        assert_eq!(Pixel::new(1, 1).offset(0, 1, 2, 2), None);
    }

    #[test]
    fn test_row_major_order() {
        assert!(Pixel::new(0, 5) < Pixel::new(1, 0));
        assert_eq!(Pixel::new(2, 3).index(4), 11);
    }
}
