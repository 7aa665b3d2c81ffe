use super::Pixel;
use crate::error::{MserError, Result};

/// Dense row-major grid of 8-bit grey levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrayscaleImage {
    rows: usize,
    columns: usize,
    data: Vec<u8>,
}

impl GrayscaleImage {
    /// Create a zero-filled image with the given dimensions
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            data: vec![0; rows * columns],
        }
    }

    /// Wrap an existing row-major buffer
    pub fn from_raw(rows: usize, columns: usize, data: Vec<u8>) -> Result<Self> {
        let expected = rows * columns;
        if data.len() != expected {
            return Err(MserError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            data,
        })
    }

    /// Build an image from nested rows, all of which must have equal length
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * columns);
        for (row, samples) in rows.iter().enumerate() {
            let samples = samples.as_ref();
            if samples.len() != columns {
                return Err(MserError::RaggedRows {
                    row,
                    expected: columns,
                    actual: samples.len(),
                });
            }
            data.extend_from_slice(samples);
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            data,
        })
    }

    /// Number of rows (image height)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (image width)
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grey level at (row, col). Panics when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.rows && col < self.columns, "pixel ({row}, {col}) out of range");
        self.data[row * self.columns + col]
    }

    /// Grey level at `p`
    #[inline]
    pub fn get_pixel(&self, p: Pixel) -> u8 {
        self.get(p.row, p.col)
    }

    /// Set the grey level at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        assert!(row < self.rows && col < self.columns, "pixel ({row}, {col}) out of range");
        self.data[row * self.columns + col] = value;
    }

    /// True when `p` lies inside the grid
    #[inline]
    pub fn contains(&self, p: Pixel) -> bool {
        p.row < self.rows && p.col < self.columns
    }

    /// Raw row-major samples
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Apply `f` to every sample, keeping the geometry
    pub fn map_levels<F: Fn(u8) -> u8>(&self, f: F) -> Self {
        Self {
            rows: self.rows,
            columns: self.columns,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Convert into an `image` crate buffer (width = columns, height = rows)
    pub fn to_gray_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.columns as u32, self.rows as u32, |x, y| {
            image::Luma([self.data[y as usize * self.columns + x as usize]])
        })
    }
}

impl From<image::GrayImage> for GrayscaleImage {
    fn from(img: image::GrayImage) -> Self {
        let columns = img.width() as usize;
        let rows = img.height() as usize;
        Self {
            rows,
            columns,
            data: img.into_raw(),
        }
    }
}
