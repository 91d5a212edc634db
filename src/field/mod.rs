//! Confidence fields: borrowed views and owned heatmaps.
//!
//! `FieldView` is a borrowed 2D view into a 1D `f32` buffer with an explicit
//! stride; the stride counts elements between the starts of consecutive rows,
//! so a stride larger than the width represents padded rows. `Heatmap` is the
//! owned contiguous variant and additionally guarantees every cell is finite
//! and within `[0, 1]`. The x axis indexes range bins, the y axis indexes
//! azimuth bins. The pipeline only ever reads fields; nothing mutates a
//! heatmap after construction.

use crate::util::{DetectError, DetectResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Integer grid location: `x` indexes range bins, `y` indexes azimuth bins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    /// Column (range axis), `0 <= x < width`.
    pub x: usize,
    /// Row (azimuth axis), `0 <= y < height`.
    pub y: usize,
}

impl PixelPoint {
    /// Creates a pixel point.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another pixel point.
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Borrowed 2D confidence field with an explicit stride.
#[derive(Copy, Clone)]
pub struct FieldView<'a> {
    data: &'a [f32],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> FieldView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [f32], width: usize, height: usize) -> DetectResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [f32], width: usize, height: usize, stride: usize) -> DetectResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the field width (range bins).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the field height (azimuth bins).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx).copied()
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [f32]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

/// Owned contiguous heatmap with values validated to lie in [0, 1].
#[derive(Clone, Debug)]
pub struct Heatmap {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl Heatmap {
    /// Creates a heatmap from a contiguous row-major buffer.
    ///
    /// Fails if any value is non-finite or outside `[0, 1]`.
    pub fn from_values(data: Vec<f32>, width: usize, height: usize) -> DetectResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        for (idx, &value) in data.iter().enumerate().take(needed) {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DetectError::ValueOutOfRange {
                    x: idx % width,
                    y: idx / width,
                    value,
                });
            }
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an all-zero heatmap.
    pub fn zeros(width: usize, height: usize) -> DetectResult<Self> {
        let needed = required_len(width, height, width)?;
        Ok(Self {
            data: vec![0.0; needed],
            width,
            height,
        })
    }

    /// Returns the heatmap width (range bins).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the heatmap height (azimuth bins).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns a borrowed view of the heatmap.
    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the backing row-major slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> DetectResult<usize> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(DetectError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(DetectError::InvalidDimensions { width, height })?;
    Ok(needed)
}
