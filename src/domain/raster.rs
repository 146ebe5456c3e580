// Point rasterization - spatial binning onto a device-pixel grid
use crate::domain::aggregate::{Aggregation, BinAccumulator};

/// Mercator extent covered by a raster, for georeferencing the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Aggregated raster. Bins are row-major with row 0 at the top (north);
/// a bin holds `None` when no point fell into it.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    pub width: usize,
    pub height: usize,
    pub bins: Vec<Option<f64>>,
    /// `None` when the raster was built from an empty point set.
    pub extent: Option<Extent>,
}

impl RasterGrid {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bins: vec![None; width * height],
            extent: None,
        }
    }

    pub fn bin(&self, col: usize, row: usize) -> Option<f64> {
        self.bins[row * self.width + col]
    }
}

/// Bin `(easting, northing, value)` points onto a `width` x `height` grid
/// auto-ranged over the point bounds, reducing each bin with `agg`.
pub fn rasterize(points: &[(f64, f64, f64)], width: usize, height: usize, agg: Aggregation) -> RasterGrid {
    if points.is_empty() {
        return RasterGrid::empty(width, height);
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &(x, y, _) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let mut accumulators = vec![BinAccumulator::default(); width * height];
    for &(x, y, value) in points {
        let col = bin_index(x, x_min, x_max, width);
        // Flip so north ends up in row 0.
        let row = height - 1 - bin_index(y, y_min, y_max, height);
        accumulators[row * width + col].push(value);
    }

    let bins = accumulators.iter().map(|acc| acc.finalize(agg)).collect();
    RasterGrid {
        width,
        height,
        bins,
        extent: Some(Extent {
            x_min,
            x_max,
            y_min,
            y_max,
        }),
    }
}

/// Map a coordinate into a bin index; a zero-span axis collapses into bin 0.
fn bin_index(value: f64, min: f64, max: f64, bins: usize) -> usize {
    let span = max - min;
    if span <= 0.0 {
        return 0;
    }
    let idx = ((value - min) / span * bins as f64) as usize;
    idx.min(bins - 1)
}
