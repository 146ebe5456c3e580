// Shading - bin values to colors, spreading, opacity
use crate::domain::raster::RasterGrid;

/// Color palette applied to normalized bin values. Gradients follow the
/// colorcet palettes of the same names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Fire,
    Bgy,
    Bgyw,
    Bmy,
    Gray,
    Kbc,
}

pub const PALETTES: [Palette; 6] = [
    Palette::Fire,
    Palette::Bgy,
    Palette::Bgyw,
    Palette::Bmy,
    Palette::Gray,
    Palette::Kbc,
];

impl Palette {
    pub fn key(&self) -> &'static str {
        match self {
            Palette::Fire => "fire",
            Palette::Bgy => "bgy",
            Palette::Bgyw => "bgyw",
            Palette::Bmy => "bmy",
            Palette::Gray => "gray",
            Palette::Kbc => "kbc",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        PALETTES.iter().copied().find(|p| p.key() == key)
    }

    fn stops(&self) -> &'static [[u8; 3]] {
        match self {
            Palette::Fire => &[[0, 0, 4], [120, 7, 13], [229, 92, 0], [255, 200, 60], [255, 255, 224]],
            Palette::Bgy => &[[0, 2, 112], [0, 94, 162], [0, 166, 112], [160, 221, 40], [255, 253, 30]],
            Palette::Bgyw => &[[0, 4, 128], [0, 120, 148], [70, 190, 89], [210, 230, 130], [255, 255, 255]],
            Palette::Bmy => &[[0, 12, 125], [100, 0, 165], [212, 14, 150], [255, 120, 86], [255, 240, 50]],
            Palette::Gray => &[[0, 0, 0], [255, 255, 255]],
            Palette::Kbc => &[[0, 0, 0], [22, 40, 110], [26, 92, 185], [85, 150, 230], [190, 220, 255]],
        }
    }

    /// 256-entry RGB lookup table, linearly interpolated between the stops.
    pub fn lut(&self) -> Vec<[u8; 3]> {
        let stops = self.stops();
        let segments = stops.len() - 1;
        (0..256)
            .map(|i| {
                let t = i as f64 / 255.0 * segments as f64;
                let seg = (t as usize).min(segments - 1);
                let frac = t - seg as f64;
                let lo = stops[seg];
                let hi = stops[seg + 1];
                [
                    lerp(lo[0], hi[0], frac),
                    lerp(lo[1], hi[1], frac),
                    lerp(lo[2], hi[2], frac),
                ]
            })
            .collect()
    }
}

fn lerp(lo: u8, hi: u8, frac: f64) -> u8 {
    (lo as f64 + (hi as f64 - lo as f64) * frac).round() as u8
}

/// Value-to-palette-index scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    HistogramEqualization,
    Linear,
    Log,
    CubeRoot,
}

pub const NORMALIZATIONS: [Normalization; 4] = [
    Normalization::HistogramEqualization,
    Normalization::Linear,
    Normalization::Log,
    Normalization::CubeRoot,
];

impl Normalization {
    pub fn key(&self) -> &'static str {
        match self {
            Normalization::HistogramEqualization => "eq_hist",
            Normalization::Linear => "linear",
            Normalization::Log => "log",
            Normalization::CubeRoot => "cbrt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Normalization::HistogramEqualization => "Histogram Equalization",
            Normalization::Linear => "Linear",
            Normalization::Log => "Log",
            Normalization::CubeRoot => "Cube root",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        NORMALIZATIONS.iter().copied().find(|n| n.key() == key)
    }
}

/// Flat RGBA image, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaRaster {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl RgbaRaster {
    pub fn transparent(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    pub fn pixel(&self, col: usize, row: usize) -> [u8; 4] {
        let at = (row * self.width + col) * 4;
        [
            self.pixels[at],
            self.pixels[at + 1],
            self.pixels[at + 2],
            self.pixels[at + 3],
        ]
    }
}

/// Map raster bin values to palette colors. Empty bins stay fully
/// transparent; filled bins are opaque until `apply_opacity`.
pub fn shade(grid: &RasterGrid, palette: Palette, normalization: Normalization) -> RgbaRaster {
    let values: Vec<f64> = grid.bins.iter().flatten().copied().collect();
    if values.is_empty() {
        return RgbaRaster::transparent(grid.width, grid.height);
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut sorted = values;
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let lut = palette.lut();
    let mut raster = RgbaRaster::transparent(grid.width, grid.height);
    for (i, bin) in grid.bins.iter().enumerate() {
        if let Some(value) = bin {
            let t = normalized_position(*value, min, max, normalization, &sorted);
            let index = (t * 255.0).round().clamp(0.0, 255.0) as usize;
            let [r, g, b] = lut[index];
            let at = i * 4;
            raster.pixels[at] = r;
            raster.pixels[at + 1] = g;
            raster.pixels[at + 2] = b;
            raster.pixels[at + 3] = 255;
        }
    }
    raster
}

/// Scale a bin value into [0, 1] under the given normalization. A
/// constant-valued raster maps everything to the top of the palette.
fn normalized_position(value: f64, min: f64, max: f64, normalization: Normalization, sorted: &[f64]) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return 1.0;
    }
    match normalization {
        Normalization::Linear => (value - min) / span,
        Normalization::Log => ((value - min) + 1.0).ln() / (span + 1.0).ln(),
        Normalization::CubeRoot => (value - min).cbrt() / span.cbrt(),
        Normalization::HistogramEqualization => {
            let rank = sorted.partition_point(|v| *v < value);
            rank as f64 / (sorted.len() - 1).max(1) as f64
        }
    }
}

/// Dilate the colored raster by `radius` pixels with a square kernel,
/// blending overlaps additively (saturating). Radius 0 is a no-op.
pub fn spread(raster: &RgbaRaster, radius: u8) -> RgbaRaster {
    if radius == 0 {
        return raster.clone();
    }
    let radius = radius as isize;
    let (width, height) = (raster.width as isize, raster.height as isize);
    let mut out = RgbaRaster::transparent(raster.width, raster.height);

    for row in 0..height {
        for col in 0..width {
            let mut sum = [0u32; 4];
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let (sc, sr) = (col + dx, row + dy);
                    if sc < 0 || sc >= width || sr < 0 || sr >= height {
                        continue;
                    }
                    let at = ((sr * width + sc) * 4) as usize;
                    for channel in 0..4 {
                        sum[channel] += raster.pixels[at + channel] as u32;
                    }
                }
            }
            let at = ((row * width + col) * 4) as usize;
            for channel in 0..4 {
                out.pixels[at + channel] = sum[channel].min(255) as u8;
            }
        }
    }
    out
}

/// Uniform alpha multiplier over the whole layer.
pub fn apply_opacity(raster: &RgbaRaster, opacity: f64) -> RgbaRaster {
    let mut out = raster.clone();
    for pixel in out.pixels.chunks_exact_mut(4) {
        pixel[3] = (pixel[3] as f64 * opacity).round().clamp(0.0, 255.0) as u8;
    }
    out
}
