// Side-chart artifacts computed from the filtered subset
pub const HISTOGRAM_BINS: usize = 20;

/// Frequency histogram of the efficiency column, unnormalized counts.
/// Empty input yields empty edges/counts, which the client renders as a
/// chart with zero bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` edges; bin i covers `[edges[i], edges[i+1])`,
    /// with the last bin closed on the right.
    pub bin_edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        if values.is_empty() || bins == 0 {
            return Self {
                bin_edges: Vec::new(),
                counts: Vec::new(),
            };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;

        let bin_edges: Vec<f64> = (0..=bins)
            .map(|i| min + span * i as f64 / bins as f64)
            .collect();

        let mut counts = vec![0u64; bins];
        for &value in values {
            let idx = if span <= 0.0 {
                0
            } else {
                (((value - min) / span * bins as f64) as usize).min(bins - 1)
            };
            counts[idx] += 1;
        }

        Self { bin_edges, counts }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Two-bar comparison: energy consumed over the whole dataset vs over the
/// current filtered subset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyComparison {
    pub total_kwh: f64,
    pub selected_kwh: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_yield_zero_bars() {
        let histogram = Histogram::from_values(&[], HISTOGRAM_BINS);
        assert!(histogram.bin_edges.is_empty());
        assert!(histogram.counts.is_empty());
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn test_counts_cover_all_values() {
        let values = [0.5, 1.5, 1.6, 2.5, 2.5];
        let histogram = Histogram::from_values(&values, 4);
        assert_eq!(histogram.bin_edges.len(), 5);
        assert_eq!(histogram.total(), values.len() as u64);
        assert_eq!(histogram.bin_edges[0], 0.5);
        assert_eq!(*histogram.bin_edges.last().unwrap(), 2.5);
        // Max value lands in the last (right-closed) bin.
        assert_eq!(*histogram.counts.last().unwrap(), 2);
    }

    #[test]
    fn test_constant_values_fill_first_bin() {
        let histogram = Histogram::from_values(&[1.0, 1.0, 1.0], 4);
        assert_eq!(histogram.counts[0], 3);
        assert_eq!(histogram.total(), 3);
    }
}
