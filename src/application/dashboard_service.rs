// Dashboard service - runs the composition pipeline
use crate::domain::chart::{EnergyComparison, HISTOGRAM_BINS, Histogram};
use crate::domain::dashboard::{DashboardView, MapView};
use crate::domain::dataset::Dataset;
use crate::domain::mapping::MappingState;
use crate::domain::raster::rasterize;
use crate::domain::shade::{apply_opacity, shade, spread};
use std::sync::Arc;

/// Device-pixel grid size and chart settings, loaded from dashboard
/// config at startup.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub plot_width: usize,
    pub plot_height: usize,
    pub histogram_bins: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            plot_width: 800,
            plot_height: 600,
            histogram_bins: HISTOGRAM_BINS,
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    dataset: Arc<Dataset>,
    settings: RenderSettings,
}

impl DashboardService {
    pub fn new(dataset: Arc<Dataset>, settings: RenderSettings) -> Self {
        Self { dataset, settings }
    }

    /// Build the full dashboard from a state snapshot: filter, rasterize
    /// with the selected aggregator, shade, spread, apply opacity, then
    /// attach the side charts. Pure apart from reading the dataset; an
    /// empty filtered subset degenerates to an empty-but-valid view.
    pub fn render(&self, state: &MappingState) -> DashboardView {
        let selected = state.filter(&self.dataset);

        let points: Vec<(f64, f64, f64)> = selected
            .iter()
            .map(|r| (r.easting, r.northing, r.kwh_per_km))
            .collect();
        let grid = rasterize(
            &points,
            self.settings.plot_width,
            self.settings.plot_height,
            state.agg_fn,
        );
        let shaded = shade(&grid, state.cmap, state.normalization);
        let spreaded = spread(&shaded, state.spreading);
        let overlay = apply_opacity(&spreaded, state.data_opacity);

        let efficiencies: Vec<f64> = selected.iter().map(|r| r.kwh_per_km).collect();
        let histogram = Histogram::from_values(&efficiencies, self.settings.histogram_bins);

        let energy = EnergyComparison {
            total_kwh: self.dataset.total_energy_kwh(),
            selected_kwh: selected.iter().map(|r| r.sum_kwh).sum(),
        };

        DashboardView {
            map: MapView {
                basemap: state.basemap,
                overlay,
                extent: grid.extent,
            },
            histogram,
            energy,
        }
    }
}
