// Dashboard view model
use crate::domain::basemap::Basemap;
use crate::domain::chart::{EnergyComparison, Histogram};
use crate::domain::raster::Extent;
use crate::domain::shade::RgbaRaster;

/// Map region: the selected tile layer below, the shaded overlay above.
/// `extent` georeferences the overlay in Mercator coordinates; it is
/// absent when the filtered subset was empty.
#[derive(Debug, Clone)]
pub struct MapView {
    pub basemap: Basemap,
    pub overlay: RgbaRaster,
    pub extent: Option<Extent>,
}

/// The full composed layout: map region beside the chart column.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub map: MapView,
    pub histogram: Histogram,
    pub energy: EnergyComparison,
}
