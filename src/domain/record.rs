// Telemetry data domain models
use chrono::NaiveDateTime;

/// One minute-bucketed telemetry sample, as produced by the warehouse query.
#[derive(Debug, Clone)]
pub struct TelemetryRecord {
    pub truck: String,
    pub date_time: NaiveDateTime,
    pub lon: f64,
    pub lat: f64,
    /// Web-Mercator projection of (lon, lat), derived at load time.
    pub easting: f64,
    pub northing: f64,
    pub speed_km_h: f64,
    pub altitude_m: f64,
    pub distance_travelled_km: f64,
    pub avg_kwh: f64,
    pub sum_kwh: f64,
    /// Efficiency ratio sum_kwh / distance_travelled_km.
    pub kwh_per_km: f64,
    pub nr_samples: i64,
}
