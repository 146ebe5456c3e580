// Mapping state - the user-selectable parameter bundle and its filter
use crate::domain::aggregate::Aggregation;
use crate::domain::basemap::Basemap;
use crate::domain::dataset::Dataset;
use crate::domain::record::TelemetryRecord;
use crate::domain::shade::{Normalization, Palette};
use chrono::NaiveDate;
use thiserror::Error;

pub const MAX_SPREADING: u8 = 5;
pub const ENERGY_OVER_STEP: f64 = 0.2;

/// Truck axis of the filter. `All` leaves the axis unfiltered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TruckSelection {
    All,
    Named(String),
}

impl TruckSelection {
    pub fn matches(&self, truck: &str) -> bool {
        match self {
            TruckSelection::All => true,
            TruckSelection::Named(name) => name == truck,
        }
    }
}

/// The dashboard's one mutable entity. Every field mutation goes through
/// `apply`, which enforces the widget range constraints server-side.
#[derive(Debug, Clone)]
pub struct MappingState {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub truck: TruckSelection,
    pub energy_over: f64,
    pub agg_fn: Aggregation,
    pub normalization: Normalization,
    pub spreading: u8,
    pub cmap: Palette,
    pub basemap: Basemap,
    pub data_opacity: f64,
}

/// Partial state transition; unset fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub truck: Option<TruckSelection>,
    pub energy_over: Option<f64>,
    pub agg_fn: Option<Aggregation>,
    pub normalization: Option<Normalization>,
    pub spreading: Option<u8>,
    pub cmap: Option<Palette>,
    pub basemap: Option<Basemap>,
    pub data_opacity: Option<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("date {0} is outside the dataset range {1}..={2}")]
    DateOutOfRange(NaiveDate, NaiveDate, NaiveDate),
    #[error("start date {0} is after end date {1}")]
    DateOrder(NaiveDate, NaiveDate),
    #[error("unknown truck {0:?}")]
    UnknownTruck(String),
    #[error("energy threshold {0} is outside the observed range {1}..={2}")]
    EnergyOutOfRange(f64, f64, f64),
    #[error("spreading {0} exceeds the maximum of {max}", max = MAX_SPREADING)]
    SpreadingOutOfRange(u8),
    #[error("opacity {0} is outside 0..=1")]
    OpacityOutOfRange(f64),
}

impl MappingState {
    /// Startup defaults: full date range, all trucks, threshold 0 clamped
    /// into the observed efficiency bounds.
    pub fn initial(dataset: &Dataset) -> Self {
        let (min_date, max_date) = dataset.date_bounds();
        let (min_kwh, max_kwh) = dataset.kwh_per_km_bounds();
        Self {
            start_date: min_date,
            end_date: max_date,
            truck: TruckSelection::All,
            energy_over: 0.0f64.clamp(min_kwh, max_kwh),
            agg_fn: Aggregation::Count,
            normalization: Normalization::HistogramEqualization,
            spreading: 0,
            cmap: Palette::Fire,
            basemap: Basemap::EsriImagery,
            data_opacity: 1.0,
        }
    }

    /// Validate and apply a partial update. On any violation the state is
    /// left unchanged.
    pub fn apply(&mut self, update: StateUpdate, dataset: &Dataset) -> Result<(), StateError> {
        let (min_date, max_date) = dataset.date_bounds();
        let (min_kwh, max_kwh) = dataset.kwh_per_km_bounds();

        let start_date = update.start_date.unwrap_or(self.start_date);
        let end_date = update.end_date.unwrap_or(self.end_date);
        for date in [start_date, end_date] {
            if date < min_date || date > max_date {
                return Err(StateError::DateOutOfRange(date, min_date, max_date));
            }
        }
        if start_date > end_date {
            return Err(StateError::DateOrder(start_date, end_date));
        }

        if let Some(TruckSelection::Named(name)) = &update.truck {
            if !dataset.trucks().iter().any(|t| t == name) {
                return Err(StateError::UnknownTruck(name.clone()));
            }
        }

        let energy_over = update.energy_over.unwrap_or(self.energy_over);
        if !energy_over.is_finite() || energy_over < min_kwh || energy_over > max_kwh {
            return Err(StateError::EnergyOutOfRange(energy_over, min_kwh, max_kwh));
        }

        let spreading = update.spreading.unwrap_or(self.spreading);
        if spreading > MAX_SPREADING {
            return Err(StateError::SpreadingOutOfRange(spreading));
        }

        let data_opacity = update.data_opacity.unwrap_or(self.data_opacity);
        if !data_opacity.is_finite() || !(0.0..=1.0).contains(&data_opacity) {
            return Err(StateError::OpacityOutOfRange(data_opacity));
        }

        self.start_date = start_date;
        self.end_date = end_date;
        if let Some(truck) = update.truck {
            self.truck = truck;
        }
        self.energy_over = energy_over;
        if let Some(agg_fn) = update.agg_fn {
            self.agg_fn = agg_fn;
        }
        if let Some(normalization) = update.normalization {
            self.normalization = normalization;
        }
        self.spreading = spreading;
        if let Some(cmap) = update.cmap {
            self.cmap = cmap;
        }
        if let Some(basemap) = update.basemap {
            self.basemap = basemap;
        }
        self.data_opacity = data_opacity;
        Ok(())
    }

    /// The filtered subset under the current selection. Both date
    /// boundaries are strict, so records landing exactly on the start or
    /// end date are excluded.
    pub fn filter<'a>(&self, dataset: &'a Dataset) -> Vec<&'a TelemetryRecord> {
        dataset
            .records()
            .iter()
            .filter(|r| self.truck.matches(&r.truck))
            .filter(|r| r.kwh_per_km > self.energy_over)
            .filter(|r| {
                let date = r.date_time.date();
                date > self.start_date && date < self.end_date
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(truck: &str, ts: &str, kwh_per_km: f64) -> TelemetryRecord {
        TelemetryRecord {
            truck: truck.to_string(),
            date_time: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            lon: 18.0,
            lat: 59.3,
            easting: 2_003_750.8,
            northing: 8_251_950.4,
            speed_km_h: 60.0,
            altitude_m: 20.0,
            distance_travelled_km: 1.0,
            avg_kwh: kwh_per_km,
            sum_kwh: kwh_per_km,
            kwh_per_km,
            nr_samples: 55,
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            record("A", "2021-07-02 10:00:00", 0.5),
            record("A", "2021-07-03 11:00:00", 1.5),
            record("B", "2021-07-04 12:00:00", 2.5),
        ])
        .unwrap()
    }

    fn state(dataset: &Dataset) -> MappingState {
        let mut state = MappingState::initial(dataset);
        // Widen the window and drop the threshold below the observed
        // minimum so the strict comparisons keep every record.
        state.start_date = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
        state.end_date = NaiveDate::from_ymd_opt(2021, 7, 5).unwrap();
        state.energy_over = 0.0;
        state
    }

    #[test]
    fn test_threshold_scenario() {
        let dataset = dataset();
        let mut state = state(&dataset);
        state.energy_over = 1.0;
        let kept: Vec<f64> = state.filter(&dataset).iter().map(|r| r.kwh_per_km).collect();
        assert_eq!(kept, vec![1.5, 2.5]);
    }

    #[test]
    fn test_threshold_monotonic() {
        let dataset = dataset();
        let mut state = state(&dataset);
        let mut previous = usize::MAX;
        for threshold in [0.5, 1.0, 1.5, 2.0, 2.5] {
            state.energy_over = threshold;
            let size = state.filter(&dataset).len();
            assert!(size <= previous);
            previous = size;
        }
    }

    #[test]
    fn test_date_boundaries_are_strict() {
        let dataset = dataset();
        let mut state = state(&dataset);
        state.start_date = NaiveDate::from_ymd_opt(2021, 7, 2).unwrap();
        state.end_date = NaiveDate::from_ymd_opt(2021, 7, 4).unwrap();
        // Records on 07-02 and 07-04 sit exactly on the boundaries.
        let kept: Vec<&str> = state
            .filter(&dataset)
            .iter()
            .map(|r| r.truck.as_str())
            .collect();
        assert_eq!(kept, vec!["A"]);
    }

    #[test]
    fn test_identical_dates_yield_empty_set() {
        let dataset = dataset();
        let mut state = state(&dataset);
        state.start_date = NaiveDate::from_ymd_opt(2021, 7, 3).unwrap();
        state.end_date = state.start_date;
        assert!(state.filter(&dataset).is_empty());
    }

    #[test]
    fn test_all_is_identity_on_truck_axis() {
        let dataset = dataset();
        let state = state(&dataset);
        assert_eq!(state.filter(&dataset).len(), dataset.records().len());
    }

    #[test]
    fn test_per_truck_subsets_partition_all() {
        let dataset = dataset();
        let mut state = state(&dataset);
        state.energy_over = 0.4;

        let all = state.filter(&dataset).len();
        let mut summed = 0;
        for truck in dataset.trucks() {
            state.truck = TruckSelection::Named(truck.clone());
            summed += state.filter(&dataset).len();
        }
        assert_eq!(summed, all);
    }

    #[test]
    fn test_apply_rejects_out_of_bounds() {
        let dataset = dataset();
        let mut state = MappingState::initial(&dataset);
        let before = state.clone();

        let updates = [
            StateUpdate {
                start_date: Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                ..Default::default()
            },
            StateUpdate {
                start_date: Some(NaiveDate::from_ymd_opt(2021, 7, 4).unwrap()),
                end_date: Some(NaiveDate::from_ymd_opt(2021, 7, 3).unwrap()),
                ..Default::default()
            },
            StateUpdate {
                truck: Some(TruckSelection::Named("ghost".to_string())),
                ..Default::default()
            },
            StateUpdate {
                energy_over: Some(99.0),
                ..Default::default()
            },
            StateUpdate {
                spreading: Some(6),
                ..Default::default()
            },
            StateUpdate {
                data_opacity: Some(1.5),
                ..Default::default()
            },
        ];
        for update in updates {
            assert!(state.apply(update, &dataset).is_err());
            assert_eq!(state.start_date, before.start_date);
            assert_eq!(state.end_date, before.end_date);
            assert_eq!(state.truck, before.truck);
            assert_eq!(state.energy_over, before.energy_over);
            assert_eq!(state.spreading, before.spreading);
            assert_eq!(state.data_opacity, before.data_opacity);
        }
    }

    #[test]
    fn test_apply_accepts_valid_update() {
        let dataset = dataset();
        let mut state = MappingState::initial(&dataset);
        let update = StateUpdate {
            truck: Some(TruckSelection::Named("B".to_string())),
            energy_over: Some(1.2),
            agg_fn: Some(Aggregation::Mean),
            spreading: Some(3),
            data_opacity: Some(0.5),
            ..Default::default()
        };
        state.apply(update, &dataset).unwrap();
        assert_eq!(state.truck, TruckSelection::Named("B".to_string()));
        assert_eq!(state.energy_over, 1.2);
        assert_eq!(state.agg_fn, Aggregation::Mean);
        assert_eq!(state.spreading, 3);
        assert_eq!(state.data_opacity, 0.5);
    }
}
