// Mapping service - owns the live mapping state
use crate::domain::dataset::Dataset;
use crate::domain::mapping::{MappingState, StateError, StateUpdate};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the dashboard's single mutable entity. Mutations are serialized
/// by the lock; renders take a snapshot and run lock-free.
#[derive(Clone)]
pub struct MappingService {
    dataset: Arc<Dataset>,
    state: Arc<RwLock<MappingState>>,
}

impl MappingService {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let state = MappingState::initial(&dataset);
        Self {
            dataset,
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub async fn snapshot(&self) -> MappingState {
        self.state.read().await.clone()
    }

    /// Apply a validated partial update; returns the resulting state.
    pub async fn update(&self, update: StateUpdate) -> Result<MappingState, StateError> {
        let mut state = self.state.write().await;
        state.apply(update, &self.dataset)?;
        Ok(state.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mapping::TruckSelection;
    use crate::domain::record::TelemetryRecord;
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

    fn service() -> MappingService {
        let dataset = Dataset::new(vec![
            record("A", "2021-07-01 10:00:00", 0.5),
            record("B", "2021-07-05 12:00:00", 2.5),
        ])
        .unwrap();
        MappingService::new(Arc::new(dataset))
    }

    #[tokio::test]
    async fn test_update_transitions_state() {
        let service = service();
        let updated = service
            .update(StateUpdate {
                truck: Some(TruckSelection::Named("B".to_string())),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.truck, TruckSelection::Named("B".to_string()));
        assert_eq!(service.snapshot().await.truck, updated.truck);
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_state_unchanged() {
        let service = service();
        let before = service.snapshot().await;
        let result = service
            .update(StateUpdate {
                energy_over: Some(1000.0),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(StateError::EnergyOutOfRange(..))));
        assert_eq!(service.snapshot().await.energy_over, before.energy_over);
    }
}
